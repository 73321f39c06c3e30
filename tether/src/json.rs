use crate::geometry::limits;
use crate::model::Connector;
use crate::plan::{ConnectorRecord, PlanOutcome};
use serde::de::Error as _;
use serde_json::Value;

pub fn connector_from_json(s: &str) -> Result<Connector, serde_json::Error> {
    let c: Connector = serde_json::from_str(s)?;
    check_id(&c)?;
    Ok(c)
}

pub fn connector_from_value(v: Value) -> Result<Connector, serde_json::Error> {
    let c: Connector = serde_json::from_value(v)?;
    check_id(&c)?;
    Ok(c)
}

/// Array of connector snapshots, as delivered by the persistence layer.
///
/// Only the outer shape can fail: each element is parsed on its own, and one
/// with a missing or wrong-typed field becomes [`ConnectorRecord::Malformed`].
pub fn connectors_from_json(s: &str) -> Result<Vec<ConnectorRecord>, serde_json::Error> {
    let list: Vec<Value> = serde_json::from_str(s)?;
    if list.len() > limits::MAX_CONNECTORS_PER_PASS {
        return Err(serde_json::Error::custom(format!(
            "too many connectors: {} (max {})",
            list.len(),
            limits::MAX_CONNECTORS_PER_PASS
        )));
    }
    Ok(list.into_iter().enumerate().map(|(i, v)| connector_record(i, v)).collect())
}

pub fn connector_record(index: usize, v: Value) -> ConnectorRecord {
    let id = v
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", index));
    match connector_from_value(v) {
        Ok(c) => ConnectorRecord::Valid(c),
        Err(e) => ConnectorRecord::Malformed { id, message: e.to_string() },
    }
}

pub fn connector_to_json(c: &Connector) -> Value {
    serde_json::to_value(c).unwrap_or(Value::Null)
}

pub fn plan_to_json(outcome: &PlanOutcome) -> Value {
    serde_json::to_value(outcome).unwrap_or(Value::Null)
}

pub fn check_id(c: &Connector) -> Result<(), serde_json::Error> {
    if c.id.is_empty() || c.id.len() > limits::MAX_ID_LEN {
        return Err(serde_json::Error::custom(format!(
            "connector id must be 1..={} bytes",
            limits::MAX_ID_LEN
        )));
    }
    Ok(())
}
