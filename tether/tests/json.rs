use serde_json::json;
use std::rc::Rc;
use tether::json::{connector_from_json, connector_from_value, connectors_from_json, plan_to_json};
use tether::svg::plan_to_svg;
use tether::{
    ArrowHead, CollectingSink, ConnectorEngine, ConnectorRecord, DiagnosticKind, Endpoint, ItemBoundsMap,
    PlanOutcome, SkipReason, Vec2,
};

#[test]
fn snapshot_with_defaults() {
    let c = connector_from_json(
        r#"{"id":"c1","origin":{"itemId":"n1","itemType":"sticky"},"destination":{"x":400,"y":400}}"#,
    )
    .unwrap();
    assert_eq!(c.origin, Endpoint::attached("n1", "sticky"));
    assert_eq!(c.destination, Endpoint::free(400.0, 400.0));
    assert_eq!(c.arrow_head, ArrowHead::Filled);
    assert_eq!(c.color, "black");
    assert_eq!(c.z_index, 0);
    assert!(c.curve_control_point.is_none());
}

#[test]
fn snapshot_with_everything() {
    let c = connector_from_value(json!({
        "id": "c2",
        "origin": {"itemId": "n1", "itemType": "image", "lastPoint": {"x": 1.0, "y": 2.0}},
        "destination": {"itemId": "n1", "itemType": "image"},
        "curveControlPoint": {"x": 10.0, "y": 20.0},
        "arrowHead": "hollow",
        "color": "#123456",
        "zIndex": 7
    }))
    .unwrap();
    assert_eq!(c.origin, Endpoint::attached("n1", "image").with_last_point(1.0, 2.0));
    assert!(c.references_same_item());
    assert_eq!(c.curve_control_point, Some(Vec2::new(10.0, 20.0)));
    assert_eq!(c.arrow_head, ArrowHead::Hollow);
    assert_eq!(c.z_index, 7);
}

#[test]
fn rejects_malformed_snapshots() {
    assert!(connector_from_json(r#"{"id":"","origin":{"x":0,"y":0},"destination":{"x":1,"y":1}}"#).is_err());
    assert!(connector_from_json(r#"{"id":"c","origin":{"x":0},"destination":{"x":1,"y":1}}"#).is_err());
    assert!(connector_from_json(r#"{"id":"c","origin":{"x":0,"y":0},"destination":{"x":1,"y":1},"arrowHead":"spiky"}"#).is_err());
    assert!(connectors_from_json("{}").is_err());
    assert!(connectors_from_json("[1, 2").is_err());
}

#[test]
fn one_bad_record_does_not_blank_the_pass() {
    let records = connectors_from_json(
        r#"[
            {"id":"good","origin":{"x":0,"y":0},"destination":{"x":100,"y":0}},
            {"id":"ctrl","origin":{"x":0,"y":0},"destination":{"x":1,"y":1},"curveControlPoint":{"x":"12","y":3}},
            {"id":"nocolor","origin":{"x":0,"y":0},"destination":{"x":1,"y":1},"color":null},
            {"id":"spiky","origin":{"x":0,"y":0},"destination":{"x":1,"y":1},"arrowHead":"spiky"},
            {"origin":{"x":0,"y":0},"destination":{"x":1,"y":1}},
            7,
            {"id":"also-good","origin":{"x":0,"y":50},"destination":{"x":100,"y":50}}
        ]"#,
    )
    .unwrap();
    assert_eq!(records.len(), 7);
    let ids: Vec<&str> = records.iter().map(ConnectorRecord::id).collect();
    assert_eq!(ids, vec!["good", "ctrl", "nocolor", "spiky", "#4", "#5", "also-good"]);
    assert!(matches!(records[0], ConnectorRecord::Valid(_)));
    assert!(matches!(records[1], ConnectorRecord::Malformed { .. }));

    let sink = Rc::new(CollectingSink::new());
    let mut engine = ConnectorEngine::new().with_sink(sink.clone());
    let out = engine.compute_render_records(&records, Vec2::ZERO, &|_| false, &ItemBoundsMap::new());
    assert_eq!(out.len(), 7);
    assert!(out[0].plan().is_some());
    assert!(out[6].plan().is_some());
    for o in &out[1..6] {
        assert_eq!(o, &PlanOutcome::Skip { reason: SkipReason::Malformed });
    }
    assert_eq!(engine.markers().len(), 2);

    let seen = sink.take();
    assert_eq!(seen.len(), 5);
    assert_eq!(seen[0].connector_id, "ctrl");
    match &seen[0].kind {
        DiagnosticKind::Malformed { message } => assert!(message.contains("invalid type")),
        other => panic!("unexpected diagnostic {other:?}"),
    }
    assert_eq!(plan_to_json(&out[1])["reason"]["kind"], "malformed");
}

#[test]
fn plan_serializes_with_status_tag() {
    let list = connectors_from_json(
        r#"[
            {"id":"a","origin":{"x":0,"y":0},"destination":{"x":100,"y":0}},
            {"id":"b","origin":{"itemId":"n","itemType":"sticky"},"destination":{"itemId":"n","itemType":"sticky"}}
        ]"#,
    )
    .unwrap();
    let items = ItemBoundsMap::new().with_item("n", "sticky", 50.0, 50.0, 40.0, 40.0);
    let mut engine = ConnectorEngine::new();
    let out = engine.compute_render_records(&list, Vec2::ZERO, &|_| false, &items);

    let v = plan_to_json(&out[0]);
    assert_eq!(v["status"], "ready");
    assert_eq!(v["pathKind"], "straight");
    assert_eq!(v["segments"][0]["cmd"], "move");
    assert_eq!(v["markerOrient"]["mode"], "auto");
    assert_eq!(v["handles"].as_array().map(|h| h.len()), Some(3));

    let v = plan_to_json(&out[1]);
    assert_eq!(v["pathKind"], "selfloop");
    assert_eq!(v["isSelfConnection"], true);
    assert_eq!(v["segments"][1]["cmd"], "arc");
    assert_eq!(v["markerOrient"]["angle"], -90.0);
}

#[test]
fn svg_fragment_references_its_marker() {
    let c = connector_from_json(r#"{"id":"s","origin":{"x":0,"y":0},"destination":{"x":100,"y":50}}"#).unwrap();
    let mut engine = ConnectorEngine::new();
    let plan = engine.compute_render_plan(&c, Vec2::ZERO, false, &ItemBoundsMap::new()).into_plan().unwrap();
    let svg = plan_to_svg(&plan, true);
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"<marker id="tether-arrow-s-filled""#));
    assert!(svg.contains(r#"marker-end="url(#tether-arrow-s-filled)""#));
    assert_eq!(svg.matches("<circle").count(), 3);

    let none = c.with_arrow_head(ArrowHead::None);
    let plan = engine.compute_render_plan(&none, Vec2::ZERO, false, &ItemBoundsMap::new()).into_plan().unwrap();
    let svg = plan_to_svg(&plan, false);
    assert!(!svg.contains("<marker"));
    assert!(!svg.contains("marker-end"));
}
