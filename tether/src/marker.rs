//! Arrowhead marker shapes and their per-connector cache.
//!
//! The catalog holds at most one marker per connector id. A lookup whose key
//! differs from the cached one (arrowhead kind, selection, or color changed)
//! replaces the old entry, so the cache grows with live connectors rather
//! than with renders.

use crate::model::{ArrowHead, Vec2};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

/// Marker edge length, in stroke widths.
pub const MARKER_SIZE: f32 = 6.0;
/// Side of the square view box the shapes are drawn in.
pub const MARKER_VIEW_BOX: f32 = 10.0;
pub const CHEVRON_STROKE_WIDTH: f32 = 1.5;
pub const HOLLOW_STROKE_WIDTH: f32 = 1.0;
pub const HOLLOW_FILL: &str = "white";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MarkerKey {
    pub connector_id: String,
    pub arrow_head: ArrowHead,
    pub selected: bool,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MarkerShape {
    Empty,
    /// Open two-stroke arrow.
    Chevron {
        points: [Vec2; 3],
        stroke: String,
        #[serde(rename = "strokeWidth")]
        stroke_width: f32,
    },
    Triangle {
        points: [Vec2; 3],
        fill: String,
        stroke: Option<String>,
        #[serde(rename = "strokeWidth")]
        stroke_width: f32,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDef {
    pub id: String,
    pub arrow_head: ArrowHead,
    pub shape: MarkerShape,
    pub view_box: f32,
    /// Point of the shape placed on the path end (the tip).
    pub ref_point: Vec2,
    /// Marker size in stroke widths.
    pub size: f32,
}

fn tip_triangle() -> [Vec2; 3] {
    let s = MARKER_VIEW_BOX;
    [Vec2::new(0.0, 0.0), Vec2::new(s, 0.5 * s), Vec2::new(0.0, s)]
}

/// Escape a connector id into `[A-Za-z0-9_-]`. `_` doubles and every other
/// byte becomes `_xHH`, so distinct ids never share an escape.
fn escape_id(connector_id: &str) -> String {
    let mut out = String::with_capacity(connector_id.len());
    for b in connector_id.bytes() {
        match b {
            b'_' => out.push_str("__"),
            b'-' => out.push('-'),
            _ if b.is_ascii_alphanumeric() => out.push(b as char),
            _ => {
                let _ = write!(out, "_x{:02X}", b);
            }
        }
    }
    out
}

/// Stable DOM-safe marker id for a key, unique per connector id.
pub fn marker_id(connector_id: &str, arrow_head: ArrowHead, selected: bool) -> String {
    let mut id = format!("tether-arrow-{}-{}", escape_id(connector_id), arrow_head.as_str());
    if selected {
        id.push_str("-selected");
    }
    id
}

/// Build the marker for a key; `paint` is the connector or selection color.
pub fn synthesize(connector_id: &str, arrow_head: ArrowHead, selected: bool, paint: &str) -> MarkerDef {
    let shape = match arrow_head {
        ArrowHead::None => MarkerShape::Empty,
        ArrowHead::Line => MarkerShape::Chevron {
            points: tip_triangle(),
            stroke: paint.to_string(),
            stroke_width: CHEVRON_STROKE_WIDTH,
        },
        ArrowHead::Hollow => MarkerShape::Triangle {
            points: tip_triangle(),
            fill: HOLLOW_FILL.to_string(),
            stroke: Some(paint.to_string()),
            stroke_width: HOLLOW_STROKE_WIDTH,
        },
        ArrowHead::Filled => MarkerShape::Triangle {
            points: tip_triangle(),
            fill: paint.to_string(),
            stroke: None,
            stroke_width: 0.0,
        },
    };
    MarkerDef {
        id: marker_id(connector_id, arrow_head, selected),
        arrow_head,
        shape,
        view_box: MARKER_VIEW_BOX,
        ref_point: Vec2::new(MARKER_VIEW_BOX, 0.5 * MARKER_VIEW_BOX),
        size: MARKER_SIZE,
    }
}

/// Marker cache scoped to one engine (one board).
#[derive(Debug, Default)]
pub struct MarkerCatalog {
    entries: HashMap<String, (MarkerKey, MarkerDef)>,
    misses: u64,
}

impl MarkerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker for the key, synthesizing it on a miss. Any entry cached for the
    /// same connector under a different key is dropped.
    pub fn lookup(&mut self, key: MarkerKey, selection_color: &str) -> &MarkerDef {
        let stale = self
            .entries
            .get(&key.connector_id)
            .map_or(true, |(cached, _)| *cached != key);
        if stale {
            self.misses += 1;
            let paint = if key.selected { selection_color } else { key.color.as_str() };
            let def = synthesize(&key.connector_id, key.arrow_head, key.selected, paint);
            self.entries.insert(key.connector_id.clone(), (key.clone(), def));
        }
        &self.entries[&key.connector_id].1
    }

    pub fn get(&self, connector_id: &str) -> Option<&MarkerDef> {
        self.entries.get(connector_id).map(|(_, d)| d)
    }

    /// Drop the entry of a deleted connector.
    pub fn forget(&mut self, connector_id: &str) -> bool {
        self.entries.remove(connector_id).is_some()
    }

    /// Keep only entries for connectors still on the board.
    pub fn retain_connectors(&mut self, live: &HashSet<&str>) {
        self.entries.retain(|id, _| live.contains(id.as_str()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of synthesized markers so far.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(id: &str, kind: ArrowHead, selected: bool) -> MarkerKey {
        MarkerKey { connector_id: id.into(), arrow_head: kind, selected, color: "black".into() }
    }

    #[test]
    fn hit_reuses_entry() {
        let mut cat = MarkerCatalog::new();
        let a = cat.lookup(key("c1", ArrowHead::Filled, false), "#00f").clone();
        let b = cat.lookup(key("c1", ArrowHead::Filled, false), "#00f").clone();
        assert_eq!(a, b);
        assert_eq!(cat.misses(), 1);
    }

    #[test]
    fn key_change_purges_old_entry() {
        let mut cat = MarkerCatalog::new();
        for kind in [ArrowHead::Filled, ArrowHead::Line, ArrowHead::Hollow, ArrowHead::None] {
            for selected in [false, true] {
                cat.lookup(key("c1", kind, selected), "#00f");
            }
        }
        assert_eq!(cat.len(), 1);
        assert_eq!(cat.get("c1").map(|d| d.arrow_head), Some(ArrowHead::None));
    }

    #[test]
    fn selection_paints_with_highlight() {
        let mut cat = MarkerCatalog::new();
        let def = cat.lookup(key("c1", ArrowHead::Filled, true), "#00f");
        assert_eq!(def.id, "tether-arrow-c1-filled-selected");
        match &def.shape {
            MarkerShape::Triangle { fill, stroke, .. } => {
                assert_eq!(fill, "#00f");
                assert!(stroke.is_none());
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn hollow_is_white_filled_and_stroked() {
        let def = synthesize("c", ArrowHead::Hollow, false, "red");
        assert_eq!(
            def.shape,
            MarkerShape::Triangle {
                points: tip_triangle(),
                fill: "white".into(),
                stroke: Some("red".into()),
                stroke_width: HOLLOW_STROKE_WIDTH,
            }
        );
        assert_eq!(synthesize("c", ArrowHead::None, false, "red").shape, MarkerShape::Empty);
    }

    #[test]
    fn ids_are_dom_safe() {
        assert_eq!(marker_id("a b/c", ArrowHead::Line, false), "tether-arrow-a_x20b_x2Fc-line");
        assert_eq!(marker_id("node_7", ArrowHead::None, true), "tether-arrow-node__7-none-selected");
    }

    #[test]
    fn escaped_ids_do_not_collide() {
        let ids = ["a.b", "a_b", "a__b", "a_x2Eb", "a b", "a-b", "ab"];
        let escaped: HashSet<String> = ids.iter().map(|id| marker_id(id, ArrowHead::Filled, false)).collect();
        assert_eq!(escaped.len(), ids.len());
        assert_ne!(marker_id("a.b", ArrowHead::Filled, false), marker_id("a_b", ArrowHead::Filled, false));
    }

    #[test]
    fn retain_drops_removed_connectors() {
        let mut cat = MarkerCatalog::new();
        cat.lookup(key("a", ArrowHead::Filled, false), "#00f");
        cat.lookup(key("b", ArrowHead::Filled, false), "#00f");
        let live: HashSet<&str> = ["b"].into_iter().collect();
        cat.retain_connectors(&live);
        assert!(cat.get("a").is_none());
        assert!(cat.get("b").is_some());
        assert!(cat.forget("b"));
        assert!(cat.is_empty());
    }
}
