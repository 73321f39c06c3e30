//! Container rectangle sizing for a connector's drawing surface.

use crate::config::EngineConfig;
use crate::geometry::tolerance::clamp;
use crate::model::Vec2;
use crate::path::PathShape;
use serde::Serialize;

pub const BULGE_PADDING_FACTOR: f32 = 0.35;
pub const MAX_DYNAMIC_PADDING: f32 = 200.0;
/// Slack added on top of arrowhead overshoot and handle size.
pub const PADDING_SLACK: f32 = 10.0;

/// Axis-aligned rectangle in relative space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ContainerRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ContainerRect {
    #[inline]
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn to_local(&self, p: Vec2) -> Vec2 {
        p.sub(self.top_left())
    }

    /// Smallest distance from `p` to any edge; negative when outside.
    pub fn inset_of(&self, p: Vec2) -> f32 {
        let left = p.x - self.x;
        let top = p.y - self.y;
        let right = self.x + self.width - p.x;
        let bottom = self.y + self.height - p.y;
        left.min(top).min(right).min(bottom)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.inset_of(p) >= 0.0
    }
}

/// Padding floor that always fits the arrowhead and a handle.
pub fn base_padding(config: &EngineConfig) -> f32 {
    config
        .min_padding
        .max(config.marker_extension() + config.handle_size + PADDING_SLACK)
}

/// Extra room for strongly bent curves, from the control point's distance to
/// the chord midpoint.
pub fn dynamic_padding(start: Vec2, end: Vec2, control: Vec2) -> f32 {
    let bulge = control.dist(start.midpoint(end));
    if !bulge.is_finite() {
        return 0.0;
    }
    clamp(BULGE_PADDING_FACTOR * bulge, 0.0, MAX_DYNAMIC_PADDING)
}

pub fn padding_for(config: &EngineConfig, start: Vec2, end: Vec2, control: Option<Vec2>) -> f32 {
    let base = base_padding(config);
    match control {
        Some(c) => base.max(dynamic_padding(start, end, c)),
        None => base,
    }
}

/// Bounding box of the path plus any control/handle point, grown by the
/// padding. `explicit_control` drives dynamic padding; `handle_point` is only
/// included in the box (the loop center for self-loops).
pub fn container_for(
    shape: &PathShape,
    explicit_control: Option<Vec2>,
    handle_point: Option<Vec2>,
    config: &EngineConfig,
) -> (ContainerRect, f32) {
    let mut pts = shape.extent_points();
    pts.extend(explicit_control);
    pts.extend(handle_point);

    let (mut minx, mut miny) = (f32::INFINITY, f32::INFINITY);
    let (mut maxx, mut maxy) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for p in &pts {
        minx = minx.min(p.x);
        miny = miny.min(p.y);
        maxx = maxx.max(p.x);
        maxy = maxy.max(p.y);
    }

    let padding = padding_for(config, shape.start(), shape.end(), explicit_control);
    let rect = ContainerRect {
        x: minx - padding,
        y: miny - padding,
        width: (maxx - minx) + 2.0 * padding,
        height: (maxy - miny) + 2.0 * padding,
    };
    (rect, padding)
}
