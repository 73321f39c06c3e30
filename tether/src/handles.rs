use crate::bounds::ContainerRect;
use crate::endpoint::ResolvedEndpoints;
use crate::model::Vec2;
use crate::path::PathShape;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    Origin,
    Destination,
    Control,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    pub kind: HandleKind,
    /// Board-space position, for hit-testing and drag feedback.
    pub board: Vec2,
    /// Position inside the container.
    pub local: Vec2,
    pub radius: f32,
}

/// Where the curve-control handle goes: the explicit control point, the loop
/// center for synthesized loops, else the chord midpoint. Relative space.
pub fn control_handle_point(resolved: &ResolvedEndpoints, shape: &PathShape) -> Vec2 {
    match (resolved.control, shape) {
        (Some(c), _) => c,
        (None, PathShape::SelfLoop(l)) => l.loop_center,
        (None, _) => shape.start().midpoint(shape.end()),
    }
}

/// Free ends get a drag handle; the control handle is always present.
pub fn layout_handles(
    resolved: &ResolvedEndpoints,
    shape: &PathShape,
    container: &ContainerRect,
    handle_size: f32,
) -> Vec<Handle> {
    let origin = resolved.board_origin;
    let make = |kind, rel: Vec2| Handle {
        kind,
        board: rel.add(origin),
        local: container.to_local(rel),
        radius: 0.5 * handle_size,
    };

    let mut out = Vec::with_capacity(3);
    if !resolved.origin.is_attached() {
        out.push(make(HandleKind::Origin, shape.start()));
    }
    if !resolved.destination.is_attached() {
        out.push(make(HandleKind::Destination, shape.end()));
    }
    out.push(make(HandleKind::Control, control_handle_point(resolved, shape)));
    out
}

/// Nearest handle within `tol` of the board-space point. Ties go to the
/// control handle, which is drawn on top.
pub fn pick_handle(handles: &[Handle], x: f32, y: f32, tol: f32) -> Option<&Handle> {
    let mut best: Option<(&Handle, f32)> = None;
    for h in handles {
        let reach = tol + h.radius;
        let d2 = (h.board.x - x).powi(2) + (h.board.y - y).powi(2);
        if d2 > reach * reach {
            continue;
        }
        let better = match best {
            None => true,
            Some((b, bd)) => d2 < bd || (d2 == bd && h.kind == HandleKind::Control && b.kind != HandleKind::Control),
        };
        if better {
            best = Some((h, d2));
        }
    }
    best.map(|(h, _)| h)
}
