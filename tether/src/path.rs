//! Connector path construction: straight, curved through a control point, or
//! a loop back onto the same item.
//!
//! Shapes are built in relative space; [`PathShape::segments`] re-expresses
//! them in the container's local space.

use crate::anchor::edge_point_toward;
use crate::endpoint::ResolvedEndpoints;
use crate::geometry::cubic::CubicBezier;
use crate::geometry::math::{arc_circle, unit};
use crate::geometry::tolerance::{clamp, EPS_LEN};
use crate::model::{RectBounds, Vec2};
use serde::Serialize;

// Empirically tuned curvature knobs. Kept as named values pending a design
// review; they are not derived from anything.
pub const CURVE_HANDLE_SCALE: f32 = 0.22;
pub const END_HANDLE_SCALE: f32 = 0.0;

pub const LOOP_RADIUS_FACTOR: f32 = 0.5;
pub const LOOP_RADIUS_MIN: f32 = 40.0;
pub const LOOP_RADIUS_MAX: f32 = 300.0;
pub const LOOP_MARGIN_FACTOR: f32 = 0.15;
pub const LOOP_MARGIN_MIN: f32 = 12.0;
pub const LOOP_MARGIN_MAX: f32 = 48.0;
// Exit targets as fractions of width/height into the lower-right quadrant.
pub const LOOP_EXIT_NEAR: f32 = 0.25;
pub const LOOP_EXIT_FAR: f32 = 0.75;
/// Arrowhead angle on loops, in degrees (pointing up in a y-down space).
pub const LOOP_MARKER_ANGLE: f32 = -90.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    Straight,
    Curved,
    SelfLoop,
}

/// Vector path command in container-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum PathSegment {
    Move { to: Vec2 },
    Line { to: Vec2 },
    Cubic { c1: Vec2, c2: Vec2, to: Vec2 },
    /// Circular arc with SVG endpoint semantics.
    Arc {
        radius: f32,
        #[serde(rename = "largeArc")]
        large_arc: bool,
        sweep: bool,
        to: Vec2,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", content = "angle", rename_all = "lowercase")]
pub enum MarkerOrient {
    /// Follow the tangent of the final segment.
    Auto,
    Fixed(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelfLoop {
    pub start: Vec2,
    pub end: Vec2,
    pub radius: f32,
    /// Synthesized loop-circle center; doubles as the loop's control handle.
    pub loop_center: Vec2,
    /// Circle the arc command actually traces.
    pub arc_center: Vec2,
    pub arc_radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathShape {
    Straight { start: Vec2, end: Vec2 },
    /// Two cubics meeting at the control point (`first.p3 == second.p0`).
    Curved { first: CubicBezier, second: CubicBezier },
    SelfLoop(SelfLoop),
}

impl PathShape {
    pub fn kind(&self) -> PathKind {
        match self {
            PathShape::Straight { .. } => PathKind::Straight,
            PathShape::Curved { .. } => PathKind::Curved,
            PathShape::SelfLoop(_) => PathKind::SelfLoop,
        }
    }

    pub fn start(&self) -> Vec2 {
        match self {
            PathShape::Straight { start, .. } => *start,
            PathShape::Curved { first, .. } => first.p0,
            PathShape::SelfLoop(l) => l.start,
        }
    }

    pub fn end(&self) -> Vec2 {
        match self {
            PathShape::Straight { end, .. } => *end,
            PathShape::Curved { second, .. } => second.p3,
            PathShape::SelfLoop(l) => l.end,
        }
    }

    pub fn marker_orient(&self) -> MarkerOrient {
        match self {
            PathShape::SelfLoop(_) => MarkerOrient::Fixed(LOOP_MARKER_ANGLE),
            _ => MarkerOrient::Auto,
        }
    }

    /// Points whose bounding box contains the drawn path.
    pub fn extent_points(&self) -> Vec<Vec2> {
        match self {
            PathShape::Straight { start, end } => vec![*start, *end],
            PathShape::Curved { first, second } => {
                let mut pts = first.points().to_vec();
                pts.extend_from_slice(&second.points()[1..]);
                pts
            }
            PathShape::SelfLoop(l) => {
                let (c, r) = (l.arc_center, l.arc_radius);
                vec![
                    l.start,
                    l.end,
                    Vec2::new(c.x - r, c.y - r),
                    Vec2::new(c.x + r, c.y + r),
                ]
            }
        }
    }

    pub fn is_finite(&self) -> bool {
        self.extent_points().iter().all(|p| p.is_finite())
    }

    /// Path commands shifted so that `local_origin` becomes (0, 0).
    pub fn segments(&self, local_origin: Vec2) -> Vec<PathSegment> {
        let l = |p: Vec2| p.sub(local_origin);
        match self {
            PathShape::Straight { start, end } => vec![
                PathSegment::Move { to: l(*start) },
                PathSegment::Line { to: l(*end) },
            ],
            PathShape::Curved { first, second } => vec![
                PathSegment::Move { to: l(first.p0) },
                PathSegment::Cubic { c1: l(first.p1), c2: l(first.p2), to: l(first.p3) },
                PathSegment::Cubic { c1: l(second.p1), c2: l(second.p2), to: l(second.p3) },
            ],
            PathShape::SelfLoop(lp) => vec![
                PathSegment::Move { to: l(lp.start) },
                PathSegment::Arc { radius: lp.radius, large_arc: true, sweep: true, to: l(lp.end) },
            ],
        }
    }
}

/// Which of the three shapes applies, in priority order: loop, curve, line.
pub fn choose_path_kind(resolved: &ResolvedEndpoints, curve_tolerance: f32) -> PathKind {
    if resolved.is_self_connection && resolved.origin.bounds.is_some() {
        return PathKind::SelfLoop;
    }
    match resolved.control {
        Some(c) if c.dist(resolved.origin.point.midpoint(resolved.destination.point)) > curve_tolerance => {
            PathKind::Curved
        }
        _ => PathKind::Straight,
    }
}

pub fn build_path(resolved: &ResolvedEndpoints, curve_tolerance: f32) -> PathShape {
    let start = resolved.origin.point;
    let end = resolved.destination.point;
    match (choose_path_kind(resolved, curve_tolerance), resolved.origin.bounds, resolved.control) {
        (PathKind::SelfLoop, Some(b), _) => PathShape::SelfLoop(self_loop(&b)),
        (PathKind::Curved, _, Some(c)) => {
            let (first, second) = curve_through(start, c, end);
            PathShape::Curved { first, second }
        }
        _ => PathShape::Straight { start, end },
    }
}

/// Two cubics start→control→end sharing the tangent direction at `control`.
///
/// End-side handles sit on the endpoints, so the path leaves and enters them
/// straight. Mid-side handles extend `CURVE_HANDLE_SCALE` of each segment's
/// length along the join tangent, the normalized sum of both chord directions.
pub fn curve_through(start: Vec2, control: Vec2, end: Vec2) -> (CubicBezier, CubicBezier) {
    let v1 = control.sub(start);
    let v2 = end.sub(control);
    let (len1, len2) = (v1.len(), v2.len());
    let d1 = unit(v1);
    let d2 = unit(v2);

    let sum = d1.add(d2);
    let t = if sum.len() > EPS_LEN { unit(sum) } else { d1 };

    let first = CubicBezier::new(
        start,
        start.add(d1.scale(END_HANDLE_SCALE * len1)),
        control.sub(t.scale(CURVE_HANDLE_SCALE * len1)),
        control,
    );
    let second = CubicBezier::new(
        control,
        control.add(t.scale(CURVE_HANDLE_SCALE * len2)),
        end.sub(d2.scale(END_HANDLE_SCALE * len2)),
        end,
    );
    (first, second)
}

/// Loop radius and margin for an item of the given size.
pub fn loop_metrics(width: f32, height: f32) -> (f32, f32) {
    let avg = 0.5 * (width + height);
    (
        clamp(LOOP_RADIUS_FACTOR * avg, LOOP_RADIUS_MIN, LOOP_RADIUS_MAX),
        clamp(LOOP_MARGIN_FACTOR * avg, LOOP_MARGIN_MIN, LOOP_MARGIN_MAX),
    )
}

/// Loop leaving through the right edge and returning through the bottom edge.
pub fn self_loop(bounds: &RectBounds) -> SelfLoop {
    let (radius, margin) = loop_metrics(bounds.width, bounds.height);
    let center = bounds.center();
    let diag = std::f32::consts::FRAC_1_SQRT_2;
    let loop_center = center.add(Vec2::new(diag, diag).scale(radius + margin));

    let exit = Vec2::new(
        center.x + LOOP_EXIT_FAR * bounds.width,
        center.y + LOOP_EXIT_NEAR * bounds.height,
    );
    let entry = Vec2::new(
        center.x + LOOP_EXIT_NEAR * bounds.width,
        center.y + LOOP_EXIT_FAR * bounds.height,
    );
    let start = edge_point_toward(bounds, exit);
    let end = edge_point_toward(bounds, entry);
    let (arc_center, arc_radius) = arc_circle(start, end, radius, true, true);

    SelfLoop { start, end, radius, loop_center, arc_center, arc_radius }
}
