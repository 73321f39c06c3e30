//! Ray/rectangle intersection for attaching connectors to item edges.

use crate::geometry::tolerance::{near_zero, EPS_LEN};
use crate::model::{RectBounds, Vec2};

/// Point where the ray from the rectangle center toward `(target_x, target_y)`
/// leaves the axis-aligned rectangle of the given size.
///
/// Never returns NaN: non-finite input, a non-positive size, or a target equal
/// to the center all yield the center (with non-finite center parts replaced
/// by zero).
pub fn resolve_edge_point(
    center_x: f32,
    center_y: f32,
    target_x: f32,
    target_y: f32,
    width: f32,
    height: f32,
) -> Vec2 {
    let fallback = Vec2::new(
        if center_x.is_finite() { center_x } else { 0.0 },
        if center_y.is_finite() { center_y } else { 0.0 },
    );
    let all_finite = [center_x, center_y, target_x, target_y, width, height]
        .iter()
        .all(|v| v.is_finite());
    if !all_finite || width <= 0.0 || height <= 0.0 {
        return fallback;
    }

    let dx = target_x - center_x;
    let dy = target_y - center_y;
    if near_zero(dx, EPS_LEN) && near_zero(dy, EPS_LEN) {
        return fallback;
    }

    let scale_x = if dx == 0.0 { f32::INFINITY } else { (width * 0.5) / dx.abs() };
    let scale_y = if dy == 0.0 { f32::INFINITY } else { (height * 0.5) / dy.abs() };
    let scale = scale_x.min(scale_y);

    let p = Vec2::new(center_x + dx * scale, center_y + dy * scale);
    if p.is_finite() { p } else { fallback }
}

/// `resolve_edge_point` for an item rectangle.
#[inline]
pub fn edge_point_toward(bounds: &RectBounds, target: Vec2) -> Vec2 {
    resolve_edge_point(
        bounds.center_x,
        bounds.center_y,
        target.x,
        target.y,
        bounds.width,
        bounds.height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tolerance::{approx_eq, EPS_POS};

    fn close(a: Vec2, b: Vec2) -> bool {
        approx_eq(a.x, b.x, EPS_POS) && approx_eq(a.y, b.y, EPS_POS)
    }

    #[test]
    fn exits_through_the_binding_edge() {
        let p = resolve_edge_point(0.0, 0.0, 100.0, 10.0, 40.0, 40.0);
        assert!(close(p, Vec2::new(20.0, 2.0)), "{p:?}");
        let q = resolve_edge_point(0.0, 0.0, 10.0, -100.0, 40.0, 40.0);
        assert!(close(q, Vec2::new(2.0, -20.0)), "{q:?}");
    }

    #[test]
    fn axis_aligned_targets() {
        assert!(close(resolve_edge_point(5.0, 5.0, 5.0, 50.0, 10.0, 20.0), Vec2::new(5.0, 15.0)));
        assert!(close(resolve_edge_point(5.0, 5.0, -50.0, 5.0, 10.0, 20.0), Vec2::new(0.0, 5.0)));
    }

    #[test]
    fn target_at_center_returns_center() {
        assert_eq!(resolve_edge_point(3.0, 4.0, 3.0, 4.0, 10.0, 10.0), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn non_finite_center_falls_back_to_zero() {
        assert_eq!(resolve_edge_point(f32::NAN, 4.0, 1.0, 1.0, 10.0, 10.0), Vec2::new(0.0, 4.0));
        assert_eq!(resolve_edge_point(1.0, 2.0, f32::INFINITY, 1.0, 10.0, 10.0), Vec2::new(1.0, 2.0));
    }
}
