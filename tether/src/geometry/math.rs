use super::tolerance::EPS_LEN;
use crate::model::Vec2;

/// Unit vector of (x, y), or zero for degenerate input.
#[inline]
pub fn unit(v: Vec2) -> Vec2 {
    let len = v.len();
    if len > EPS_LEN && len.is_finite() { v.scale(1.0 / len) } else { Vec2::ZERO }
}

/// Circle traced by an SVG elliptical-arc command with equal radii and no
/// rotation, drawn from `from` to `to`. Returns `(center, radius)`; the radius
/// is scaled up when the chord is longer than the diameter, matching how
/// renderers correct out-of-range radii.
pub fn arc_circle(from: Vec2, to: Vec2, radius: f32, large_arc: bool, sweep: bool) -> (Vec2, f32) {
    let hx = 0.5 * (from.x - to.x);
    let hy = 0.5 * (from.y - to.y);
    let d2 = hx * hx + hy * hy;
    let mut r = radius.abs();
    if d2 <= EPS_LEN || r <= EPS_LEN {
        return (from, r);
    }
    let lambda = d2 / (r * r);
    if lambda > 1.0 {
        r *= lambda.sqrt();
    }
    let sign = if large_arc != sweep { 1.0 } else { -1.0 };
    let coef = sign * ((r * r - d2) / d2).max(0.0).sqrt();
    let mid = from.midpoint(to);
    (Vec2::new(mid.x + coef * hy, mid.y - coef * hx), r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tolerance::approx_eq;

    #[test]
    fn arc_circle_passes_through_both_ends() {
        let a = Vec2::new(35.0, 11.0);
        let b = Vec2::new(11.0, 35.0);
        let (c, r) = arc_circle(a, b, 40.0, true, true);
        assert!(approx_eq(c.dist(a), r, 1e-3));
        assert!(approx_eq(c.dist(b), r, 1e-3));
        // large clockwise arc bulges away from the origin side
        assert!(c.x > 23.0 && c.y > 23.0);
    }

    #[test]
    fn arc_circle_grows_radius_for_long_chords() {
        let (c, r) = arc_circle(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 10.0, true, true);
        assert!(approx_eq(r, 50.0, 1e-3));
        assert!(approx_eq(c.x, 50.0, 1e-3) && approx_eq(c.y, 0.0, 1e-3));
    }
}
