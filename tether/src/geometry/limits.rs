// Centralized bounds to harden against hostile connector snapshots (JSON/JS)

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;
pub const STROKE_WIDTH_MAX: f32 = 1_000.0;

// Snapshot caps
pub const MAX_CONNECTORS_PER_PASS: usize = 100_000;
pub const MAX_ID_LEN: usize = 256;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn point_in_coord_bounds(x: f32, y: f32) -> bool { in_coord_bounds(x) && in_coord_bounds(y) }

#[inline]
pub fn in_stroke_bounds(w: f32) -> bool { w.is_finite() && w > 0.0 && w <= STROKE_WIDTH_MAX }
