//! Degree angle normalization.
//!
//! Every rotation stored by the camera or a sprite goes through
//! [`normalize_angle`], so cache lookups can rely on the `[0, 360)` range.

/// Normalize an angle in degrees to the range `[0.0, 360.0)`.
///
/// Adding 360 to a tiny negative remainder can round up to exactly 360.0,
/// so the remainder is taken a second time to keep the upper bound exclusive.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut angle = angle % 360.0;
    if angle < 0.0 {
        angle += 360.0;
    }
    angle %= 360.0;
    // -0.0 % 360.0 stays negative zero
    if angle == 0.0 { 0.0 } else { angle }
}

/// Signed difference from `from` to `to`, folded into `[-180, 180]`.
///
/// Following this arc always turns the short way around.
pub fn shortest_arc(from: f64, to: f64) -> f64 {
    let diff = normalize_angle(to) - normalize_angle(from);
    if diff > 180.0 {
        diff - 360.0
    } else if diff < -180.0 {
        diff + 360.0
    } else {
        diff
    }
}
