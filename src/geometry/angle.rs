//! Angle helpers. Everything is in radians except [`degrees`].

pub use std::f64::consts::{PI, TAU};

/// Normalize an angle into `[0, TAU)`.
///
/// Uses a double remainder rather than `rem_euclid`, which can round up to exactly `TAU` for
/// tiny negative inputs.
pub fn normalized(a: f64) -> f64 {
    ((a % TAU) + TAU) % TAU
}

/// Center an angle into `[-PI, PI)`.
pub fn centered(a: f64) -> f64 {
    normalized(a + PI) - PI
}

/// Radians to degrees.
pub fn degrees(a: f64) -> f64 {
    a * 180.0 / PI
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/angle.rs"]
mod tests;
