use crate::{
    foundation::core::{Point, fixed3},
    foundation::error::{EpiError, EpiResult},
    geometry::angle::{PI, TAU},
};

/// Samples per cusp. Controls curve smoothness.
pub const POINT_DENSITY: usize = 50;

/// Point table and progressive path strings for one epicycloid.
///
/// A roller of radius 1 rolls outside a hub of radius `cusps`; the pen sits on the roller rim.
/// The table is computed once at construction. [`EpiCycloid::path_to`] only slices a prebuilt
/// string, so it is cheap enough to call for every curve on every frame.
#[derive(Clone, Debug)]
pub struct EpiCycloid {
    cusps: u32,
    points: Vec<Point>,
    // "M x0 y0 L x1 y1 ..." for the whole table.
    path: String,
    // path[..ends[k]] is the path through point k.
    ends: Vec<usize>,
}

impl EpiCycloid {
    /// Build the point table for `cusps` cusps. Zero cusps is rejected.
    pub fn new(cusps: u32) -> EpiResult<Self> {
        if cusps == 0 {
            return Err(EpiError::validation("epicycloid cusp count must be >= 1"));
        }

        let total = cusps as usize * POINT_DENSITY;
        let last = (total - 1) as f64;
        let points: Vec<Point> = (0..total)
            .map(|i| point_on(cusps, TAU * i as f64 / last))
            .collect();

        let mut path = String::with_capacity(total * 20);
        let mut ends = Vec::with_capacity(total);
        for (i, p) in points.iter().enumerate() {
            path.push_str(if i == 0 { "M " } else { " L " });
            path.push_str(&fixed3(p.x));
            path.push(' ');
            path.push_str(&fixed3(p.y));
            ends.push(path.len());
        }

        Ok(Self {
            cusps,
            points,
            path,
            ends,
        })
    }

    pub fn cusps(&self) -> u32 {
        self.cusps
    }

    /// `cusps * POINT_DENSITY`.
    pub fn total_points(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Pen position at `angle` (radians of roller travel around the hub).
    pub fn point(&self, angle: f64) -> Point {
        point_on(self.cusps, angle)
    }

    /// Number of table points revealed at `angle`, in `1..=total_points()`.
    ///
    /// Negative and NaN angles clamp to the lone move-to point; angles past a full turn clamp to
    /// the whole table.
    pub fn points_revealed(&self, angle: f64) -> usize {
        let total = self.total_points();
        if !(angle > 0.0) {
            return 1;
        }
        let n = (total as f64 * angle / TAU + 1.0).min(total as f64);
        (n.floor() as usize).clamp(1, total)
    }

    /// Path description through every point revealed at `angle`.
    pub fn path_to(&self, angle: f64) -> &str {
        let k = self.points_revealed(angle);
        &self.path[..self.ends[k - 1]]
    }
}

fn point_on(cusps: u32, angle: f64) -> Point {
    let roll_radius = 1.0 + f64::from(cusps);
    let pen_angle = (1.0 + f64::from(cusps)) * angle - PI;
    Point::new(
        roll_radius * angle.cos() + pen_angle.cos(),
        roll_radius * angle.sin() + pen_angle.sin(),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/epicycloid.rs"]
mod tests;
