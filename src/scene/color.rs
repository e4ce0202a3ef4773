use std::fmt;

/// CSS hue/saturation/lightness color with optional alpha.
///
/// Formats as `hsl(h, s%, l%)`, or `hsla(h, s%, l%, a)` once an alpha is set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsla {
    /// Degrees.
    pub h: f64,
    /// Percent, `0..=100`.
    pub s: f64,
    /// Percent, `0..=100`.
    pub l: f64,
    pub a: Option<f64>,
}

impl Hsla {
    pub fn hsl(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l, a: None }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a: Some(a), ..self }
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.a {
            None => write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l),
            Some(a) => write!(f, "hsla({}, {}%, {}%, {})", self.h, self.s, self.l, a),
        }
    }
}
