use crate::{
    foundation::core::Canvas,
    foundation::error::{EpiError, EpiResult},
};

/// Construction-time options for a [`crate::Driver`]. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Border inset in pixels.
    pub margin: u32,
    /// Nesting depth: one curve set per cusp count `1..=max_cusps`.
    pub max_cusps: u32,
    /// Total animation time in milliseconds.
    pub duration: f64,
    /// Default delta for a manual `step`, in milliseconds.
    pub step_size: f64,
    /// Log per-tick diagnostics.
    pub debug: bool,
    /// Total spin sweep at `p = 1`, radians. Drawn at random when absent.
    pub final_angle: Option<f64>,
    /// Seed for the random `final_angle` draw.
    pub seed: Option<u64>,
    /// Caption that fades in with progress.
    pub title: Option<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            margin: 20,
            max_cusps: 20,
            duration: 10_000.0,
            step_size: 50.0,
            debug: false,
            final_angle: None,
            seed: None,
            title: None,
        }
    }
}

/// Page geometry derived from a [`DriverConfig`].
///
/// The drawing is laid out in "cusp units": the largest hub has radius `max_cusps`, and
/// `scaled_width` leaves room for the roller on either side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub eff_width: f64,
    pub eff_height: f64,
    pub scaled_width: f64,
    pub scale: f64,
    pub scaled_margin: f64,
}

impl Layout {
    /// Transform for the group that maps cusp units onto the canvas (y up, rotated a quarter
    /// turn about the largest hub's center).
    pub fn drawing_transform(&self, max_cusps: u32) -> String {
        format!(
            "scale({} {}) translate({}, {}) rotate(90 {} 0)",
            self.scale,
            -self.scale,
            self.scaled_width - 2.0 + self.scaled_margin,
            -self.scaled_width / 2.0 - self.scaled_margin,
            -f64::from(max_cusps)
        )
    }
}

impl DriverConfig {
    pub fn from_json_str(s: &str) -> EpiResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| EpiError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> EpiResult<()> {
        if self.max_cusps == 0 {
            return Err(EpiError::validation("max_cusps must be >= 1"));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(EpiError::validation("duration must be finite and > 0"));
        }
        if !self.step_size.is_finite() || self.step_size < 0.0 {
            return Err(EpiError::validation("step_size must be finite and >= 0"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(EpiError::validation("width and height must be > 0"));
        }
        if u64::from(self.margin) * 2 >= u64::from(self.width.min(self.height)) {
            return Err(EpiError::validation(
                "margin must leave a non-empty drawing area",
            ));
        }
        if let Some(a) = self.final_angle
            && !a.is_finite()
        {
            return Err(EpiError::validation("final_angle must be finite"));
        }
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn layout(&self) -> Layout {
        let margin = f64::from(self.margin);
        let eff_width = f64::from(self.width) - 2.0 * margin;
        let eff_height = f64::from(self.height) - 2.0 * margin;
        let scaled_width = 2.0 * f64::from(self.max_cusps) + 4.0;
        let scale = eff_width / scaled_width;
        Layout {
            eff_width,
            eff_height,
            scaled_width,
            scale,
            scaled_margin: margin / scale,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/config.rs"]
mod tests;
