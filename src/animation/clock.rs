/// Synthetic display clock for headless hosts: one timestamp per refresh at a fixed rate.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    interval_ms: f64,
    ticks: u64,
}

impl FrameClock {
    /// `fps` must be positive; zero is treated as 1.
    pub fn new(fps: u32) -> Self {
        Self {
            interval_ms: 1000.0 / f64::from(fps.max(1)),
            ticks: 0,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Timestamp of the next refresh, starting at 0.
    pub fn next_timestamp(&mut self) -> f64 {
        let t = self.ticks as f64 * self.interval_ms;
        self.ticks += 1;
        t
    }
}
