//! Fixed-step accumulator
//!
//! Wall-clock frame time goes in, a whole number of simulation steps comes
//! out. Long frames are clamped and substeps capped to avoid a spiral of death.

use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f64,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `elapsed` milliseconds; returns how many `SIM_DT` steps to run
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_TIME)
        } else {
            0.0
        };
        self.accumulator += f64::from(elapsed);
        let dt = f64::from(SIM_DT);
        let mut steps = 0;
        while self.accumulator + 1e-6 >= dt && steps < MAX_SUBSTEPS {
            self.accumulator -= dt;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS && self.accumulator >= dt {
            // Drop the backlog rather than carry it forever
            self.accumulator = 0.0;
        }
        steps
    }

    /// Fraction of a step left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / f64::from(SIM_DT)).clamp(0.0, 1.0) as f32
    }
}
