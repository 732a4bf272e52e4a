//! Fixed-timestep driver
//!
//! Turns variable frame times into fixed `SIM_DT` ticks so the physics
//! never sees a large step.

use super::session::Session;
use crate::consts::{MAX_DT, MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};
use crate::error::{SimError, SimResult};

#[derive(Debug, Clone)]
pub struct FixedStepper {
    dt: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStepper {
    /// `dt` is capped at `MAX_DT`
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt: dt.min(MAX_DT),
            max_substeps,
            accumulator: 0.0,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Leftover time not yet simulated
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Feed one frame's worth of wall time; returns the number of ticks run.
    ///
    /// Frame time is clamped to `[0, MAX_FRAME_TIME]`.
    pub fn advance(&mut self, session: &mut Session, frame_time: f32) -> SimResult<u32> {
        if !frame_time.is_finite() {
            return Err(SimError::NonFiniteTimestep);
        }
        self.accumulator += frame_time.clamp(0.0, MAX_FRAME_TIME);

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            session.tick(self.dt)?;
            self.accumulator -= self.dt;
            substeps += 1;
        }
        Ok(substeps)
    }
}
