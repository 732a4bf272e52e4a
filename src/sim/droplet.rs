//! Droplet entity and its integrator
//!
//! Semi-implicit Euler: velocity first, then position. Terminal conditions
//! are checked once per step, without sub-stepping, so a droplet that
//! overshoots the target plane lands at whatever y it has after the step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Geometry;

/// Result of advancing a droplet by one step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FlightOutcome {
    /// Droplet was not airborne; nothing moved
    Grounded,
    /// Still flying
    InFlight,
    /// Crossed the target plane at this position
    Landed { x: f32, y: f32 },
    /// Left the visible vertical span before reaching the target
    LeftBounds,
}

impl FlightOutcome {
    #[inline]
    pub fn crossed_target(&self) -> bool {
        matches!(self, FlightOutcome::Landed { .. })
    }

    #[inline]
    pub fn left_bounds(&self) -> bool {
        matches!(self, FlightOutcome::LeftBounds)
    }

    /// Whether this step ended the flight
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.crossed_target() || self.left_bounds()
    }
}

/// The single charged droplet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Droplet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub airborne: bool,
}

impl Droplet {
    /// A droplet resting at the launch point
    pub fn at_rest(launch: Vec2) -> Self {
        Self {
            pos: launch,
            vel: Vec2::ZERO,
            airborne: false,
        }
    }

    /// Reset to the launch point and fire along the flight axis
    pub fn fire(&mut self, launch: Vec2, muzzle_speed: f32) {
        self.pos = launch;
        self.vel = Vec2::new(muzzle_speed, 0.0);
        self.airborne = true;
    }

    /// Drop out of flight without landing (explicit reset)
    pub fn ground(&mut self) {
        self.airborne = false;
    }

    /// Advance one step under `accel`.
    ///
    /// Leaving the vertical span wins over crossing the target in the same
    /// step: an off-screen droplet never produces an impact.
    pub fn advance(&mut self, accel: Vec2, dt: f32, geometry: &Geometry) -> FlightOutcome {
        if !self.airborne {
            return FlightOutcome::Grounded;
        }

        self.vel += accel * dt;
        self.pos += self.vel * dt;

        if !geometry.in_view(self.pos.y) {
            self.airborne = false;
            return FlightOutcome::LeftBounds;
        }
        if self.pos.x >= geometry.target_x {
            self.airborne = false;
            return FlightOutcome::Landed {
                x: geometry.target_x,
                y: self.pos.y,
            };
        }
        FlightOutcome::InFlight
    }

    /// Speed in scene units (pixels/s)
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Speed converted back to metres per second
    pub fn speed_mps(&self, geometry: &Geometry) -> f32 {
        self.speed() / geometry.speed_scale
    }
}
