//! Droplet Deflect - charged droplet deflection simulator
//!
//! A charged droplet leaves a nozzle, crosses the field between two parallel
//! plates and lands on a target sheet. Sweeping the plate voltage over a
//! fixed schedule shows how deflection and flight time change.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (field, integrator, sweep state machine)
//! - `config`: Physical constants, scene layout and sweep parameters
//! - `hud`: Text readouts for the presentation layer
//! - `plot`: Voltage-vs-time plot geometry

pub mod config;
pub mod error;
pub mod hud;
pub mod plot;
pub mod sim;

pub use config::{PhysicalConstants, SceneLayout, SimConfig, SweepConfig};
pub use error::{SimError, SimResult};

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the reference frame rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest step a caller should hand to `Session::tick`
    pub const MAX_DT: f32 = 1.0 / 30.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the stepper will try to catch up on
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// View dimensions (pixels)
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 600.0;

    /// Millimetres per metre, for converting plate gap to SI units
    pub const MM_PER_M: f32 = 1000.0;
}
