//! Error types for the simulation core.
//!
//! The core has no I/O of its own; errors are precondition violations on the
//! public API plus whatever loading a config file can produce.

use thiserror::Error;

use crate::sim::Phase;

/// Result type alias for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// `tick` was handed a negative step.
    #[error("negative timestep {dt}")]
    NegativeTimestep { dt: f32 },

    /// `tick` was handed NaN or infinity.
    #[error("non-finite timestep")]
    NonFiniteTimestep,

    /// `start` was refused because a droplet is still airborne.
    #[error("cannot start from {phase:?}: droplet still airborne")]
    DropletInFlight { phase: Phase },

    /// `start` while a sweep is running has no transition.
    #[error("sweep already in progress")]
    SweepInProgress,

    /// A sweep schedule needs at least one voltage.
    #[error("sweep schedule is empty")]
    EmptySchedule,

    #[error("configuration error: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
