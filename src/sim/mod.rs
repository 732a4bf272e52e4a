//! Deterministic simulation module
//!
//! Everything physical lives here. This module must stay pure and
//! deterministic:
//! - Time only advances through `Session::tick`
//! - One timestamp per tick, shared by everything recorded in it
//! - No rendering or platform dependencies

pub mod droplet;
pub mod field;
pub mod geometry;
pub mod ledger;
pub mod series;
pub mod session;
pub mod stepper;
pub mod sweep;

pub use droplet::{Droplet, FlightOutcome};
pub use field::FieldModel;
pub use geometry::Geometry;
pub use ledger::{ImpactLedger, ImpactRecord};
pub use series::{TimeSample, TimeSeriesRecorder};
pub use session::{MAX_PENDING_EVENTS, Session, SimEvent, Snapshot};
pub use stepper::FixedStepper;
pub use sweep::{Phase, SweepAction, SweepController, SweepSchedule, SweepState};
