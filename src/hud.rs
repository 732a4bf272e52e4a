//! HUD readouts
//!
//! Text the presentation layer draws over the scene. Simulated time runs
//! slowed down by the visual scale, so times are converted to bench
//! milliseconds before display.

use crate::sim::{Session, SweepSchedule};

/// Simulated seconds to displayed milliseconds
pub const TIME_DISPLAY_SCALE: f64 = 0.1;
/// Nozzle-to-nozzle latency not covered by the simulated flight
pub const UNCHARGED_OFFSET_MS: f64 = 0.025;
/// Charge-up latency of the plate supply over a whole sweep
pub const SWEEP_OFFSET_MS: f64 = 0.4;

/// Convert a simulated duration to displayed milliseconds
#[inline]
pub fn display_ms(seconds: f64, offset_ms: f64) -> f64 {
    seconds * TIME_DISPLAY_SCALE + offset_ms
}

/// Plate voltage; schedule values are kV
pub fn voltage_label(kilovolts: f32) -> String {
    format!("Sweeping Voltage: {:.2} v", kilovolts * 1000.0)
}

pub fn charge_label(charge: f32) -> String {
    format!("Droplet Charge: {charge:.2e} C")
}

pub fn uncharged_time_label(seconds: Option<f64>) -> String {
    format!(
        "Uncharged Time: {:.3} ms",
        display_ms(seconds.unwrap_or(0.0), UNCHARGED_OFFSET_MS)
    )
}

pub fn sweep_time_label(schedule: &SweepSchedule, seconds: Option<f64>) -> String {
    format!(
        "Total Time From ({}KV to {}KV): {:.2} ms",
        schedule.first().unwrap_or_default(),
        schedule.last().unwrap_or_default(),
        display_ms(seconds.unwrap_or(0.0), SWEEP_OFFSET_MS)
    )
}

/// All HUD lines, top to bottom
pub fn lines(session: &Session) -> Vec<String> {
    vec![
        voltage_label(session.voltage()),
        charge_label(session.constants().charge),
        uncharged_time_label(session.uncharged_flight_time()),
        sweep_time_label(session.schedule(), session.total_sweep_time()),
    ]
}
