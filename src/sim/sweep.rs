//! Voltage sweep state machine
//!
//! ```text
//! Idle --start--> ArmedSingle --start (landed)--> Sweeping --schedule done--> Done
//!   ^                                                                        |
//!   +------------------------------ start -----------------------------------+
//! ```
//!
//! The controller decides *what* happens; the session owns the droplet and
//! recorders and carries out the returned [`SweepAction`].

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Longest schedule a stepped range may expand to
const MAX_SCHEDULE_LEN: usize = 10_000;

/// Session phase as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the first start
    Idle,
    /// Uncharged reference shot fired, not sweeping
    ArmedSingle,
    /// Stepping through the schedule
    Sweeping,
    /// Schedule exhausted
    Done,
}

/// Ordered, immutable list of plate voltages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleRepr")]
pub struct SweepSchedule {
    voltages: Vec<f32>,
}

/// Unchecked wire form; every decoded schedule goes through `new`
#[derive(Deserialize)]
struct ScheduleRepr {
    voltages: Vec<f32>,
}

impl TryFrom<ScheduleRepr> for SweepSchedule {
    type Error = SimError;

    fn try_from(repr: ScheduleRepr) -> SimResult<Self> {
        Self::new(repr.voltages)
    }
}

impl SweepSchedule {
    pub fn new(voltages: Vec<f32>) -> SimResult<Self> {
        if voltages.is_empty() {
            return Err(SimError::EmptySchedule);
        }
        if let Some(bad) = voltages.iter().find(|v| !v.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "schedule voltage {bad} is not finite"
            )));
        }
        Ok(Self { voltages })
    }

    /// `start`, `start ± step`, ... up to and including `end` when it
    /// falls on a step. Values are computed from the step count, so they
    /// do not drift.
    pub fn stepped(start: f32, end: f32, step: f32) -> SimResult<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "sweep step must be positive, got {step}"
            )));
        }
        if !(start.is_finite() && end.is_finite()) {
            return Err(SimError::InvalidConfig("sweep range must be finite".into()));
        }

        let steps = ((end - start).abs() / step + 1e-4).floor() as usize;
        if steps >= MAX_SCHEDULE_LEN {
            return Err(SimError::InvalidConfig(format!(
                "sweep range expands to {} steps",
                steps + 1
            )));
        }
        let direction = if end < start { -1.0 } else { 1.0 };
        let voltages = (0..=steps)
            .map(|i| start + direction * step * i as f32)
            .collect();
        Self::new(voltages)
    }

    pub fn len(&self) -> usize {
        self.voltages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.voltages.get(index).copied()
    }

    pub fn first(&self) -> Option<f32> {
        self.voltages.first().copied()
    }

    pub fn last(&self) -> Option<f32> {
        self.voltages.last().copied()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.voltages
    }
}

/// Phase plus the data that only exists in that phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SweepState {
    Idle,
    ArmedSingle {
        /// When the uncharged shot left the nozzle
        fired_at: f64,
    },
    Sweeping {
        index: usize,
        started_at: f64,
        /// Time since the current flight ended; `None` while airborne
        settle: Option<f32>,
    },
    Done {
        started_at: f64,
        finished_at: f64,
    },
}

/// What the session must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SweepAction {
    /// Fire the uncharged reference shot
    Arm,
    /// Fire at `voltage` and record a sample; index 0 begins the sweep
    Fire { index: usize, voltage: f32 },
    /// Schedule exhausted; record the closing sample
    Finish { voltage: f32, total_time: f64 },
    /// Returned to idle with timing statistics cleared
    Clear,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepController {
    schedule: SweepSchedule,
    settle_delay: f32,
    state: SweepState,
    voltage: f32,
    uncharged_flight_time: Option<f64>,
    total_sweep_time: Option<f64>,
}

impl SweepController {
    pub fn new(schedule: SweepSchedule, settle_delay: f32) -> Self {
        Self {
            schedule,
            settle_delay,
            state: SweepState::Idle,
            voltage: 0.0,
            uncharged_flight_time: None,
            total_sweep_time: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            SweepState::Idle => Phase::Idle,
            SweepState::ArmedSingle { .. } => Phase::ArmedSingle,
            SweepState::Sweeping { .. } => Phase::Sweeping,
            SweepState::Done { .. } => Phase::Done,
        }
    }

    pub fn state(&self) -> &SweepState {
        &self.state
    }

    /// Position in the schedule; `schedule.len()` once the sweep is done
    pub fn index(&self) -> usize {
        match self.state {
            SweepState::Sweeping { index, .. } => index,
            SweepState::Done { .. } => self.schedule.len(),
            _ => 0,
        }
    }

    /// Current plate voltage
    pub fn voltage(&self) -> f32 {
        self.voltage
    }

    pub fn schedule(&self) -> &SweepSchedule {
        &self.schedule
    }

    pub fn settle_delay(&self) -> f32 {
        self.settle_delay
    }

    /// Time since the current sweep flight ended, if it has
    pub fn settle_elapsed(&self) -> Option<f32> {
        match self.state {
            SweepState::Sweeping { settle, .. } => settle,
            _ => None,
        }
    }

    /// Flight time of the uncharged reference shot
    pub fn uncharged_flight_time(&self) -> Option<f64> {
        self.uncharged_flight_time
    }

    /// Start-to-finish duration of the last completed sweep
    pub fn total_sweep_time(&self) -> Option<f64> {
        self.total_sweep_time
    }

    /// Handle the start intent.
    ///
    /// Refused (with no state change) while a droplet is airborne or while
    /// a sweep is running.
    pub fn start(&mut self, now: f64, droplet_airborne: bool) -> SimResult<SweepAction> {
        match self.state {
            SweepState::Sweeping { .. } => Err(SimError::SweepInProgress),
            _ if droplet_airborne => Err(SimError::DropletInFlight {
                phase: self.phase(),
            }),
            SweepState::Idle => {
                self.voltage = 0.0;
                self.clear_stats();
                self.state = SweepState::ArmedSingle { fired_at: now };
                Ok(SweepAction::Arm)
            }
            SweepState::ArmedSingle { .. } => {
                let voltage = self.schedule.first().ok_or(SimError::EmptySchedule)?;
                self.voltage = voltage;
                self.total_sweep_time = None;
                self.state = SweepState::Sweeping {
                    index: 0,
                    started_at: now,
                    settle: None,
                };
                Ok(SweepAction::Fire { index: 0, voltage })
            }
            SweepState::Done { .. } => {
                self.voltage = 0.0;
                self.clear_stats();
                self.state = SweepState::Idle;
                Ok(SweepAction::Clear)
            }
        }
    }

    /// The live droplet stopped flying; `landed` is false when it left the
    /// view instead of reaching the target.
    pub fn flight_ended(&mut self, now: f64, landed: bool) {
        match &mut self.state {
            SweepState::ArmedSingle { fired_at } => {
                if landed && self.uncharged_flight_time.is_none() {
                    self.uncharged_flight_time = Some(now - *fired_at);
                }
            }
            SweepState::Sweeping { settle, .. } => *settle = Some(0.0),
            _ => {}
        }
    }

    /// Count settle time while no droplet is airborne and advance the
    /// schedule once the delay has passed.
    pub fn poll(&mut self, now: f64, dt: f32) -> Option<SweepAction> {
        let SweepState::Sweeping {
            index,
            started_at,
            settle: Some(elapsed),
        } = self.state
        else {
            return None;
        };

        let elapsed = elapsed + dt;
        if elapsed < self.settle_delay {
            self.state = SweepState::Sweeping {
                index,
                started_at,
                settle: Some(elapsed),
            };
            return None;
        }

        let next = index + 1;
        match self.schedule.get(next) {
            Some(voltage) => {
                self.voltage = voltage;
                self.state = SweepState::Sweeping {
                    index: next,
                    started_at,
                    settle: None,
                };
                Some(SweepAction::Fire {
                    index: next,
                    voltage,
                })
            }
            None => {
                let total_time = now - started_at;
                self.total_sweep_time = Some(total_time);
                self.state = SweepState::Done {
                    started_at,
                    finished_at: now,
                };
                Some(SweepAction::Finish {
                    voltage: self.voltage,
                    total_time,
                })
            }
        }
    }

    /// Back to idle from anywhere, timing statistics cleared
    pub fn reset(&mut self) {
        self.state = SweepState::Idle;
        self.voltage = 0.0;
        self.clear_stats();
    }

    fn clear_stats(&mut self) {
        self.uncharged_flight_time = None;
        self.total_sweep_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(voltages: &[f32], settle_delay: f32) -> SweepController {
        SweepController::new(SweepSchedule::new(voltages.to_vec()).unwrap(), settle_delay)
    }

    #[test]
    fn test_stepped_schedule() {
        let s = SweepSchedule::stepped(2.0, -2.0, 0.5).unwrap();
        assert_eq!(
            s.as_slice(),
            &[2.0, 1.5, 1.0, 0.5, 0.0, -0.5, -1.0, -1.5, -2.0]
        );

        let up = SweepSchedule::stepped(-1.0, 1.0, 1.0).unwrap();
        assert_eq!(up.as_slice(), &[-1.0, 0.0, 1.0]);

        // End not on a step: stop short of it
        let short = SweepSchedule::stepped(0.0, 1.0, 0.4).unwrap();
        assert_eq!(short.len(), 3);
        assert!((short.last().unwrap() - 0.8).abs() < 1e-6);

        let single = SweepSchedule::stepped(1.0, 1.0, 0.5).unwrap();
        assert_eq!(single.as_slice(), &[1.0]);
    }

    #[test]
    fn test_schedule_rejects_bad_input() {
        assert!(matches!(
            SweepSchedule::new(vec![]),
            Err(SimError::EmptySchedule)
        ));
        assert!(SweepSchedule::new(vec![1.0, f32::NAN]).is_err());
        assert!(SweepSchedule::stepped(2.0, -2.0, 0.0).is_err());
        assert!(SweepSchedule::stepped(2.0, -2.0, -0.5).is_err());
        assert!(SweepSchedule::stepped(0.0, 1e9, 1e-3).is_err());
    }

    #[test]
    fn test_decoded_schedule_is_validated() {
        let schedule: SweepSchedule =
            serde_json::from_str(r#"{"voltages":[1.0,-1.0]}"#).unwrap();
        assert_eq!(schedule.first(), Some(1.0));
        assert_eq!(schedule.last(), Some(-1.0));

        let err = serde_json::from_str::<SweepSchedule>(r#"{"voltages":[]}"#).unwrap_err();
        assert!(err.to_string().contains("empty"));

        let json = serde_json::to_string(&schedule).unwrap();
        assert_eq!(serde_json::from_str::<SweepSchedule>(&json).unwrap(), schedule);
    }

    #[test]
    fn test_idle_start_arms() {
        let mut c = controller(&[1.0, 0.0], 0.15);
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.start(1.0, false).unwrap(), SweepAction::Arm);
        assert_eq!(c.phase(), Phase::ArmedSingle);
        assert_eq!(c.voltage(), 0.0);
        assert_eq!(*c.state(), SweepState::ArmedSingle { fired_at: 1.0 });
    }

    #[test]
    fn test_start_refused_while_airborne() {
        let mut c = controller(&[1.0], 0.15);
        assert!(matches!(
            c.start(0.0, true),
            Err(SimError::DropletInFlight { phase: Phase::Idle })
        ));
        assert_eq!(c.phase(), Phase::Idle);

        c.start(0.0, false).unwrap();
        assert!(matches!(
            c.start(0.5, true),
            Err(SimError::DropletInFlight {
                phase: Phase::ArmedSingle
            })
        ));
        assert_eq!(c.phase(), Phase::ArmedSingle);
    }

    #[test]
    fn test_uncharged_flight_time_only_on_landing() {
        let mut c = controller(&[1.0], 0.15);
        c.start(1.0, false).unwrap();
        c.flight_ended(2.5, false);
        assert_eq!(c.uncharged_flight_time(), None);

        let mut c = controller(&[1.0], 0.15);
        c.start(1.0, false).unwrap();
        c.flight_ended(2.5, true);
        assert_eq!(c.uncharged_flight_time(), Some(1.5));
    }

    #[test]
    fn test_sweep_walks_schedule() {
        let mut c = controller(&[1.0, 0.5, 0.0], 0.1);
        c.start(0.0, false).unwrap();
        c.flight_ended(1.0, true);

        assert_eq!(
            c.start(2.0, false).unwrap(),
            SweepAction::Fire {
                index: 0,
                voltage: 1.0
            }
        );
        assert_eq!(c.phase(), Phase::Sweeping);
        assert_eq!(c.voltage(), 1.0);
        assert!(matches!(c.start(2.0, false), Err(SimError::SweepInProgress)));

        // Nothing happens while the droplet flies
        assert_eq!(c.poll(2.5, 0.5), None);
        assert_eq!(c.index(), 0);

        c.flight_ended(3.0, true);
        assert_eq!(c.settle_elapsed(), Some(0.0));
        assert_eq!(c.poll(3.05, 0.05), None);
        assert_eq!(
            c.poll(3.1, 0.05),
            Some(SweepAction::Fire {
                index: 1,
                voltage: 0.5
            })
        );
        assert_eq!(c.settle_elapsed(), None);

        c.flight_ended(4.0, false);
        assert_eq!(
            c.poll(4.2, 0.2),
            Some(SweepAction::Fire {
                index: 2,
                voltage: 0.0
            })
        );

        c.flight_ended(5.0, true);
        let action = c.poll(5.5, 0.5);
        assert_eq!(
            action,
            Some(SweepAction::Finish {
                voltage: 0.0,
                total_time: 3.5
            })
        );
        assert_eq!(c.phase(), Phase::Done);
        assert_eq!(c.index(), 3);
        assert_eq!(c.total_sweep_time(), Some(3.5));
        assert_eq!(c.uncharged_flight_time(), Some(1.0));
    }

    #[test]
    fn test_zero_settle_delay_advances_on_first_poll() {
        let mut c = controller(&[1.0, 0.0], 0.0);
        c.start(0.0, false).unwrap();
        c.start(0.0, false).unwrap();
        c.flight_ended(1.0, true);
        assert!(matches!(
            c.poll(1.0, 0.0),
            Some(SweepAction::Fire { index: 1, .. })
        ));
    }

    #[test]
    fn test_done_start_returns_to_idle() {
        let mut c = controller(&[1.0], 0.0);
        c.start(0.0, false).unwrap();
        c.flight_ended(1.0, true);
        c.start(1.0, false).unwrap();
        c.flight_ended(2.0, true);
        assert!(matches!(c.poll(2.0, 0.0), Some(SweepAction::Finish { .. })));
        assert_eq!(c.phase(), Phase::Done);

        assert_eq!(c.start(3.0, false).unwrap(), SweepAction::Clear);
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.total_sweep_time(), None);
        assert_eq!(c.uncharged_flight_time(), None);
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_reset_from_anywhere() {
        let mut c = controller(&[1.0, 0.0], 0.15);
        c.start(0.0, false).unwrap();
        c.flight_ended(1.0, true);
        c.start(1.0, false).unwrap();
        assert_eq!(c.phase(), Phase::Sweeping);

        c.reset();
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.voltage(), 0.0);
        assert_eq!(c.uncharged_flight_time(), None);
        assert_eq!(c.total_sweep_time(), None);
    }
}
