//! Session orchestrator
//!
//! Owns one of each simulation component and exposes the only mutation
//! surface: [`Session::start`], [`Session::reset`] and [`Session::tick`].
//! Everything else is read-only for the presentation layer.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::droplet::{Droplet, FlightOutcome};
use super::field::FieldModel;
use super::geometry::Geometry;
use super::ledger::{ImpactLedger, ImpactRecord};
use super::series::{TimeSample, TimeSeriesRecorder};
use super::sweep::{Phase, SweepAction, SweepController, SweepSchedule};
use crate::config::{PhysicalConstants, SimConfig};
use crate::error::{SimError, SimResult};

/// Maximum number of undrained events kept (oldest dropped first)
pub const MAX_PENDING_EVENTS: usize = 256;

/// Things that happened during a tick or intent, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Uncharged reference shot fired
    Armed,
    /// Sweep shot fired at schedule step `index`
    Fired { index: usize, voltage: f32 },
    /// Droplet hit the target sheet
    Landed { x: f32, y: f32 },
    /// Droplet left the view before reaching the target
    LeftBounds { x: f32, y: f32 },
    SweepFinished { total_time: f64 },
    /// Done -> Idle via start
    Cleared,
    /// Explicit full reset
    Reset,
}

/// Read-only view of the session for rendering or serialization
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub voltage: f32,
    pub sweep_index: usize,
    pub clock: f64,
    pub droplet: &'a Droplet,
    pub impacts: &'a [ImpactRecord],
    pub samples: &'a [TimeSample],
    pub uncharged_flight_time: Option<f64>,
    pub total_sweep_time: Option<f64>,
}

/// One simulation run.
///
/// Events queue up until [`Session::drain_events`]; call it once per frame.
/// Past `MAX_PENDING_EVENTS` the oldest events are dropped.
#[derive(Debug)]
pub struct Session {
    config: SimConfig,
    geometry: Geometry,
    field: FieldModel,
    sweep: SweepController,
    droplet: Droplet,
    impacts: ImpactLedger,
    series: TimeSeriesRecorder,
    /// Simulated seconds since the session was created
    clock: f64,
    /// Series length when the latest sweep began
    sweep_mark: usize,
    events: VecDeque<SimEvent>,
}

impl Session {
    /// Build a session from a validated config
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let schedule = config.sweep.schedule()?;
        let geometry = Geometry::new(&config.constants, &config.layout);
        let field = FieldModel::new(&config.constants, &geometry);

        log::info!(
            "Session ready: {} voltages, settle delay {}s, target at x={}",
            schedule.len(),
            config.sweep.settle_delay,
            geometry.target_x
        );

        Ok(Self {
            sweep: SweepController::new(schedule, config.sweep.settle_delay),
            droplet: Droplet::at_rest(geometry.launch),
            impacts: ImpactLedger::new(),
            series: TimeSeriesRecorder::new(),
            clock: 0.0,
            sweep_mark: 0,
            events: VecDeque::with_capacity(MAX_PENDING_EVENTS),
            config,
            geometry,
            field,
        })
    }

    /// Start intent: Idle -> ArmedSingle -> Sweeping, Done -> Idle.
    ///
    /// A refused start changes nothing and returns the reason.
    pub fn start(&mut self) -> SimResult<Phase> {
        let now = self.clock;
        let action = match self.sweep.start(now, self.droplet.airborne) {
            Ok(action) => action,
            Err(e) => {
                log::warn!("Start refused: {e}");
                return Err(e);
            }
        };
        self.apply(action, now);
        Ok(self.sweep.phase())
    }

    /// Full reset: back to Idle, droplet grounded, timing statistics,
    /// impacts and samples all cleared together.
    pub fn reset(&mut self) {
        self.sweep.reset();
        self.droplet = Droplet::at_rest(self.geometry.launch);
        self.impacts.clear();
        self.series.clear();
        self.sweep_mark = 0;
        self.push_event(SimEvent::Reset);
        log::info!("Session reset");
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Negative or non-finite steps are rejected and leave the session
    /// untouched. The clock is read once and shared by every timestamp
    /// recorded during the tick.
    pub fn tick(&mut self, dt: f32) -> SimResult<()> {
        if !dt.is_finite() {
            log::warn!("Rejected non-finite tick");
            return Err(SimError::NonFiniteTimestep);
        }
        if dt < 0.0 {
            log::warn!("Rejected negative tick dt={dt}");
            return Err(SimError::NegativeTimestep { dt });
        }

        self.clock += f64::from(dt);
        let now = self.clock;

        if self.droplet.airborne {
            let accel = self.field.acceleration(self.sweep.voltage(), self.droplet.pos);
            match self.droplet.advance(accel, dt, &self.geometry) {
                FlightOutcome::Landed { x, y } => {
                    self.impacts.record(x, y);
                    self.sweep.flight_ended(now, true);
                    self.push_event(SimEvent::Landed { x, y });
                    log::debug!("Landed at y={y:.2} (V={})", self.sweep.voltage());
                }
                FlightOutcome::LeftBounds => {
                    let Vec2 { x, y } = self.droplet.pos;
                    self.sweep.flight_ended(now, false);
                    self.push_event(SimEvent::LeftBounds { x, y });
                    log::debug!("Left view at x={x:.2} (V={})", self.sweep.voltage());
                }
                FlightOutcome::InFlight | FlightOutcome::Grounded => {}
            }
        } else if let Some(action) = self.sweep.poll(now, dt) {
            self.apply(action, now);
        }

        Ok(())
    }

    fn apply(&mut self, action: SweepAction, now: f64) {
        match action {
            SweepAction::Arm => {
                self.fire();
                self.push_event(SimEvent::Armed);
                log::info!("Uncharged reference shot fired");
            }
            SweepAction::Fire { index, voltage } => {
                if index == 0 {
                    self.sweep_mark = self.series.len();
                    log::info!("Sweep started at {voltage} kV");
                }
                self.fire();
                self.series.sample(now, voltage);
                self.push_event(SimEvent::Fired { index, voltage });
            }
            SweepAction::Finish {
                voltage,
                total_time,
            } => {
                self.series.sample(now, voltage);
                self.push_event(SimEvent::SweepFinished { total_time });
                log::info!("Sweep finished in {total_time:.3}s");
            }
            SweepAction::Clear => {
                self.push_event(SimEvent::Cleared);
                log::info!("Sweep cleared, back to idle");
            }
        }
    }

    fn fire(&mut self) {
        self.droplet
            .fire(self.geometry.launch, self.geometry.muzzle_speed);
    }

    fn push_event(&mut self, event: SimEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain(..).collect()
    }

    pub fn phase(&self) -> Phase {
        self.sweep.phase()
    }

    pub fn voltage(&self) -> f32 {
        self.sweep.voltage()
    }

    pub fn sweep_index(&self) -> usize {
        self.sweep.index()
    }

    pub fn schedule(&self) -> &SweepSchedule {
        self.sweep.schedule()
    }

    pub fn droplet(&self) -> &Droplet {
        &self.droplet
    }

    pub fn impacts(&self) -> &[ImpactRecord] {
        self.impacts.all()
    }

    /// Every sample since the last full reset
    pub fn samples(&self) -> &[TimeSample] {
        self.series.all()
    }

    /// Samples of the latest (or running) sweep only
    pub fn current_sweep_samples(&self) -> &[TimeSample] {
        self.series.since(self.sweep_mark)
    }

    pub fn uncharged_flight_time(&self) -> Option<f64> {
        self.sweep.uncharged_flight_time()
    }

    pub fn total_sweep_time(&self) -> Option<f64> {
        self.sweep.total_sweep_time()
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.config.constants
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase(),
            voltage: self.voltage(),
            sweep_index: self.sweep_index(),
            clock: self.clock,
            droplet: &self.droplet,
            impacts: self.impacts(),
            samples: self.samples(),
            uncharged_flight_time: self.uncharged_flight_time(),
            total_sweep_time: self.total_sweep_time(),
        }
    }
}
