//! Property-based tests for the simulation core.
//!
//! Covers: field cut-off and linearity, straight zero-voltage flight,
//! single-droplet and append-only invariants under random step sequences.

use droplet_deflect::config::{PhysicalConstants, SceneLayout, SimConfig, SweepConfig};
use droplet_deflect::sim::{Droplet, FieldModel, Geometry, Phase, Session};
use glam::Vec2;
use proptest::prelude::*;

fn reference() -> (FieldModel, Geometry) {
    let constants = PhysicalConstants::default();
    let geometry = Geometry::new(&constants, &SceneLayout::default());
    (FieldModel::new(&constants, &geometry), geometry)
}

fn session_with(voltages: Vec<f32>, settle_delay: f32) -> Session {
    let config = SimConfig {
        sweep: SweepConfig {
            voltages: Some(voltages),
            settle_delay,
            ..SweepConfig::default()
        },
        ..SimConfig::default()
    };
    Session::new(config).unwrap()
}

// ── Field Model ──────────────────────────────────────────────────────

proptest! {
    /// No deflection anywhere outside the plate span.
    #[test]
    fn field_off_outside_plates(
        voltage in -100.0f32..100.0,
        before in 0.0f32..1.0,
        x_after in 0.0f32..400.0,
        y in 0.0f32..600.0,
    ) {
        let (field, g) = reference();
        let left = Vec2::new(g.plate_start_x * before, y);
        let right = Vec2::new(g.plate_end_x + x_after, y);

        prop_assert_eq!(field.acceleration(voltage, left), Vec2::ZERO);
        prop_assert_eq!(field.acceleration(voltage, right), Vec2::ZERO);
    }

    /// Inside the plates, acceleration scales linearly with voltage.
    #[test]
    fn field_linear_in_voltage(
        voltage in -50.0f32..50.0,
        factor in -4.0f32..4.0,
        t in 0.01f32..0.99,
        y in 0.0f32..600.0,
    ) {
        let (field, g) = reference();
        let pos = Vec2::new(g.plate_start_x + t * (g.plate_end_x - g.plate_start_x), y);

        let base = field.acceleration(voltage, pos);
        let scaled = field.acceleration(voltage * factor, pos);

        prop_assert_eq!(base.x, 0.0);
        prop_assert_eq!(field.acceleration(2.0 * voltage, pos).y, 2.0 * base.y);
        let tolerance = 1e-4 * (base.y * factor).abs().max(1.0);
        prop_assert!((scaled.y - base.y * factor).abs() <= tolerance);
    }
}

// ── Particle Integrator ──────────────────────────────────────────────

proptest! {
    /// With the plates at 0 V the droplet lands at its launch height.
    #[test]
    fn zero_voltage_flight_is_straight(
        speed in 10.0f32..2000.0,
        dt in 0.001f32..0.033,
    ) {
        let (field, g) = reference();
        let mut droplet = Droplet::at_rest(g.launch);
        droplet.fire(g.launch, speed);

        let mut landed = None;
        for _ in 0..100_000 {
            let accel = field.acceleration(0.0, droplet.pos);
            let outcome = droplet.advance(accel, dt, &g);
            if outcome.is_terminal() {
                landed = Some(outcome);
                break;
            }
        }

        let outcome = landed.expect("droplet never landed");
        prop_assert!(outcome.crossed_target());
        prop_assert!((droplet.pos.y - g.launch.y).abs() < 1e-3);
    }
}

// ── Session invariants ───────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Random frame steps: one droplet at most, impacts never shrink,
    /// and the sweep index only ever moves up by one.
    #[test]
    fn session_invariants_hold(
        voltages in prop::collection::vec(-3.0f32..3.0, 1..5),
        settle_delay in 0.0f32..0.3,
        steps in prop::collection::vec(0.0f32..0.033, 200..400),
    ) {
        let len = voltages.len();
        let mut session = session_with(voltages, settle_delay);
        session.start().unwrap();

        let mut impacts = 0;
        let mut index = session.sweep_index();

        // Cycle the random steps until the sweep completes
        for dt in steps.iter().cycle().take(200_000) {
            if session.phase() == Phase::ArmedSingle && !session.droplet().airborne {
                session.start().unwrap();
            }
            session.tick(*dt).unwrap();

            prop_assert!(session.impacts().len() >= impacts);
            impacts = session.impacts().len();

            let now = session.sweep_index();
            prop_assert!(now == index || now == index + 1);
            prop_assert!(now <= len);
            index = now;

            if session.phase() == Phase::Done {
                break;
            }
        }

        prop_assert_eq!(session.phase(), Phase::Done);
        prop_assert_eq!(index, len);
        prop_assert_eq!(session.current_sweep_samples().len(), len + 1);
    }

    /// A start while a droplet flies is always refused and changes nothing.
    #[test]
    fn start_never_fires_second_droplet(ticks in 1usize..60) {
        let mut session = session_with(vec![1.0, -1.0], 0.15);
        session.start().unwrap();
        for _ in 0..ticks {
            session.tick(1.0 / 60.0).unwrap();
        }
        prop_assume!(session.droplet().airborne);

        let before = session.droplet().clone();
        prop_assert!(session.start().is_err());
        prop_assert_eq!(session.droplet(), &before);
        prop_assert_eq!(session.phase(), Phase::ArmedSingle);
    }
}
