//! Droplet Deflect headless runner
//!
//! Arms the uncharged reference shot, runs one full sweep at a fixed frame
//! rate and prints the HUD readouts and impact positions.
//!
//! Usage: `droplet-deflect [config.json] [--json]`

use droplet_deflect::consts::SIM_DT;
use droplet_deflect::sim::{FixedStepper, Phase, Session, SimEvent};
use droplet_deflect::{SimConfig, SimResult, hud};

/// Give up if a phase takes longer than this (simulated seconds)
const PHASE_TIMEOUT: f32 = 120.0;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> SimResult<()> {
    let mut config_path = None;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            _ => config_path = Some(arg),
        }
    }

    let config = match config_path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    let mut session = Session::new(config)?;
    let mut stepper = FixedStepper::default();

    session.start()?;
    run_while(&mut session, &mut stepper, |s| s.droplet().airborne)?;

    session.start()?;
    run_while(&mut session, &mut stepper, |s| s.phase() == Phase::Sweeping)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        return Ok(());
    }

    for line in hud::lines(&session) {
        println!("{line}");
    }
    println!();
    let impacts = session.impacts();
    // First impact is the uncharged reference shot
    let axis = session.geometry().launch.y;
    for (i, impact) in impacts.iter().enumerate() {
        println!(
            "impact {i:>2}: y = {:8.2} px (deflection {:+7.2} px)",
            impact.y,
            axis - impact.y
        );
    }
    Ok(())
}

/// Step at the reference frame rate while `running` holds
fn run_while(
    session: &mut Session,
    stepper: &mut FixedStepper,
    running: impl Fn(&Session) -> bool,
) -> SimResult<()> {
    let mut elapsed = 0.0;
    while running(&*session) {
        if elapsed > PHASE_TIMEOUT {
            log::warn!("Phase {:?} timed out", session.phase());
            break;
        }
        stepper.advance(session, SIM_DT)?;
        elapsed += SIM_DT;

        for event in session.drain_events() {
            match event {
                SimEvent::Fired { index, voltage } => {
                    log::info!("Step {index}: {voltage} kV")
                }
                SimEvent::LeftBounds { x, y } => {
                    log::info!("Droplet left view at ({x:.1}, {y:.1})")
                }
                other => log::debug!("{other:?}"),
            }
        }
    }
    Ok(())
}
