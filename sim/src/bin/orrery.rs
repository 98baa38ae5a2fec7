use clap::Parser;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::info;

use orrery_lib::{
    scenario::Scenario,
    system::{System, SystemSharedState},
    units::{Ratio, Time},
};

#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Scenario configuration toml file.
    ///
    /// The default nominal scenario is used when not provided.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override the scenario's simulation time-scale multiplier
    #[arg(long)]
    time_scale: Option<f64>,

    /// Wall-clock seconds advanced per tick
    #[arg(long, default_value_t = 0.1)]
    tick: f64,

    /// Stop after this much simulated time [s]; runs until interrupted
    /// when not provided
    #[arg(long)]
    duration: Option<f64>,
}

/// Log body states roughly this often, in ticks
const REPORT_INTERVAL: u64 = 100;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let opts = Opts::parse();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))?;

    let scenario = Scenario::load(opts.scenario.as_ref());
    let mut system = System::new(scenario)?;
    if let Some(time_scale) = opts.time_scale {
        system.set_time_scale(Ratio::from_f64(time_scale));
    }

    let mut shared = SystemSharedState::default();
    let dt = Time::from_secs(opts.tick);

    let mut elapsed_sim_secs = 0.0;
    let mut ticks: u64 = 0;
    while running.load(Ordering::SeqCst) {
        system.tick(dt, &mut shared);
        elapsed_sim_secs += opts.tick * system.time_scale().as_f64();
        ticks += 1;

        if ticks % REPORT_INTERVAL == 0 {
            for (_, body) in system.bodies() {
                info!(
                    body = %body.name(),
                    pos_km = %body.state().position_km(),
                    "Body state"
                );
            }
            for (_, ship) in system.ships() {
                info!(
                    ship = %ship.name(),
                    pos_km = %ship.state().position_km(),
                    vel_km_s = %ship.state().velocity_km_s(),
                    "Ship state"
                );
            }
        }

        if let Some(duration) = opts.duration {
            if elapsed_sim_secs >= duration {
                break;
            }
        }
    }

    info!(ticks, sim_secs = elapsed_sim_secs, "Simulation stopped");
    Ok(())
}
