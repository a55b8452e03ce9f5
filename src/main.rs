//! Ring Hunter entry point
//!
//! Headless native runner: `ring-hunter [config.json] [max_ticks]`.
//! Runs the arena until the predator fills the ring or the tick limit is hit,
//! then logs a summary. Set `RUST_LOG=debug` for milestones.

use std::process::ExitCode;

use ring_hunter::sim::SimulationEvent;
use ring_hunter::{
    ArenaConfig, ConfigResult, DriverState, Simulation, SimulationObserver, TickFrame,
};

const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 10;

/// Logs milestones and a heartbeat every simulated ten seconds
struct ProgressLog {
    heartbeat: u64,
}

impl SimulationObserver for ProgressLog {
    fn on_tick(&mut self, frame: &TickFrame<'_>) {
        for event in frame.events {
            match event {
                SimulationEvent::MilestoneReached { eaten } => {
                    log::info!("Milestone: {eaten} prey eaten (tick {})", frame.tick);
                }
                SimulationEvent::PredatorRelocated { id } => {
                    log::debug!("Predator {id} escaped and was relocated");
                }
                _ => log::trace!("tick {}: {}", frame.tick, event.label()),
            }
        }
        if self.heartbeat > 0 && frame.tick % self.heartbeat == 0 {
            log::info!(
                "tick {}: {} prey, eaten {}, predator radius {:.2}",
                frame.tick,
                frame.arena.population.prey_count(),
                frame.arena.population.eaten,
                frame.arena.largest_predator_radius()
            );
        }
    }
}

fn run() -> ConfigResult<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => ArenaConfig::load(path)?,
        None => ArenaConfig::default(),
    };
    let max_ticks = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_TICKS);

    let heartbeat = (config.tick_hz * 10.0).round() as u64;
    let mut sim = Simulation::new(config)?;
    sim.add_observer(Box::new(ProgressLog { heartbeat }));
    sim.start()?;

    let mut ticks = 0;
    while ticks < max_ticks && sim.state() == DriverState::Running {
        sim.step();
        ticks += 1;
    }

    if let Some(arena) = sim.arena() {
        log::info!(
            "Finished after {} ticks ({:?}): eaten {}, prey {}, predator radius {:.2} / ring {:.1}",
            arena.time_ticks,
            sim.state(),
            arena.population.eaten,
            arena.population.prey_count(),
            arena.largest_predator_radius(),
            arena.boundary.radius
        );
    }
    sim.stop();
    Ok(())
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Ring Hunter (headless) starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
