use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;

use clap::Parser;
use env_logger::Env;

use kingdom_app::autopilot::Autopilot;
use kingdom_app::persistence::{FileStore, SnapshotStore};
use kingdom_app::state::{AppError, AppState};
use kingdom_core::commands::PlayerCommand;
use kingdom_core::constants::{DEFAULT_SEED, DT, TICK_RATE};
use kingdom_sim::engine::SimConfig;
use kingdom_sim::path::FieldBounds;
use kingdom_sim::SimulationEngine;

/// Give up on a headless run after this many simulated hours.
const HEADLESS_HOURS: u64 = 4;

#[derive(Parser, Debug)]
#[command(name = "kingdom")]
#[command(about = "Tower defense and city economy simulation")]
struct Cli {
    /// Seed for a new game. Ignored when a save is resumed.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding save files
    #[arg(long, default_value = "saves")]
    save_dir: PathBuf,

    /// Save slot name
    #[arg(long, default_value = "autosave")]
    slot: String,

    /// Number of waves the autopilot plays before stopping
    #[arg(long, default_value_t = 3)]
    waves: u32,

    /// Game speed level (1-5)
    #[arg(long, default_value_t = 1)]
    speed: u8,

    /// Discard the save slot and start a new game
    #[arg(long)]
    fresh: bool,

    /// Run on the wall-clock game loop instead of stepping as fast as possible
    #[arg(long)]
    realtime: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut store = FileStore::new(&cli.save_dir, &cli.slot);
    if cli.fresh {
        store.delete()?;
    }

    let mut engine = match store.load() {
        Some(save) => {
            log::info!("Resuming wave {} from {}", save.wave_number, store.path().display());
            SimulationEngine::from_save(&save, FieldBounds::default())
        }
        None => {
            let seed = cli.seed.unwrap_or(DEFAULT_SEED);
            log::info!("New game with seed {}", seed);
            SimulationEngine::new(SimConfig {
                seed,
                ..Default::default()
            })
        }
    };

    if let Err(reason) = engine.apply(PlayerCommand::SetGameSpeed { level: cli.speed }) {
        log::warn!("Keeping speed {}: {}", engine.game_speed().level(), reason);
    }

    let mut pilot = Autopilot::new(cli.waves);
    if cli.realtime {
        run_realtime(engine, store, &mut pilot)?;
    } else {
        run_headless(&mut engine, &mut store, &mut pilot)?;
    }

    log::info!(
        "Played {} waves, cleared {}",
        pilot.settled(),
        pilot.cleared()
    );
    Ok(())
}

fn run_headless(
    engine: &mut SimulationEngine,
    store: &mut FileStore,
    pilot: &mut Autopilot,
) -> Result<(), AppError> {
    let max_ticks = HEADLESS_HOURS * 3600 * TICK_RATE as u64;
    for _ in 0..max_ticks {
        let snapshot = engine.tick(DT);
        engine.queue_commands(pilot.plan(&snapshot));
        if pilot.finished() {
            break;
        }
    }
    if !pilot.finished() {
        log::warn!("Stopped after {} simulated hours", HEADLESS_HOURS);
    }
    store.save(&engine.to_save())?;
    Ok(())
}

fn run_realtime(
    engine: SimulationEngine,
    store: FileStore,
    pilot: &mut Autopilot,
) -> Result<(), AppError> {
    let state = AppState::new();
    let (snapshot_tx, snapshot_rx) = mpsc::channel();
    state.start(engine, Box::new(store), Some(snapshot_tx))?;

    for snapshot in snapshot_rx.iter() {
        for command in pilot.plan(&snapshot) {
            state.send_command(command)?;
        }
        if pilot.finished() {
            break;
        }
    }

    // Shutdown writes the final save.
    state.shutdown()
}
