//! Game loop thread: runs the simulation engine at 30Hz and publishes
//! snapshots.
//!
//! The engine moves into this thread and stays there. Commands arrive via
//! an `mpsc` channel. Snapshots are stored in shared state for polling and
//! optionally pushed down a second channel.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use kingdom_core::constants::TICK_RATE;
use kingdom_core::state::GameStateSnapshot;
use kingdom_sim::SimulationEngine;

use crate::persistence::SnapshotStore;
use crate::state::GameLoopCommand;

/// Nominal duration of one tick. Game speed scales simulated time inside
/// the engine, not the tick rate.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    store: Box<dyn SnapshotStore + Send>,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    snapshot_tx: Option<mpsc::Sender<GameStateSnapshot>>,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("kingdom-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, store, cmd_rx, &latest_snapshot, snapshot_tx);
        })?;

    Ok((cmd_tx, handle))
}

fn save(engine: &SimulationEngine, store: &mut dyn SnapshotStore) {
    if let Err(e) = store.save(&engine.to_save()) {
        log::error!("Save failed: {}", e);
    }
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    mut store: Box<dyn SnapshotStore + Send>,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
    mut snapshot_tx: Option<mpsc::Sender<GameStateSnapshot>>,
) {
    let origin = Instant::now();
    let mut next_tick_time = origin;
    log::info!("Game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Save) => save(&engine, store.as_mut()),
                Ok(GameLoopCommand::Shutdown) => {
                    save(&engine, store.as_mut());
                    log::info!("Game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance to now (engine handles pause and speed internally)
        let snapshot = engine.tick_at(origin.elapsed());

        // 3. Push to the subscriber, forgetting it once it hangs up
        if let Some(tx) = &snapshot_tx {
            if tx.send(snapshot.clone()).is_err() {
                snapshot_tx = None;
            }
        }

        // 4. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingdom_core::commands::PlayerCommand;
    use kingdom_core::enums::WaveStatus;
    use kingdom_sim::engine::SimConfig;

    use crate::persistence::MemoryStore;

    fn start(
        store: MemoryStore,
    ) -> (
        mpsc::Sender<GameLoopCommand>,
        JoinHandle<()>,
        mpsc::Receiver<GameStateSnapshot>,
        Arc<Mutex<Option<GameStateSnapshot>>>,
    ) {
        let latest = Arc::new(Mutex::new(None));
        let (snap_tx, snap_rx) = mpsc::channel();
        let (cmd_tx, handle) = spawn_game_loop(
            SimulationEngine::new(SimConfig::default()),
            Box::new(store),
            latest.clone(),
            Some(snap_tx),
        )
        .unwrap();
        (cmd_tx, handle, snap_rx, latest)
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartWave))
            .unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Pause))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<GameLoopCommand> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::PlayerCommand(PlayerCommand::StartWave)
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::PlayerCommand(PlayerCommand::Pause)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_loop_publishes_and_saves_on_shutdown() {
        let store = MemoryStore::new();
        let (cmd_tx, handle, snap_rx, latest) = start(store.clone());

        cmd_tx
            .send(GameLoopCommand::PlayerCommand(PlayerCommand::StartWave))
            .unwrap();
        let started = snap_rx
            .iter()
            .take(60)
            .any(|snap| snap.wave.status == WaveStatus::Spawning);
        assert!(started, "wave should start within a few ticks");
        assert!(latest.lock().unwrap().is_some());

        cmd_tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap();

        let saved = store.load().expect("shutdown should save");
        assert_eq!(saved.wave_number, 1);
    }

    #[test]
    fn test_loop_stops_when_sender_dropped() {
        let (cmd_tx, handle, _snap_rx, _latest) = start(MemoryStore::new());
        drop(cmd_tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_pause_resume_via_commands() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        engine.tick_at(Duration::from_millis(0));
        engine.tick_at(Duration::from_millis(40));

        engine.queue_command(PlayerCommand::Pause);
        let snap = engine.tick_at(Duration::from_millis(80));
        assert!(snap.paused);
        let paused_tick = snap.time.tick;

        // Tick while paused: time should not advance
        let snap = engine.tick_at(Duration::from_millis(120));
        assert_eq!(snap.time.tick, paused_tick);

        engine.queue_command(PlayerCommand::Resume);
        engine.tick_at(Duration::from_millis(160));
        let snap = engine.tick_at(Duration::from_millis(200));
        assert!(!snap.paused);
        assert!(snap.time.tick > paused_tick);
    }

    #[test]
    fn test_tick_duration_constant() {
        // 30Hz = 33.333ms per tick
        let expected_nanos = 1_000_000_000u64 / 30;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }
}
