//! Application state shared between the caller and the game loop thread.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use kingdom_core::commands::PlayerCommand;
use kingdom_core::state::GameStateSnapshot;
use kingdom_sim::SimulationEngine;

use crate::game_loop;
use crate::persistence::{PersistenceError, SnapshotStore};

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Write the current game to the store.
    Save,
    /// Save and shut down the game loop thread gracefully.
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("simulation not started")]
    NotStarted,
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("game loop has stopped")]
    LoopStopped,
    #[error("shared state lock poisoned")]
    Poisoned,
    #[error("failed to spawn game loop: {0}")]
    Spawn(#[from] io::Error),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Shared application state.
///
/// - `mpsc::Sender` is wrapped in `Mutex` (Sender is Send but not Sync)
/// - `Mutex<Option<...>>` for state that does not exist before `start`
/// - `Arc<Mutex<...>>` for the latest snapshot, shared with the loop thread
pub struct AppState {
    /// `None` before `start` is called.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot for synchronous polling. Updated after each tick.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            handle: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .map(|handle| handle.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Start the game loop on its own thread with the given engine.
    pub fn start(
        &self,
        engine: SimulationEngine,
        store: Box<dyn SnapshotStore + Send>,
        snapshot_tx: Option<mpsc::Sender<GameStateSnapshot>>,
    ) -> Result<(), AppError> {
        let mut handle = self.handle.lock().map_err(|_| AppError::Poisoned)?;
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return Err(AppError::AlreadyRunning);
        }

        let (cmd_tx, join) = game_loop::spawn_game_loop(
            engine,
            store,
            self.latest_snapshot.clone(),
            snapshot_tx,
        )?;

        let mut tx_lock = self.command_tx.lock().map_err(|_| AppError::Poisoned)?;
        *tx_lock = Some(cmd_tx);
        *handle = Some(join);
        Ok(())
    }

    /// Send a player command to the simulation.
    pub fn send_command(&self, command: PlayerCommand) -> Result<(), AppError> {
        self.send(GameLoopCommand::PlayerCommand(command))
    }

    pub fn send(&self, command: GameLoopCommand) -> Result<(), AppError> {
        let tx_lock = self.command_tx.lock().map_err(|_| AppError::Poisoned)?;
        match tx_lock.as_ref() {
            Some(tx) => tx.send(command).map_err(|_| AppError::LoopStopped),
            None => Err(AppError::NotStarted),
        }
    }

    /// The latest snapshot, if any tick has run yet.
    pub fn snapshot(&self) -> Result<Option<GameStateSnapshot>, AppError> {
        let lock = self.latest_snapshot.lock().map_err(|_| AppError::Poisoned)?;
        Ok(lock.clone())
    }

    /// Ask the loop to save and stop, then wait for it.
    pub fn shutdown(&self) -> Result<(), AppError> {
        let sent = self.send(GameLoopCommand::Shutdown);
        let join = self.handle.lock().map_err(|_| AppError::Poisoned)?.take();
        if let Some(join) = join {
            if join.join().is_err() {
                log::error!("Game loop thread panicked");
            }
        }
        if let Ok(mut tx) = self.command_tx.lock() {
            *tx = None;
        }
        match sent {
            Ok(()) | Err(AppError::LoopStopped) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.snapshot().unwrap().is_none());
        assert!(!state.is_running());
    }

    #[test]
    fn test_send_before_start_is_rejected() {
        let state = AppState::new();
        assert!(matches!(
            state.send_command(PlayerCommand::StartWave),
            Err(AppError::NotStarted)
        ));
        assert!(matches!(state.shutdown(), Err(AppError::NotStarted)));
    }
}
