//! Save storage. One JSON document per slot.
//!
//! Loading never fails hard: a missing or unreadable save means "start a
//! new game", and the reason is logged.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use kingdom_core::save::SaveSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("save data is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("save store lock poisoned")]
    Poisoned,
}

/// Somewhere a game can be saved to and loaded from.
pub trait SnapshotStore {
    /// The stored game, or `None` if there is none or it cannot be read.
    fn load(&self) -> Option<SaveSnapshot>;

    fn save(&mut self, snapshot: &SaveSnapshot) -> Result<(), PersistenceError>;
}

/// Saves as `<dir>/<slot>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    slot: String,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, slot: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            slot: slot.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        save_path(&self.dir, &self.slot)
    }

    /// Remove the slot's file. Missing files are fine.
    pub fn delete(&self) -> Result<(), PersistenceError> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(&path)?;
            log::info!("Deleted save {}", path.display());
        }
        Ok(())
    }

    fn read(&self) -> Result<SaveSnapshot, PersistenceError> {
        let json = fs::read_to_string(self.path())?;
        Ok(serde_json::from_str(&json)?)
    }
}

fn save_path(dir: &Path, slot: &str) -> PathBuf {
    dir.join(format!("{}.json", slot))
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Option<SaveSnapshot> {
        match self.read() {
            Ok(snapshot) => {
                log::info!(
                    "Loaded save {} at wave {}",
                    self.path().display(),
                    snapshot.wave_number
                );
                Some(snapshot)
            }
            Err(PersistenceError::Io(e)) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Ignoring save {}: {}", self.path().display(), e);
                None
            }
        }
    }

    fn save(&mut self, snapshot: &SaveSnapshot) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(self.path(), json)?;
        log::info!(
            "Saved wave {} to {}",
            snapshot.wave_number,
            self.path().display()
        );
        Ok(())
    }
}

/// In-memory store holding the serialized document. Clones share the same
/// slot, so one handle can watch what another saves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with raw text, valid or not.
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            json: Arc::new(Mutex::new(Some(json.into()))),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Option<SaveSnapshot> {
        let json = self.json.lock().ok()?.clone()?;
        match serde_json::from_str(&json) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::warn!("Ignoring malformed in-memory save: {}", e);
                None
            }
        }
    }

    fn save(&mut self, snapshot: &SaveSnapshot) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(snapshot)?;
        let mut slot = self.json.lock().map_err(|_| PersistenceError::Poisoned)?;
        *slot = Some(json);
        Ok(())
    }
}
