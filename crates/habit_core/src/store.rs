use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

use crate::habit::Habit;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("serializing habits failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value persistence collaborator the registry writes through.
///
/// `load` returning `Ok(None)` means no prior state exists; the registry
/// treats that the same as malformed bytes and starts empty.
pub trait HabitStore: Send + Sync {
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError>;
    fn save(&self, bytes: &[u8]) -> Result<(), StoreError>;
}

pub fn encode_habits(habits: &[Habit]) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec(habits)?)
}

/// Decodes persisted bytes, degrading to an empty collection on malformed
/// input. Parse failures are never surfaced to the caller.
pub fn decode_habits(bytes: &[u8]) -> Vec<Habit> {
    match serde_json::from_slice(bytes) {
        Ok(habits) => habits,
        Err(err) => {
            tracing::warn!(%err, "discarding malformed persisted state");
            Vec::new()
        }
    }
}

/// Whole-file store; every save overwrites the previous snapshot.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl HabitStore for FileStore {
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, bytes: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

/// In-process store, used by tests and callers without a durable backend.
#[derive(Default)]
pub struct MemoryStore {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<Vec<u8>> {
        self.bytes.lock().clone()
    }
}

impl HabitStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.bytes.lock().clone())
    }

    fn save(&self, bytes: &[u8]) -> Result<(), StoreError> {
        *self.bytes.lock() = Some(bytes.to_vec());
        Ok(())
    }
}
