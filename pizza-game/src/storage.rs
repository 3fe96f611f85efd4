//! Persistence of the game state blob.
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

use crate::state::GameState;

/// Persistence backend for game state.
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the state stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored blob cannot be read or decoded.
    fn load_state(&self, key: &str) -> Result<Option<GameState>, Self::Error>;

    /// Replace the state stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be encoded or written.
    fn save_state(&self, key: &str, state: &GameState) -> Result<(), Self::Error>;

    /// Remove the state stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the removal.
    fn delete_state(&self, key: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// In-process key/value store of JSON blobs. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored JSON for `key`.
    #[must_use]
    pub fn blob(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }

    /// Overwrite the raw blob for `key`, bypassing serialization.
    pub fn put_blob(&self, key: &str, blob: impl Into<String>) {
        self.blobs.borrow_mut().insert(key.to_string(), blob.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.borrow().is_empty()
    }
}

impl GameStorage for MemoryStorage {
    type Error = StorageError;

    fn load_state(&self, key: &str) -> Result<Option<GameState>, Self::Error> {
        self.blobs
            .borrow()
            .get(key)
            .map(|blob| serde_json::from_str(blob))
            .transpose()
            .map_err(StorageError::from)
    }

    fn save_state(&self, key: &str, state: &GameState) -> Result<(), Self::Error> {
        let blob = serde_json::to_string(state)?;
        self.blobs.borrow_mut().insert(key.to_string(), blob);
        Ok(())
    }

    fn delete_state(&self, key: &str) -> Result<(), Self::Error> {
        self.blobs.borrow_mut().remove(key);
        Ok(())
    }
}

/// One pretty-printed JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl GameStorage for FileStorage {
    type Error = StorageError;

    fn load_state(&self, key: &str) -> Result<Option<GameState>, Self::Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save_state(&self, key: &str, state: &GameState) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(state)?)?;
        fs::rename(&tmp, &path)?;
        debug!("saved day {} to {}", state.day, path.display());
        Ok(())
    }

    fn delete_state(&self, key: &str) -> Result<(), Self::Error> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
