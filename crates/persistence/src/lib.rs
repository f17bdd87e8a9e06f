#![deny(warnings)]

//! Persistence layer: one JSON snapshot per device, loaded with a
//! forward-compatible schema merge.
//!
//! Loading never fails: a missing file yields defaults, corrupt JSON falls
//! back to defaults with a warning, missing fields backfill from defaults,
//! and unknown fields round-trip untouched. Saving is a total overwrite —
//! one writer, last write wins.

use fin_core::{normalize, PlayerState};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Default on-disk location of the snapshot.
pub fn default_save_path() -> &'static str {
    "./saves/finquest.json"
}

/// Errors writing the snapshot. Reads fall back to defaults instead of
/// erroring.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handle to the single persisted player snapshot.
#[derive(Clone, Debug)]
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, normalizing derived fields. Any failure falls back
    /// to the default state rather than erroring.
    pub fn load(&self) -> PlayerState {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot yet, starting fresh");
                return PlayerState::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "snapshot unreadable, using defaults");
                return PlayerState::default();
            }
        };
        match serde_json::from_str::<PlayerState>(&raw) {
            Ok(mut state) => {
                normalize(&mut state);
                state
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "snapshot corrupt, using defaults");
                PlayerState::default()
            }
        }
    }

    /// Overwrite the snapshot with `state`, creating the parent directory on
    /// demand.
    pub fn save(&self, state: &PlayerState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }

    /// Replace the snapshot with defaults and return the fresh state.
    /// Irreversible; confirmation is the caller's concern.
    pub fn reset(&self) -> Result<PlayerState, StoreError> {
        let state = PlayerState::default();
        self.save(&state)?;
        Ok(state)
    }
}
