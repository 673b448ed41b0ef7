//! Poll state persistence
//!
//! The state file is a single JSON object, overwritten wholesale on each
//! emission. It is the only memory carried across poll cycles. There is one
//! scheduled poller per state file, so no locking is needed here.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Durable record consulted by the next poll cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollState {
    /// Most recent observed count (null only in hand-written files)
    #[serde(default)]
    pub last_count: Option<i64>,
    /// Unix timestamp of the last emission
    #[serde(default)]
    pub last_logged: i64,
}

/// Reads and writes the poll state file
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous state, degrading to `None` on any failure
    ///
    /// A missing file is the normal first-run case and stays silent. A file
    /// that exists but cannot be read or parsed is logged before degrading,
    /// so corruption is visible without changing the decision outcome.
    pub fn load(&self) -> Option<PollState> {
        if !self.path.exists() {
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read state file, treating as first run");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "State file is corrupt, treating as first run");
                None
            }
        }
    }

    /// Overwrite the state file with a new record
    pub fn save(&self, state: &PollState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(state)?)?;
        Ok(())
    }
}
