//! Durable storage for the practice state document.
//!
//! The whole state is a single JSON document. Every mutating operation in the
//! tracker is a load → modify → save cycle; the store itself caches nothing,
//! so the file on disk is the only durability boundary.

use crate::error::StoreError;
use crate::types::State;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Answer log entries kept after a save (oldest evicted first).
pub const MAX_ANSWER_LOG: usize = 5000;

/// Session records kept after a save (oldest evicted first).
pub const MAX_SESSIONS: usize = 1000;

/// Keyed JSON store for the whole practice state.
#[derive(Debug, Clone)]
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

    /// Load the current state.
    ///
    /// A missing, unreadable, or unparseable file yields the canonical empty
    /// state. Corruption is logged but never surfaced as an error.
    pub fn load(&self) -> State {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return State::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "state file unreadable, starting empty");
                return State::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(state) => state,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "state file corrupt, starting empty");
                State::default()
            }
        }
    }

    /// Persist the state, replacing the previous document atomically.
    ///
    /// Truncates `answer_log` and `sessions` to their bounds first, then
    /// writes to a temp file and renames over the target so a concurrent
    /// `load` never observes a partial write.
    pub fn save(&self, state: &mut State) -> Result<(), StoreError> {
        truncate_logs(state);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(state)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }

        debug!(
            path = %self.path.display(),
            items = state.items.len(),
            log_entries = state.answer_log.len(),
            "state saved"
        );
        Ok(())
    }
}

/// Drop the oldest entries beyond the retention bounds.
fn truncate_logs(state: &mut State) {
    if state.answer_log.len() > MAX_ANSWER_LOG {
        let excess = state.answer_log.len() - MAX_ANSWER_LOG;
        state.answer_log.drain(..excess);
    }
    if state.sessions.len() > MAX_SESSIONS {
        let excess = state.sessions.len() - MAX_SESSIONS;
        state.sessions.drain(..excess);
    }
}
