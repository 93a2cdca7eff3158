// DexTracker - app/history_store.rs
//
// History persistence: save and restore the mine/enemy classification
// history between runs.
//
// Design principles:
// - History is saved atomically (write→temp, rename→final) so a crash
//   during save never corrupts the previous good file.
// - Load errors are never fatal: a missing file is a first run, a corrupt
//   file starts an empty history (and is logged at WARN).
// - The data directory is created on first save; no user action required.
// - The loaded log is NOT persisted; only classification snapshots are.

use crate::core::lookup::HistorySink;
use crate::core::model::{EntryMap, History, Side};
use crate::platform::fs::write_atomic;
use crate::util::error::HistoryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// =============================================================================
// On-disk data structures
// =============================================================================

/// Borrowed on-disk shape used when saving.
///
/// `player_history` / `enemy_history` come from [`History`]'s own serde
/// attributes; `saved_at` is informational and ignored on load.
#[derive(Serialize)]
struct HistoryFileRef<'a> {
    #[serde(flatten)]
    history: &'a History,
    saved_at: DateTime<Utc>,
}

/// Owned on-disk shape used when loading.
///
/// Every field is optional so files written by older versions (without
/// `saved_at`) or with only one side present still load.
#[derive(Deserialize)]
struct HistoryFile {
    #[serde(default)]
    player_history: EntryMap,
    #[serde(default)]
    enemy_history: EntryMap,
}

// =============================================================================
// HistoryStore
// =============================================================================

/// JSON file backing the classification history.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history, or an empty one if the file is missing or corrupt.
    pub fn load(&self) -> History {
        load(&self.path).unwrap_or_default()
    }

    /// Save `history` atomically.
    pub fn save(&self, history: &History) -> Result<(), HistoryError> {
        save(history, &self.path)
    }
}

impl HistorySink for HistoryStore {
    fn persist(&mut self, history: &History) -> Result<(), HistoryError> {
        self.save(history)
    }
}

// =============================================================================
// I/O helpers
// =============================================================================

/// Save `history` to `path` atomically (write temp → rename).
///
/// Creates all parent directories as needed.
pub fn save(history: &History, path: &Path) -> Result<(), HistoryError> {
    let file = HistoryFileRef {
        history,
        saved_at: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&file).map_err(|e| HistoryError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    write_atomic(path, json.as_bytes()).map_err(|e| HistoryError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(
        path = %path.display(),
        mine = history.mine().len(),
        enemy = history.enemy().len(),
        "History saved"
    );
    Ok(())
}

/// Load a `History` from `path`.
///
/// Returns `None` on any error (file not found, JSON parse failure).
/// The caller should treat `None` as "start fresh".
pub fn load(path: &Path) -> Option<History> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| {
            // Distinguish "file not found" (normal first run) from other errors.
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "Cannot read history file");
            }
        })
        .ok()?;

    let file: HistoryFile = serde_json::from_str(&content)
        .map_err(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "History file is malformed; starting fresh"
            );
        })
        .ok()?;

    let mut history = History::new();
    for (key, entry) in file.player_history {
        history.insert(Side::Mine, key, entry);
    }
    for (key, entry) in file.enemy_history {
        if history.side_of(&key).is_some() {
            tracing::warn!(key = %key, "Key present in both histories; keeping the mine snapshot");
            continue;
        }
        history.insert(Side::Enemy, key, entry);
    }

    tracing::info!(
        path = %path.display(),
        mine = history.mine().len(),
        enemy = history.enemy().len(),
        "History file loaded"
    );
    Some(history)
}

// =============================================================================
// Unit tests
// =============================================================================
