// DexTracker - app/tracker.rs
//
// Application state: the loaded log, the classification history, and the
// store that persists it. Owned by the host (CLI command or shell) for the
// lifetime of the process.
//
// Lifecycle: `open` at startup, mutate through `lookup` / `classify` /
// `clear_history` (each persists immediately), `close` at shutdown.

use crate::app::history_store::HistoryStore;
use crate::core::display::{self, ListSection};
use crate::core::lookup::{self, ClassificationPrompt, LookupOutcome};
use crate::core::model::{Entry, EntryMap, History, Side};
use crate::core::parser::{self, ParseResult};
use crate::platform::fs::read_file_lossy;
use crate::util::error::{HistoryError, ParseError};
use std::path::{Path, PathBuf};

/// Read and parse a stat log from disk.
///
/// Fails only if the file cannot be read; malformed lines are skipped.
pub fn load_log_file(path: &Path) -> Result<ParseResult, ParseError> {
    let content = read_file_lossy(path).map_err(|e| ParseError::Io {
        file: path.to_path_buf(),
        source: e,
    })?;
    let result = parser::parse_content(&content);
    tracing::info!(
        file = %path.display(),
        entries = result.entries.len(),
        skipped = result.skipped_lines,
        "Log loaded"
    );
    Ok(result)
}

/// Counters reported after a log load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub entries: usize,
    pub skipped_lines: u64,
    pub header_found: bool,
}

/// Top-level application state.
#[derive(Debug)]
pub struct Tracker {
    /// Entries from the most recently loaded log, keyed by lowercase name.
    log: EntryMap,

    /// Path of the most recently loaded log.
    log_path: Option<PathBuf>,

    /// Mine/enemy classification snapshots.
    history: History,

    /// Where `history` is persisted.
    store: HistoryStore,

    /// True when the last save failed and the file is behind memory.
    dirty: bool,
}

impl Tracker {
    /// Create the tracker, loading the history from `store`.
    ///
    /// A missing or corrupt history file yields an empty history.
    pub fn open(store: HistoryStore) -> Self {
        let history = store.load();
        tracing::debug!(
            path = %store.path().display(),
            classified = history.len(),
            "Tracker opened"
        );
        Self {
            log: EntryMap::new(),
            log_path: None,
            history,
            store,
            dirty: false,
        }
    }

    /// Replace the log collection with the content of `path`.
    ///
    /// On error the previous collection is kept.
    pub fn load_log(&mut self, path: &Path) -> Result<LoadSummary, ParseError> {
        let result = load_log_file(path)?;
        let summary = LoadSummary {
            entries: result.entries.len(),
            skipped_lines: result.skipped_lines,
            header_found: result.header_found,
        };
        self.log = result.entries;
        self.log_path = Some(path.to_path_buf());
        Ok(summary)
    }

    pub fn log(&self) -> &EntryMap {
        &self.log
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_path(&self) -> &Path {
        self.store.path()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Resolve a name, asking `prompt` to classify newly seen log entries.
    pub fn lookup(&mut self, query: &str, prompt: &mut dyn ClassificationPrompt) -> LookupOutcome {
        let outcome = lookup::lookup(query, &mut self.history, &self.log, prompt, &mut self.store);
        if let LookupOutcome::Classified { saved, .. } = &outcome {
            self.dirty = !*saved;
        }
        outcome
    }

    /// Resolve a name and, if it is a log-only entry, classify it as `side`
    /// without asking.
    pub fn classify_name(&mut self, query: &str, side: Side) -> LookupOutcome {
        let mut fixed = move |_: &str| lookup::Classification::from(side);
        self.lookup(query, &mut fixed)
    }

    /// Store a snapshot of `entry` under `key` on `side` and persist.
    ///
    /// The key is removed from the other side if present.
    pub fn classify(
        &mut self,
        key: &str,
        entry: &Entry,
        side: Side,
    ) -> Result<Option<Side>, HistoryError> {
        let result = lookup::classify(&mut self.history, &mut self.store, key, entry, side);
        self.dirty = result.is_err();
        result
    }

    /// Empty both histories and persist the empty state.
    pub fn clear_history(&mut self) -> Result<(), HistoryError> {
        let cleared = self.history.len();
        self.history.clear();
        let result = self.store.save(&self.history);
        self.dirty = result.is_err();
        tracing::info!(cleared, saved = !self.dirty, "History cleared");
        result
    }

    /// Sectioned listing: player history, enemy history, log.
    pub fn listing(&self) -> Vec<ListSection> {
        display::listing(&self.history, &self.log)
    }

    /// Retry a failed save, if any. Safe to call at any time.
    pub fn flush(&mut self) -> Result<(), HistoryError> {
        if self.dirty {
            self.store.save(&self.history)?;
            self.dirty = false;
        }
        Ok(())
    }

    /// Shut down, saving once more if a previous save failed.
    pub fn close(mut self) -> Result<(), HistoryError> {
        let result = self.flush();
        tracing::debug!(ok = result.is_ok(), "Tracker closed");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lookup::Classification;
    use crate::core::model::Source;
    use tempfile::TempDir;

    const LOG: &str = "\
NUM|NAME|TYPE|HP|ATK|DEF|SPE|SATK|SDEF
1|Bulbasaur|GRASS|45|49|49|45|65|65
4|Charmander|FIRE|39|52|43|65|60|50
";

    fn setup() -> (TempDir, Tracker) {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("pokemon_data.log");
        std::fs::write(&log_path, LOG).unwrap();
        let mut tracker = Tracker::open(HistoryStore::new(dir.path().join("h.json")));
        tracker.load_log(&log_path).unwrap();
        (dir, tracker)
    }

    #[test]
    fn test_load_log_missing_file_keeps_previous() {
        let (dir, mut tracker) = setup();
        let err = tracker.load_log(&dir.path().join("missing.log")).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
        assert_eq!(tracker.log().len(), 2);
    }

    #[test]
    fn test_classify_name_persists() {
        let (dir, mut tracker) = setup();
        let outcome = tracker.classify_name("charmander", Side::Enemy);
        assert!(matches!(outcome, LookupOutcome::Classified { side: Side::Enemy, saved: true, .. }));
        assert!(!tracker.is_dirty());

        let reopened = Tracker::open(HistoryStore::new(dir.path().join("h.json")));
        assert_eq!(reopened.history().side_of("charmander"), Some(Side::Enemy));
    }

    #[test]
    fn test_classify_name_does_not_reclassify() {
        let (_dir, mut tracker) = setup();
        tracker.classify_name("bulbasaur", Side::Mine);
        let outcome = tracker.classify_name("bulbasaur", Side::Enemy);
        assert!(matches!(outcome, LookupOutcome::Found { source: Source::Mine, .. }));
    }

    #[test]
    fn test_clear_history_persists_empty() {
        let (dir, mut tracker) = setup();
        let mut prompt = |_: &str| Classification::Mine;
        tracker.lookup("bulbasaur", &mut prompt);
        tracker.clear_history().unwrap();
        assert!(tracker.history().is_empty());

        let on_disk = crate::app::history_store::load(&dir.path().join("h.json")).unwrap();
        assert!(on_disk.is_empty());
    }

    #[test]
    fn test_save_failure_marks_dirty_and_close_retries() {
        let dir = TempDir::new().unwrap();
        // A directory where the history file should be makes every save fail.
        let blocked = dir.path().join("blocked");
        std::fs::create_dir_all(blocked.join("h.json")).unwrap();
        let log_path = dir.path().join("log.txt");
        std::fs::write(&log_path, LOG).unwrap();

        let mut tracker = Tracker::open(HistoryStore::new(blocked.join("h.json")));
        tracker.load_log(&log_path).unwrap();
        let outcome = tracker.classify_name("bulbasaur", Side::Mine);
        assert!(matches!(outcome, LookupOutcome::Classified { saved: false, .. }));
        assert!(tracker.is_dirty());
        assert_eq!(tracker.history().side_of("bulbasaur"), Some(Side::Mine));
        assert!(tracker.close().is_err());
    }
}
