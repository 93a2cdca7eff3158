// DexTracker - core/lookup.rs
//
// Name resolution across mine history, enemy history and the loaded log,
// plus classification of newly seen entries.
//
// The core never blocks on a user or touches the disk itself: the host
// supplies a `ClassificationPrompt` (asks mine/enemy/cancel) and a
// `HistorySink` (persists the history after every change).

use crate::core::model::{key_for, Entry, EntryMap, History, Side, Source};
use crate::util::error::HistoryError;
use std::collections::HashSet;

// =============================================================================
// Capabilities
// =============================================================================

/// Answer to "is this entry yours or an enemy's?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Mine,
    Enemy,
    /// The user declined to choose; the entry stays unclassified.
    Cancelled,
}

impl Classification {
    /// The chosen side, `None` when cancelled.
    pub fn side(self) -> Option<Side> {
        match self {
            Classification::Mine => Some(Side::Mine),
            Classification::Enemy => Some(Side::Enemy),
            Classification::Cancelled => None,
        }
    }
}

impl From<Side> for Classification {
    fn from(side: Side) -> Self {
        match side {
            Side::Mine => Classification::Mine,
            Side::Enemy => Classification::Enemy,
        }
    }
}

/// Host capability that asks the user to classify an entry.
pub trait ClassificationPrompt {
    fn classify(&mut self, display_name: &str) -> Classification;
}

impl<F> ClassificationPrompt for F
where
    F: FnMut(&str) -> Classification,
{
    fn classify(&mut self, display_name: &str) -> Classification {
        self(display_name)
    }
}

/// Host capability that persists the history.
pub trait HistorySink {
    fn persist(&mut self, history: &History) -> Result<(), HistoryError>;
}

// =============================================================================
// Resolution (pure)
// =============================================================================

/// One candidate from a substring search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub key: String,
    /// Display name from the highest-priority source holding the key.
    pub name: String,
    pub source: Source,
}

/// Outcome of resolving a query without side effects.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The query was blank.
    Empty,
    NotFound,
    /// Two or more substring matches; none is selected.
    Ambiguous(Vec<Match>),
    /// A single entry. `source` is `Log` only when neither history holds
    /// the key.
    Found {
        source: Source,
        key: String,
        entry: &'a Entry,
    },
}

/// Resolve a user-supplied name (case-insensitive, exact or substring).
///
/// Exact key or NAME matches are tried in mine history, enemy history, then
/// the log. Failing that, substring matches are collected across the same
/// three sources in the same order, deduplicated by key. A single substring
/// match is treated as exact. A log hit whose key is present in either
/// history resolves to the history snapshot.
pub fn resolve<'a>(query: &str, history: &'a History, log: &'a EntryMap) -> Resolution<'a> {
    let query = key_for(query);
    if query.is_empty() {
        return Resolution::Empty;
    }

    let sources: [(Source, &'a EntryMap); 3] = [
        (Source::Mine, history.mine()),
        (Source::Enemy, history.enemy()),
        (Source::Log, log),
    ];

    let exact = sources
        .iter()
        .find_map(|(source, map)| find_exact(&query, map).map(|key| (*source, key)));

    let (source, key) = match exact {
        Some(hit) => hit,
        None => {
            let matches = collect_substring_matches(&query, &sources, history, log);
            match matches.len() {
                0 => return Resolution::NotFound,
                1 => {
                    let only = &matches[0];
                    (only.source, only.key.clone())
                }
                _ => return Resolution::Ambiguous(matches),
            }
        }
    };

    found(source, key, history, log)
}

fn find_exact(query: &str, map: &EntryMap) -> Option<String> {
    if map.contains_key(query) {
        return Some(query.to_string());
    }
    map.iter()
        .find(|(_, entry)| entry.name().to_lowercase() == query)
        .map(|(key, _)| key.clone())
}

fn collect_substring_matches(
    query: &str,
    sources: &[(Source, &EntryMap)],
    history: &History,
    log: &EntryMap,
) -> Vec<Match> {
    let mut seen = HashSet::new();
    let mut matches = Vec::new();

    for (_, map) in sources {
        for (key, entry) in map.iter() {
            let hit = key.contains(query) || entry.name().to_lowercase().contains(query);
            if hit && seen.insert(key.clone()) {
                let (source, owner) = owner_of(key, history, log).unwrap_or((Source::Log, entry));
                matches.push(Match {
                    key: key.clone(),
                    name: owner.display_name(key).to_string(),
                    source,
                });
            }
        }
    }
    matches
}

/// Highest-priority source holding `key`: mine, enemy, then log.
fn owner_of<'a>(key: &str, history: &'a History, log: &'a EntryMap) -> Option<(Source, &'a Entry)> {
    history
        .get(key)
        .map(|(side, entry)| (Source::from(side), entry))
        .or_else(|| log.get(key).map(|entry| (Source::Log, entry)))
}

fn found<'a>(source: Source, key: String, history: &'a History, log: &'a EntryMap) -> Resolution<'a> {
    let resolved = match source {
        Source::Log => owner_of(&key, history, log),
        Source::Mine => history.mine().get(&key).map(|e| (Source::Mine, e)),
        Source::Enemy => history.enemy().get(&key).map(|e| (Source::Enemy, e)),
    };
    match resolved {
        Some((source, entry)) => Resolution::Found { source, key, entry },
        None => Resolution::NotFound,
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Copy `entry` into the `side` history under `key` and persist.
///
/// The in-memory history is updated even when persisting fails; the error
/// is returned so the caller can retry the save later. Returns the side that
/// previously held the key, if any.
pub fn classify(
    history: &mut History,
    sink: &mut dyn HistorySink,
    key: &str,
    entry: &Entry,
    side: Side,
) -> Result<Option<Side>, HistoryError> {
    let previous = history.insert(side, key.to_string(), entry.clone());
    match previous {
        Some(prev) if prev != side => {
            tracing::info!(key, from = %prev, to = %side, "Entry reclassified");
        }
        Some(_) => tracing::debug!(key, side = %side, "Replacing existing snapshot"),
        None => tracing::info!(key, side = %side, "Entry classified"),
    }
    sink.persist(history)?;
    Ok(previous)
}

/// Result of a full lookup, including any classification performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    EmptyQuery,
    NotFound {
        query: String,
    },
    Ambiguous {
        matches: Vec<Match>,
    },
    /// Resolved to an existing history snapshot, or (only when the prompt
    /// is never needed) a log entry.
    Found {
        source: Source,
        key: String,
        entry: Entry,
    },
    /// A log-only entry was classified by the user during this lookup.
    Classified {
        side: Side,
        key: String,
        entry: Entry,
        /// False if the history could not be written.
        saved: bool,
    },
    /// The user declined to classify a log-only entry.
    Cancelled {
        key: String,
        name: String,
    },
}

/// Resolve `query` and, for a log-only entry, ask `prompt` to classify it.
///
/// An accepted classification copies the log entry into the chosen history
/// and persists immediately through `sink`. A failed save is logged and
/// reported as `saved: false`; it never loses the classification.
pub fn lookup(
    query: &str,
    history: &mut History,
    log: &EntryMap,
    prompt: &mut dyn ClassificationPrompt,
    sink: &mut dyn HistorySink,
) -> LookupOutcome {
    let (key, entry) = match resolve(query, history, log) {
        Resolution::Empty => return LookupOutcome::EmptyQuery,
        Resolution::NotFound => {
            return LookupOutcome::NotFound {
                query: query.trim().to_string(),
            }
        }
        Resolution::Ambiguous(matches) => {
            tracing::debug!(query, count = matches.len(), "Ambiguous lookup");
            return LookupOutcome::Ambiguous { matches };
        }
        Resolution::Found { source, key, entry } if source != Source::Log => {
            return LookupOutcome::Found {
                source,
                key,
                entry: entry.clone(),
            };
        }
        Resolution::Found { key, entry, .. } => (key, entry.clone()),
    };

    let name = entry.display_name(&key).to_string();
    let Some(side) = prompt.classify(&name).side() else {
        tracing::debug!(key = %key, "Classification cancelled");
        return LookupOutcome::Cancelled { key, name };
    };

    let saved = match classify(history, sink, &key, &entry, side) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, key = %key, "Classification kept in memory but not saved");
            false
        }
    };

    LookupOutcome::Classified {
        side,
        key,
        entry,
        saved,
    }
}
