// DexTracker - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no platform
// dependencies. These types are the shared vocabulary across all layers.

use crate::util::constants;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from entry key (lowercased NAME) to entry.
///
/// Keeps insertion order: log line order for a parsed log, file order for a
/// loaded history. Re-inserting an existing key keeps its position.
pub type EntryMap = IndexMap<String, Entry>;

/// Derive the lookup key for a display name: trimmed and lowercased.
pub fn key_for(name: &str) -> String {
    name.trim().to_lowercase()
}

// =============================================================================
// Entry
// =============================================================================

/// One creature's field set, parsed from the log or stored in history.
///
/// Field names are upper-case (the parser folds header names). Serialises as
/// a flat JSON object of field name to string value, which is also the shape
/// stored in the history file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry {
    fields: BTreeMap<String, String>,
}

impl Entry {
    /// Build an entry from parsed fields, inserting an empty string for every
    /// required field (TYPE, NUM and the six stats) that is missing.
    pub fn from_fields(mut fields: BTreeMap<String, String>) -> Self {
        for field in constants::REQUIRED_FIELDS {
            fields.entry((*field).to_string()).or_default();
        }
        Self { fields }
    }

    /// Raw value of a field, `None` if the entry does not carry it.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Value of a field, or "" when absent.
    pub fn get(&self, name: &str) -> &str {
        self.field(name).unwrap_or("")
    }

    /// Display name, trimmed.
    pub fn name(&self) -> &str {
        self.get(constants::FIELD_NAME).trim()
    }

    /// Case-insensitive key derived from NAME.
    pub fn key(&self) -> String {
        key_for(self.name())
    }

    /// Display name, falling back to `key` when the entry has no NAME field.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        match self.field(constants::FIELD_NAME) {
            Some(name) => name.trim(),
            None => key,
        }
    }

    /// Iterate over all `(field, value)` pairs in field-name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// =============================================================================
// Side / Source
// =============================================================================

/// Which history a classified entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The user's own creature ("player history").
    Mine,
    /// An opponent's creature.
    Enemy,
}

impl Side {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Side::Mine => "Mine",
            Side::Enemy => "Enemy",
        }
    }

    /// The opposite side.
    pub fn other(&self) -> Side {
        match self {
            Side::Mine => Side::Enemy,
            Side::Enemy => Side::Mine,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    /// Accepts "mine", "yours", "player" (and their first letters) or "enemy".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mine" | "m" | "yours" | "y" | "player" | "p" => Ok(Side::Mine),
            "enemy" | "e" => Ok(Side::Enemy),
            other => Err(format!("'{other}' is not a side (expected mine or enemy)")),
        }
    }
}

/// Where a resolved entry came from, in lookup priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Mine,
    Enemy,
    Log,
}

impl Source {
    /// All sources in lookup priority order.
    pub fn all() -> &'static [Source] {
        &[Source::Mine, Source::Enemy, Source::Log]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Source::Mine => "Mine",
            Source::Enemy => "Enemy",
            Source::Log => "Log",
        }
    }
}

impl From<Side> for Source {
    fn from(side: Side) -> Self {
        match side {
            Side::Mine => Source::Mine,
            Side::Enemy => Source::Enemy,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// History
// =============================================================================

/// Persisted classification results: entry snapshots the user has marked as
/// their own ("mine") or an opponent's ("enemy").
///
/// A key is held by at most one side at a time; [`History::insert`] enforces
/// this by evicting the key from the other side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    #[serde(rename = "player_history", default)]
    mine: EntryMap,

    #[serde(rename = "enemy_history", default)]
    enemy: EntryMap,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries on one side.
    pub fn side(&self, side: Side) -> &EntryMap {
        match side {
            Side::Mine => &self.mine,
            Side::Enemy => &self.enemy,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut EntryMap {
        match side {
            Side::Mine => &mut self.mine,
            Side::Enemy => &mut self.enemy,
        }
    }

    pub fn mine(&self) -> &EntryMap {
        &self.mine
    }

    pub fn enemy(&self) -> &EntryMap {
        &self.enemy
    }

    /// The side currently holding `key`, if any.
    pub fn side_of(&self, key: &str) -> Option<Side> {
        if self.mine.contains_key(key) {
            Some(Side::Mine)
        } else if self.enemy.contains_key(key) {
            Some(Side::Enemy)
        } else {
            None
        }
    }

    /// Look up a snapshot by key on either side.
    pub fn get(&self, key: &str) -> Option<(Side, &Entry)> {
        self.mine
            .get(key)
            .map(|e| (Side::Mine, e))
            .or_else(|| self.enemy.get(key).map(|e| (Side::Enemy, e)))
    }

    /// Store a snapshot under `key` on `side`.
    ///
    /// Replaces any existing snapshot for the key on that side and removes
    /// the key from the other side. Returns the side that previously held
    /// the key, if any.
    pub fn insert(&mut self, side: Side, key: String, entry: Entry) -> Option<Side> {
        let previous = self.side_of(&key);
        self.side_mut(side.other()).shift_remove(&key);
        self.side_mut(side).insert(key, entry);
        previous
    }

    /// Remove every snapshot from both sides.
    pub fn clear(&mut self) {
        self.mine.clear();
        self.enemy.clear();
    }

    pub fn len(&self) -> usize {
        self.mine.len() + self.enemy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mine.is_empty() && self.enemy.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> Entry {
        let mut fields = BTreeMap::new();
        fields.insert("NAME".to_string(), name.to_string());
        Entry::from_fields(fields)
    }

    #[test]
    fn test_from_fields_fills_required_fields() {
        let e = entry("Bulbasaur");
        for field in constants::REQUIRED_FIELDS {
            assert_eq!(e.field(field), Some(""), "missing default for {field}");
        }
        assert_eq!(e.name(), "Bulbasaur");
        assert_eq!(e.key(), "bulbasaur");
    }

    #[test]
    fn test_from_fields_keeps_existing_values() {
        let mut fields = BTreeMap::new();
        fields.insert("NAME".to_string(), "Onix".to_string());
        fields.insert("HP".to_string(), "35".to_string());
        let e = Entry::from_fields(fields);
        assert_eq!(e.get("HP"), "35");
        assert_eq!(e.get("ITEM"), "");
        assert_eq!(e.field("ITEM"), None);
    }

    #[test]
    fn test_key_for_trims_and_lowercases() {
        assert_eq!(key_for("  Mr. Mime "), "mr. mime");
    }

    #[test]
    fn test_history_insert_evicts_other_side() {
        let mut history = History::new();
        assert_eq!(history.insert(Side::Enemy, "onix".into(), entry("Onix")), None);
        assert_eq!(
            history.insert(Side::Mine, "onix".into(), entry("ONIX")),
            Some(Side::Enemy)
        );
        assert!(history.enemy().is_empty());
        assert_eq!(history.get("onix").map(|(s, e)| (s, e.name())), Some((Side::Mine, "ONIX")));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_history_serialises_with_legacy_keys() {
        let mut history = History::new();
        history.insert(Side::Mine, "pikachu".into(), entry("Pikachu"));
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.get("player_history").unwrap().get("pikachu").is_some());
        assert!(json.get("enemy_history").unwrap().as_object().unwrap().is_empty());
    }

    #[test]
    fn test_history_deserialises_missing_sides_as_empty() {
        let history: History =
            serde_json::from_str(r#"{"enemy_history": {"onix": {"NAME": "Onix"}}}"#).unwrap();
        assert!(history.mine().is_empty());
        assert_eq!(history.side_of("onix"), Some(Side::Enemy));
    }

    #[test]
    fn test_side_from_str() {
        assert_eq!("Yours".parse::<Side>(), Ok(Side::Mine));
        assert_eq!(" enemy ".parse::<Side>(), Ok(Side::Enemy));
        assert!("neutral".parse::<Side>().is_err());
    }
}
