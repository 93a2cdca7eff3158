// DexTracker - core/filter.rs
//
// Composable name filter for the listing and for export.
// All active filters are AND-combined.
// Core layer: pure logic, no I/O.

use crate::core::display::ListSection;
use crate::core::model::{Entry, EntryMap, Source};
use crate::util::error::FilterError;
use regex::Regex;
use std::collections::HashSet;

/// Complete filter state. All fields are AND-combined when applied.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Sources to include (empty = all).
    pub sources: HashSet<Source>,

    /// Substring search on the display name (case-insensitive). Empty = no filter.
    pub text_search: String,

    /// Compiled regex applied to the display name. None = no regex filter.
    pub regex_search: Option<Regex>,

    /// Substring of the TYPE field (case-insensitive), e.g. "fire". Empty = no filter.
    pub type_search: String,
}

impl ListFilter {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
            && self.text_search.is_empty()
            && self.regex_search.is_none()
            && self.type_search.is_empty()
    }

    /// Set the regex search pattern, compiling it.
    /// Returns an error if the pattern is invalid.
    pub fn set_regex(&mut self, pattern: &str) -> Result<(), FilterError> {
        if pattern.is_empty() {
            self.regex_search = None;
            return Ok(());
        }
        let regex = Regex::new(pattern).map_err(|e| FilterError::InvalidRegex {
            pattern: pattern.to_string(),
            source: e,
        })?;
        self.regex_search = Some(regex);
        Ok(())
    }

    /// Whether a section from `source` is shown at all.
    pub fn includes_source(&self, source: Source) -> bool {
        self.sources.is_empty() || self.sources.contains(&source)
    }

    /// Check a single entry against the name and type filters.
    pub fn matches(&self, key: &str, entry: &Entry) -> bool {
        let name = entry.display_name(key);

        if !self.text_search.is_empty()
            && !name.to_lowercase().contains(&self.text_search.to_lowercase())
        {
            return false;
        }

        if let Some(ref regex) = self.regex_search {
            if !regex.is_match(name) {
                return false;
            }
        }

        if !self.type_search.is_empty()
            && !entry
                .get(crate::util::constants::FIELD_TYPE)
                .to_lowercase()
                .contains(&self.type_search.to_lowercase())
        {
            return false;
        }

        true
    }
}

/// Keep only the entries of `map` that pass `filter`.
pub fn apply_to_map<'a>(map: &'a EntryMap, filter: &ListFilter) -> Vec<(&'a str, &'a Entry)> {
    map.iter()
        .filter(|(key, entry)| filter.matches(key, entry))
        .map(|(key, entry)| (key.as_str(), entry))
        .collect()
}

/// Drop excluded sections from a listing, and names that fail the text or
/// regex filters. The type filter needs entries and is applied by
/// [`apply_to_map`] instead.
pub fn apply_to_listing(sections: Vec<ListSection>, filter: &ListFilter) -> Vec<ListSection> {
    if filter.is_empty() {
        return sections;
    }
    let text_lower = filter.text_search.to_lowercase();

    sections
        .into_iter()
        .filter(|s| filter.includes_source(s.source))
        .map(|mut s| {
            s.names.retain(|name| {
                (text_lower.is_empty() || name.to_lowercase().contains(&text_lower))
                    && filter.regex_search.as_ref().map_or(true, |re| re.is_match(name))
            });
            s
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::display::listing;
    use crate::core::model::{History, Side};
    use crate::core::parser::parse_content;

    const LOG: &str = "\
NUM|NAME|TYPE
1|Bulbasaur|GRASS/POISON
4|Charmander|FIRE
5|Charmeleon|FIRE
7|Squirtle|WATER
";

    #[test]
    fn test_empty_filter_matches_everything() {
        let log = parse_content(LOG).entries;
        let filter = ListFilter::default();
        assert!(filter.is_empty());
        assert_eq!(apply_to_map(&log, &filter).len(), 4);
    }

    #[test]
    fn test_text_search_case_insensitive() {
        let log = parse_content(LOG).entries;
        let filter = ListFilter {
            text_search: "CHARM".to_string(),
            ..Default::default()
        };
        let keys: Vec<_> = apply_to_map(&log, &filter).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["charmander", "charmeleon"]);
    }

    #[test]
    fn test_regex_and_type_are_and_combined() {
        let log = parse_content(LOG).entries;
        let mut filter = ListFilter {
            type_search: "fire".to_string(),
            ..Default::default()
        };
        filter.set_regex("der$").unwrap();
        let keys: Vec<_> = apply_to_map(&log, &filter).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["charmander"]);
    }

    #[test]
    fn test_invalid_regex_returns_error() {
        let mut filter = ListFilter::default();
        let err = filter.set_regex("[unclosed").unwrap_err();
        assert!(matches!(err, FilterError::InvalidRegex { .. }));
        assert!(filter.regex_search.is_none());
    }

    #[test]
    fn test_empty_regex_clears() {
        let mut filter = ListFilter::default();
        filter.set_regex("a").unwrap();
        filter.set_regex("").unwrap();
        assert!(filter.regex_search.is_none());
    }

    #[test]
    fn test_listing_filter_by_source_and_text() {
        let log = parse_content(LOG).entries;
        let mut history = History::new();
        history.insert(Side::Mine, "squirtle".into(), log["squirtle"].clone());

        let mut filter = ListFilter {
            text_search: "squ".to_string(),
            ..Default::default()
        };
        filter.sources.insert(Source::Log);

        let sections = apply_to_listing(listing(&history, &log), &filter);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].source, Source::Log);
        assert_eq!(sections[0].names, vec!["Squirtle"]);
    }
}
