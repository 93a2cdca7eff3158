// DexTracker - core/display.rs
//
// Plain-text rendering of entries and the sectioned listing.
// Pure string building; the host decides where the text goes.

use crate::core::lookup::{LookupOutcome, Match};
use crate::core::model::{Entry, EntryMap, History, Side, Source};
use crate::core::stats::stat_total;
use crate::util::constants;
use std::collections::HashSet;
use std::fmt::Write;

/// Full detail view, used for the user's own entries.
///
/// Known fields come first in a fixed order, then every other non-empty
/// field, then the base stat total. Empty values are omitted.
pub fn full_details(entry: &Entry) -> String {
    let mut out = String::new();
    let mut seen = HashSet::new();

    for field in constants::DETAIL_FIELD_ORDER {
        if let Some(value) = entry.field(field) {
            if !value.trim().is_empty() {
                let _ = writeln!(out, "{field}: {value}");
                seen.insert(*field);
            }
        }
    }
    for (field, value) in entry.fields() {
        if !seen.contains(field) && !value.trim().is_empty() {
            let _ = writeln!(out, "{field}: {value}");
        }
    }
    let _ = writeln!(out, "BST (Base Stat Total): {}", stat_total(entry));
    out
}

/// Short view, used for enemy entries: name and type only.
pub fn enemy_summary(entry: &Entry) -> String {
    let ty = entry
        .field(constants::FIELD_TYPE)
        .unwrap_or(constants::UNKNOWN_TYPE)
        .trim();
    format!("{}\nType: {ty}\n", entry.name())
}

/// Render an entry the way its side is shown: full details for mine and
/// for unclassified log entries, a summary for enemies.
pub fn details_for(source: Source, entry: &Entry) -> String {
    match source {
        Source::Enemy => enemy_summary(entry),
        Source::Mine | Source::Log => full_details(entry),
    }
}

/// Multi-line list of ambiguous matches.
pub fn match_list(matches: &[Match]) -> String {
    let mut out = String::from("Multiple matches found:\n");
    for m in matches {
        let _ = writeln!(out, "- {}", m.name);
    }
    out
}

/// Text shown to the user for a lookup outcome.
pub fn outcome_text(outcome: &LookupOutcome) -> String {
    match outcome {
        LookupOutcome::EmptyQuery => "Type a name to search.\n".to_string(),
        LookupOutcome::NotFound { .. } => "No matches found.\n".to_string(),
        LookupOutcome::Ambiguous { matches } => match_list(matches),
        LookupOutcome::Found { source, entry, .. } => details_for(*source, entry),
        LookupOutcome::Classified { side, entry, .. } => details_for(Source::from(*side), entry),
        LookupOutcome::Cancelled { .. } => "[Cancelled]\n".to_string(),
    }
}

// =============================================================================
// Listing
// =============================================================================

/// One block of the listing: a header and the display names under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSection {
    pub source: Source,
    pub title: &'static str,
    pub names: Vec<String>,
}

/// Build the sectioned listing: player history and enemy history (each only
/// when non-empty), then the loaded log (always). Names within a section are
/// sorted case-insensitively.
pub fn listing(history: &History, log: &EntryMap) -> Vec<ListSection> {
    let mut sections = Vec::with_capacity(3);
    for side in [Side::Mine, Side::Enemy] {
        let map = history.side(side);
        if !map.is_empty() {
            sections.push(section(Source::from(side), map));
        }
    }
    sections.push(section(Source::Log, log));
    sections
}

fn section(source: Source, map: &EntryMap) -> ListSection {
    let title = match source {
        Source::Mine => constants::SECTION_PLAYER,
        Source::Enemy => constants::SECTION_ENEMY,
        Source::Log => constants::SECTION_LOG,
    };
    let mut names: Vec<String> = map
        .iter()
        .map(|(key, entry)| entry.display_name(key).to_string())
        .collect();
    names.sort_by_key(|name| name.to_lowercase());
    ListSection {
        source,
        title,
        names,
    }
}

/// Render sections as lines: each title followed by its names.
pub fn render_listing(sections: &[ListSection]) -> String {
    let mut out = String::new();
    for s in sections {
        let _ = writeln!(out, "{}", s.title);
        for name in &s.names {
            let _ = writeln!(out, "{name}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_content;

    const LOG: &str = "\
NUM|NAME|TYPE|HP|ATK|DEF|SPE|SATK|SDEF|ABILITY1|ITEM|NATURE
1|Bulbasaur|GRASS/POISON|45|49|49|45|65|65|Overgrow||Bold
4|charmander|FIRE|39|52|43|65|60|50|Blaze|Charcoal|
";

    #[test]
    fn test_full_details_order_and_bst() {
        let log = parse_content(LOG).entries;
        let text = full_details(&log["bulbasaur"]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "NUM: 1",
                "NAME: Bulbasaur",
                "TYPE: GRASS/POISON",
                "HP: 45",
                "ATK: 49",
                "DEF: 49",
                "SPE: 45",
                "SATK: 65",
                "SDEF: 65",
                "ABILITY1: Overgrow",
                "NATURE: Bold",
                "BST (Base Stat Total): 318",
            ]
        );
    }

    #[test]
    fn test_enemy_summary() {
        let log = parse_content(LOG).entries;
        assert_eq!(enemy_summary(&log["charmander"]), "charmander\nType: FIRE\n");
        assert_eq!(enemy_summary(&Entry::default()), "\nType: Unknown\n");
    }

    #[test]
    fn test_listing_sections_and_sorting() {
        let log = parse_content(LOG).entries;
        let mut history = History::new();
        history.insert(Side::Enemy, "charmander".into(), log["charmander"].clone());

        let sections = listing(&history, &log);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, constants::SECTION_ENEMY);
        assert_eq!(sections[0].names, vec!["charmander"]);
        assert_eq!(sections[1].title, constants::SECTION_LOG);
        assert_eq!(sections[1].names, vec!["Bulbasaur", "charmander"]);

        let text = render_listing(&sections);
        assert!(text.starts_with("--- Enemy History ---\ncharmander\n--- From Log ---\n"));
    }

    #[test]
    fn test_listing_always_has_log_section() {
        let sections = listing(&History::new(), &EntryMap::new());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].source, Source::Log);
        assert!(sections[0].names.is_empty());
    }
}
