// DexTracker - core/parser.rs
//
// Pipe-delimited stat log parsing.
// Core layer: accepts file content as a string, never touches the
// filesystem directly (the app layer handles reading).

use crate::core::model::{key_for, Entry, EntryMap};
use crate::util::constants;
use std::collections::BTreeMap;

/// Result of parsing one stat log.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Parsed entries keyed by lowercased NAME.
    pub entries: EntryMap,
    /// Whether a `NUM|NAME` header line was found.
    pub header_found: bool,
    /// Non-blank lines examined, header included.
    pub lines_processed: u64,
    /// Data lines dropped because of a field-count mismatch or empty NAME.
    pub skipped_lines: u64,
}

/// Parse the content of a stat log.
///
/// Blank lines are ignored. The first line whose upper-cased form starts with
/// `NUM|NAME` is the header; its fields are trimmed and upper-cased and become
/// the field names of every entry. Each following line with exactly as many
/// `|`-separated fields as the header becomes one entry. Lines with a
/// different field count, or with an empty NAME, are skipped. A later line
/// with the same (case-insensitive) name replaces an earlier one.
pub fn parse_content(content: &str) -> ParseResult {
    let mut result = ParseResult::default();
    let mut headers: Option<Vec<String>> = None;

    for (line_idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        result.lines_processed += 1;

        let header = match &headers {
            Some(header) => header,
            None => {
                if line.to_uppercase().starts_with(constants::HEADER_PREFIX) {
                    let fields: Vec<String> =
                        split_fields(line).map(|h| h.to_uppercase()).collect();
                    tracing::debug!(
                        line = line_idx + 1,
                        columns = fields.len(),
                        "Header found"
                    );
                    headers = Some(fields);
                    result.header_found = true;
                }
                continue;
            }
        };

        let parts: Vec<&str> = split_fields(line).collect();
        if parts.len() != header.len() {
            result.skipped_lines += 1;
            tracing::debug!(
                line = line_idx + 1,
                expected = header.len(),
                found = parts.len(),
                preview = %preview(line),
                "Skipping line with mismatched field count"
            );
            continue;
        }

        let fields: BTreeMap<String, String> = header
            .iter()
            .cloned()
            .zip(parts.into_iter().map(str::to_string))
            .collect();

        let key = key_for(fields.get(constants::FIELD_NAME).map_or("", String::as_str));
        if key.is_empty() {
            result.skipped_lines += 1;
            tracing::debug!(line = line_idx + 1, "Skipping line with empty NAME");
            continue;
        }

        result.entries.insert(key, Entry::from_fields(fields));
    }

    if !result.header_found {
        tracing::warn!(
            lines = result.lines_processed,
            "No NUM|NAME header found; log contains no entries"
        );
    }

    result
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(constants::FIELD_SEPARATOR).map(str::trim)
}

/// Truncate a line for debug output.
fn preview(line: &str) -> &str {
    match line.char_indices().nth(constants::DEBUG_MAX_LINE_PREVIEW) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Randomizer log v3
Some preamble | with pipes

NUM|NAME|TYPE|HP|ATK|DEF|SATK|SDEF|SPE|ABILITY1|ITEM
1|Bulbasaur|GRASS/POISON|45|49|49|65|65|45|Overgrow|
4 | Charmander | FIRE | 39 | 52 | 43 | 60 | 50 | 65 | Blaze | Charcoal
7|Squirtle|WATER|44|48|65
";

    #[test]
    fn test_parse_basic_lines() {
        let result = parse_content(SAMPLE);
        assert!(result.header_found);
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.skipped_lines, 1);
        assert_eq!(result.lines_processed, 6);

        let bulba = &result.entries["bulbasaur"];
        assert_eq!(bulba.get("NUM"), "1");
        assert_eq!(bulba.get("TYPE"), "GRASS/POISON");
        assert_eq!(bulba.get("ABILITY1"), "Overgrow");
        assert_eq!(bulba.field("ITEM"), Some(""));
    }

    #[test]
    fn test_parse_trims_every_field() {
        let result = parse_content(SAMPLE);
        let charm = &result.entries["charmander"];
        assert_eq!(charm.name(), "Charmander");
        assert_eq!(charm.get("TYPE"), "FIRE");
        assert_eq!(charm.get("ITEM"), "Charcoal");
    }

    #[test]
    fn test_parse_header_is_case_insensitive() {
        let content = "num|name|type|hp\n25|Pikachu|ELECTRIC|35\n";
        let result = parse_content(content);
        let pika = &result.entries["pikachu"];
        assert_eq!(pika.get("NAME"), "Pikachu");
        assert_eq!(pika.get("HP"), "35");
        // Stats the header never mentioned still exist, empty.
        assert_eq!(pika.field("SDEF"), Some(""));
    }

    #[test]
    fn test_parse_lines_before_header_are_ignored() {
        let content = "1|Bulbasaur|GRASS\nNUM|NAME|TYPE\n4|Charmander|FIRE\n";
        let result = parse_content(content);
        assert_eq!(result.entries.len(), 1);
        assert!(result.entries.contains_key("charmander"));
    }

    #[test]
    fn test_parse_without_header_yields_nothing() {
        let result = parse_content("1|Bulbasaur|GRASS\n4|Charmander|FIRE\n");
        assert!(!result.header_found);
        assert!(result.entries.is_empty());
    }

    #[test]
    fn test_parse_skips_empty_name() {
        let content = "NUM|NAME|TYPE\n0|   |NORMAL\n1|Bulbasaur|GRASS\n";
        let result = parse_content(content);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.skipped_lines, 1);
    }

    #[test]
    fn test_parse_duplicate_name_last_wins() {
        let content = "NUM|NAME|TYPE\n1|Eevee|NORMAL\n2|EEVEE|FIRE\n";
        let result = parse_content(content);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries["eevee"].get("TYPE"), "FIRE");
        assert_eq!(result.entries["eevee"].name(), "EEVEE");
    }

    #[test]
    fn test_parse_empty_content() {
        let result = parse_content("");
        assert!(result.entries.is_empty());
        assert_eq!(result.lines_processed, 0);
    }
}
