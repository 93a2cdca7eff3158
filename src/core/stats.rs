// DexTracker - core/stats.rs
//
// Base stat total calculation. Pure functions, no I/O.

use crate::core::model::Entry;
use crate::util::constants;
use regex::Regex;
use std::sync::OnceLock;

/// Parse a stat value: an optionally negative run of ASCII digits, after
/// trimming. Anything else (empty, "+5", "4-5", "??") is `None`.
pub fn parse_stat(raw: &str) -> Option<i64> {
    static INTEGER: OnceLock<Regex> = OnceLock::new();
    let re = INTEGER.get_or_init(|| Regex::new(r"^-?[0-9]+$").expect("stat regex is valid"));

    let value = raw.trim();
    if !re.is_match(value) {
        return None;
    }
    value.parse().ok()
}

/// Sum of HP, ATK, DEF, SPE, SATK and SDEF.
///
/// A field that is missing or not a valid integer contributes zero; so does
/// a digit string outside the `i64` range. The sum saturates at `i64::MAX`
/// / `i64::MIN` instead of overflowing.
pub fn stat_total(entry: &Entry) -> i64 {
    constants::STAT_FIELDS
        .iter()
        .filter_map(|field| parse_stat(entry.get(field)))
        .fold(0i64, i64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn entry_with(stats: &[(&str, &str)]) -> Entry {
        let fields: BTreeMap<String, String> = stats
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Entry::from_fields(fields)
    }

    #[test]
    fn test_stat_total_sums_all_six() {
        let e = entry_with(&[
            ("HP", "45"),
            ("ATK", "49"),
            ("DEF", "49"),
            ("SPE", "45"),
            ("SATK", "65"),
            ("SDEF", "65"),
        ]);
        assert_eq!(stat_total(&e), 318);
    }

    #[test]
    fn test_stat_total_non_numeric_counts_zero() {
        let e = entry_with(&[("HP", "45"), ("ATK", "??"), ("DEF", ""), ("SPE", "+5")]);
        assert_eq!(stat_total(&e), 45);
    }

    #[test]
    fn test_stat_total_accepts_negative_and_padded() {
        let e = entry_with(&[("HP", " 100 "), ("ATK", "-10")]);
        assert_eq!(stat_total(&e), 90);
    }

    #[test]
    fn test_stat_total_saturates_instead_of_overflowing() {
        let max = i64::MAX.to_string();
        let e = entry_with(&[("HP", max.as_str()), ("ATK", max.as_str()), ("DEF", "10")]);
        assert_eq!(stat_total(&e), i64::MAX);

        let min = i64::MIN.to_string();
        let e = entry_with(&[("HP", min.as_str()), ("ATK", "-1")]);
        assert_eq!(stat_total(&e), i64::MIN);
    }

    #[test]
    fn test_stat_total_out_of_range_counts_zero() {
        let e = entry_with(&[("HP", "99999999999999999999"), ("ATK", "5")]);
        assert_eq!(stat_total(&e), 5);
    }

    #[test]
    fn test_stat_total_missing_fields() {
        assert_eq!(stat_total(&Entry::default()), 0);
    }

    #[test]
    fn test_parse_stat_rejects_embedded_dash() {
        assert_eq!(parse_stat("4-5"), None);
        assert_eq!(parse_stat("--5"), None);
        assert_eq!(parse_stat("-7"), Some(-7));
    }
}
