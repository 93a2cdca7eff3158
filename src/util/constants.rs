// DexTracker - util/constants.rs
//
// Single source of truth for all named constants, field names, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "DexTracker";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "DexTracker";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log file format
// =============================================================================

/// Field separator used by the stat log.
pub const FIELD_SEPARATOR: char = '|';

/// Upper-cased prefix that marks the header line. Everything before the
/// first line starting with this prefix is ignored.
pub const HEADER_PREFIX: &str = "NUM|NAME";

/// Field holding the entry's display name (and, lowercased, its key).
pub const FIELD_NAME: &str = "NAME";

/// Field holding the entry's type string.
pub const FIELD_TYPE: &str = "TYPE";

/// Field holding the dex number.
pub const FIELD_NUM: &str = "NUM";

/// Computed base stat total column in exports.
pub const FIELD_BST: &str = "BST";

/// The six stat fields summed into the base stat total, in display order.
pub const STAT_FIELDS: &[&str] = &["HP", "ATK", "DEF", "SPE", "SATK", "SDEF"];

/// Fields every entry is guaranteed to carry (defaulted to "" when absent).
pub const REQUIRED_FIELDS: &[&str] = &[
    FIELD_TYPE, FIELD_NUM, "HP", "ATK", "DEF", "SPE", "SATK", "SDEF",
];

/// Preferred order of fields in the full detail view. Any other non-empty
/// fields follow in key order.
pub const DETAIL_FIELD_ORDER: &[&str] = &[
    "NUM", "NAME", "TYPE", "HP", "ATK", "DEF", "SPE", "SATK", "SDEF", "ABILITY1", "ABILITY2",
    "ABILITY3", "ITEM",
];

/// Placeholder type shown in the enemy summary when the entry has no TYPE field.
pub const UNKNOWN_TYPE: &str = "Unknown";

// =============================================================================
// Listing
// =============================================================================

/// Section header for player ("mine") history in the listing.
pub const SECTION_PLAYER: &str = "--- Player History ---";

/// Section header for enemy history in the listing.
pub const SECTION_ENEMY: &str = "--- Enemy History ---";

/// Section header for entries from the currently loaded log.
pub const SECTION_LOG: &str = "--- From Log ---";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Export
// =============================================================================

/// Maximum number of entries that can be exported in a single operation.
pub const MAX_EXPORT_ENTRIES: usize = 100_000;

// =============================================================================
// Files
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Log file loaded at startup when no path is given (relative to the
/// working directory).
pub const DEFAULT_LOG_FILE: &str = "pokemon_data.log";

/// History file name (stored in the platform data directory).
pub const HISTORY_FILE_NAME: &str = "pokemon_history.json";
