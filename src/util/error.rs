// DexTracker - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every variant keeps the path it
// relates to and its underlying cause.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all DexTracker operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum DexError {
    /// Stat log could not be read.
    Parse(ParseError),

    /// History file could not be written.
    History(HistoryError),

    /// Listing filter was invalid.
    Filter(FilterError),

    /// Export operation failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for DexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::History(e) => write!(f, "History error: {e}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for DexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::History(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors related to loading a stat log.
///
/// Individual malformed lines are never errors; they are skipped and counted
/// in the parse result. Only failing to read the file at all is surfaced.
#[derive(Debug)]
pub enum ParseError {
    /// I/O error while opening or reading the log file.
    Io { file: PathBuf, source: io::Error },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { file, source } => {
                write!(f, "'{}': failed to load file: {source}", file.display())
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ParseError> for DexError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// History errors
// ---------------------------------------------------------------------------

/// Errors related to persisting the mine/enemy history.
///
/// Loading never produces these: an absent or corrupt history file is
/// treated as an empty history.
#[derive(Debug)]
pub enum HistoryError {
    /// The history directory or file could not be written.
    Io { path: PathBuf, source: io::Error },

    /// The history could not be serialised.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot write history '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "cannot serialise history '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<HistoryError> for DexError {
    fn from(e: HistoryError) -> Self {
        Self::History(e)
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to listing filters.
#[derive(Debug)]
pub enum FilterError {
    /// User-provided regex is invalid.
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegex { pattern, source } => {
                write!(f, "Invalid filter regex '{pattern}': {source}")
            }
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
        }
    }
}

impl From<FilterError> for DexError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Export would exceed maximum entry count.
    TooManyEntries { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::TooManyEntries { count, max } => write!(
                f,
                "Export of {count} entries exceeds maximum of {max}. \
                 Apply a filter to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for DexError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is not one of the accepted values.
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::InvalidValue {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is not valid. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for DexTracker results.
pub type Result<T> = std::result::Result<T, DexError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_parse_error_keeps_io_source() {
        let err: DexError = ParseError::Io {
            file: PathBuf::from("missing.log"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        }
        .into();

        let msg = err.to_string();
        assert!(msg.contains("missing.log"), "got: {msg}");
        let parse = err.source().expect("top-level error must expose its cause");
        assert!(parse.source().is_some(), "io::Error must stay in the chain");
    }

    #[test]
    fn test_too_many_entries_message() {
        let err = ExportError::TooManyEntries { count: 10, max: 5 };
        assert!(err.to_string().contains("10 entries exceeds maximum of 5"));
        assert!(err.source().is_none());
    }
}
