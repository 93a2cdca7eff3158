// DexTracker - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for DexTracker data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/dextracker/ or %APPDATA%\DexTracker\config\)
    pub config_dir: PathBuf,

    /// Data directory holding the history file.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default history file location.
    pub fn history_file(&self) -> PathBuf {
        self.data_dir.join(constants::HISTORY_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[data]` section.
    pub data: DataSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[data]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DataSection {
    /// Stat log loaded at startup.
    pub log_file: Option<String>,
    /// History JSON file.
    pub history_file: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Stat log loaded at startup (may not exist).
    pub log_file: PathBuf,
    /// History JSON file.
    pub history_file: PathBuf,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Defaults: `pokemon_data.log` in the working directory, history in the
    /// platform data directory.
    pub fn defaults(paths: &PlatformPaths) -> Self {
        Self {
            log_file: PathBuf::from(constants::DEFAULT_LOG_FILE),
            history_file: paths.history_file(),
            log_level: None,
        }
    }
}

/// Path of config.toml inside the config directory.
pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(constants::CONFIG_FILE_NAME)
}

/// Read and parse config.toml. `Ok(None)` when the file does not exist.
pub fn read_raw_config(path: &Path) -> Result<Option<RawConfig>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    toml::from_str(&content)
        .map(Some)
        .map_err(|e| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Load and validate config.toml from `paths.config_dir`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning;
/// the application still starts but the user is informed.
pub fn load_config(paths: &PlatformPaths) -> (AppConfig, Vec<String>) {
    let path = config_path(&paths.config_dir);
    let mut config = AppConfig::defaults(paths);
    let mut warnings: Vec<String> = Vec::new();

    let raw = match read_raw_config(&path) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(path = %path.display(), "No config.toml found; using defaults");
            return (config, warnings);
        }
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (config, warnings);
        }
    };

    tracing::info!(path = %path.display(), "Loaded config.toml");

    // -- Data: log_file --
    if let Some(ref file) = raw.data.log_file {
        if !file.trim().is_empty() {
            config.log_file = PathBuf::from(file.trim());
        }
    }

    // -- Data: history_file --
    if let Some(ref file) = raw.data.history_file {
        if file.trim().is_empty() {
            warnings.push(format!(
                "[data] history_file is empty. Using default ({}).",
                config.history_file.display()
            ));
        } else {
            config.history_file = PathBuf::from(file.trim());
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        match validate_log_level(level) {
            Ok(level) => config.log_level = Some(level),
            Err(e) => warnings.push(format!("{e}. Using default (info).")),
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

fn validate_log_level(level: &str) -> Result<String, ConfigError> {
    let valid = ["error", "warn", "info", "debug", "trace"];
    let lower = level.trim().to_lowercase();
    if valid.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(ConfigError::InvalidValue {
            field: "[logging] level".to_string(),
            value: level.to_string(),
            expected: valid.join(", "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths_in(dir: &TempDir) -> PlatformPaths {
        PlatformPaths {
            config_dir: dir.path().join("config"),
            data_dir: dir.path().join("data"),
        }
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        let (config, warnings) = load_config(&paths);
        assert!(warnings.is_empty());
        assert_eq!(config.log_file, PathBuf::from(constants::DEFAULT_LOG_FILE));
        assert_eq!(config.history_file, paths.data_dir.join(constants::HISTORY_FILE_NAME));
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_config_overrides_paths_and_level() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        std::fs::create_dir_all(&paths.config_dir).unwrap();
        std::fs::write(
            config_path(&paths.config_dir),
            "[data]\nlog_file = \"runs/latest.log\"\nhistory_file = \"/tmp/h.json\"\n\n[logging]\nlevel = \"DEBUG\"\n",
        )
        .unwrap();

        let (config, warnings) = load_config(&paths);
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.log_file, PathBuf::from("runs/latest.log"));
        assert_eq!(config.history_file, PathBuf::from("/tmp/h.json"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_bad_level_warns_and_keeps_default() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        std::fs::create_dir_all(&paths.config_dir).unwrap();
        std::fs::write(config_path(&paths.config_dir), "[logging]\nlevel = \"loud\"\n").unwrap();

        let (config, warnings) = load_config(&paths);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("loud"));
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_unparseable_config_falls_back() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        std::fs::create_dir_all(&paths.config_dir).unwrap();
        std::fs::write(config_path(&paths.config_dir), "[data\nlog_file = ").unwrap();

        let (config, warnings) = load_config(&paths);
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.log_file, PathBuf::from(constants::DEFAULT_LOG_FILE));
    }
}
