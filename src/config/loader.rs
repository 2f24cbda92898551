//! Configuration file loading with precedence handling.

use crate::filter::SeverityMask;
use crate::ingest::source::DEFAULT_CHUNK_SIZE;
use crate::model::{Classifier, ERROR_MARKER, WARNING_MARKER};
use crate::sections::DEFAULT_CONTEXT_LENGTH;
use crate::view_state::height::{
    HeightParams, DEFAULT_CHARS_PER_HEIGHT_UNIT, DEFAULT_HEIGHT_UNIT, DEFAULT_MIN_ROW_HEIGHT,
    MAX_ROW_HEIGHT,
};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "LOGSIFT_CONFIG";
/// Environment override for `context_length`.
pub const CONTEXT_LENGTH_ENV: &str = "LOGSIFT_CONTEXT_LENGTH";
/// Environment override for `chunk_size`.
pub const CHUNK_SIZE_ENV: &str = "LOGSIFT_CHUNK_SIZE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting has a value the viewer cannot work with.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Name of the offending setting.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/logsift/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Lines following a flagged line in its incident section.
    #[serde(default)]
    pub context_length: Option<usize>,

    /// Minimum row height in pixels.
    #[serde(default)]
    pub min_row_height: Option<usize>,

    /// Pixels per height unit.
    #[serde(default)]
    pub height_unit: Option<usize>,

    /// Display columns per height unit.
    #[serde(default)]
    pub chars_per_height_unit: Option<usize>,

    /// Bytes per ingestion read.
    #[serde(default)]
    pub chunk_size: Option<usize>,

    /// Literal marking a line as Error.
    #[serde(default)]
    pub error_marker: Option<String>,

    /// Literal marking a line as Warning.
    #[serde(default)]
    pub warning_marker: Option<String>,

    /// Severity filter applied when none is given on the command line.
    #[serde(default)]
    pub default_filter: Option<SeverityMask>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Context lines after each flagged line.
    pub context_length: usize,
    /// Minimum row height in pixels.
    pub min_row_height: usize,
    /// Pixels per started block of `chars_per_height_unit` columns.
    pub height_unit: usize,
    /// Display columns per height unit.
    pub chars_per_height_unit: usize,
    /// Bytes requested per read.
    pub chunk_size: usize,
    /// Literal that marks an Error line.
    pub error_marker: String,
    /// Literal that marks a Warning line.
    pub warning_marker: String,
    /// Severity mask used when `--filter` is absent.
    pub default_filter: SeverityMask,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            context_length: DEFAULT_CONTEXT_LENGTH,
            min_row_height: DEFAULT_MIN_ROW_HEIGHT,
            height_unit: DEFAULT_HEIGHT_UNIT,
            chars_per_height_unit: DEFAULT_CHARS_PER_HEIGHT_UNIT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            error_marker: ERROR_MARKER.to_string(),
            warning_marker: WARNING_MARKER.to_string(),
            default_filter: SeverityMask::All,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Row height function parameters.
    pub fn height_params(&self) -> HeightParams {
        HeightParams::new(
            self.min_row_height,
            self.height_unit,
            self.chars_per_height_unit,
        )
    }

    /// Classifier using the configured markers.
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.error_marker.clone(), self.warning_marker.clone())
    }

    /// Reject settings that would make layout or ingestion degenerate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("height_unit", self.height_unit),
            ("chars_per_height_unit", self.chars_per_height_unit),
            ("chunk_size", self.chunk_size),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        let pixels = [
            ("min_row_height", self.min_row_height),
            ("height_unit", self.height_unit),
        ];
        for (field, value) in pixels {
            if value > MAX_ROW_HEIGHT {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be at most {MAX_ROW_HEIGHT} pixels"),
                });
            }
        }

        let markers = [
            ("error_marker", &self.error_marker),
            ("warning_marker", &self.warning_marker),
        ];
        for (field, marker) in markers {
            if marker.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/logsift/logsift.log` on Linux, or the
/// platform's state directory elsewhere. Falls back to the current
/// directory when no state directory exists.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("logsift").join("logsift.log")
    } else {
        PathBuf::from("logsift.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/logsift/config.toml` on Linux, the platform
/// equivalent elsewhere, `None` if no config directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("logsift").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `LOGSIFT_CONFIG` environment variable
/// 3. Default path `~/.config/logsift/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    match std::env::var(CONFIG_ENV) {
        Ok(env_path) => return load_config_file(PathBuf::from(env_path)),
        Err(std::env::VarError::NotUnicode(raw)) => {
            return Err(ConfigError::InvalidPath(raw.to_string_lossy().into_owned()))
        }
        Err(std::env::VarError::NotPresent) => {}
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        context_length: config.context_length.unwrap_or(defaults.context_length),
        min_row_height: config.min_row_height.unwrap_or(defaults.min_row_height),
        height_unit: config.height_unit.unwrap_or(defaults.height_unit),
        chars_per_height_unit: config
            .chars_per_height_unit
            .unwrap_or(defaults.chars_per_height_unit),
        chunk_size: config.chunk_size.unwrap_or(defaults.chunk_size),
        error_marker: config.error_marker.unwrap_or(defaults.error_marker),
        warning_marker: config.warning_marker.unwrap_or(defaults.warning_marker),
        default_filter: config.default_filter.unwrap_or(defaults.default_filter),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `LOGSIFT_CONTEXT_LENGTH`: Override context length
/// - `LOGSIFT_CHUNK_SIZE`: Override chunk size
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if a variable is set but is not a
/// non-negative integer.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Some(value) = env_usize(CONTEXT_LENGTH_ENV, "context_length")? {
        config.context_length = value;
    }
    if let Some(value) = env_usize(CHUNK_SIZE_ENV, "chunk_size")? {
        config.chunk_size = value;
    }
    Ok(config)
}

fn env_usize(var: &str, field: &'static str) -> Result<Option<usize>, ConfigError> {
    let Ok(raw) = std::env::var(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e| ConfigError::InvalidValue {
            field,
            reason: format!("{var}={raw:?}: {e}"),
        })
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    context_override: Option<usize>,
    filter_override: Option<SeverityMask>,
) -> ResolvedConfig {
    if let Some(context_length) = context_override {
        config.context_length = context_length;
    }

    if let Some(filter) = filter_override {
        config.default_filter = filter;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
