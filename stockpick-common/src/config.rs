//! Configuration management for the stockpick engine.
//!
//! The engine configuration lives at `~/.stockpick/config.json` unless a path
//! is given explicitly.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (STOCKPICK_* prefix)
//! 2. Explicit config file values
//! 3. Default values

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::validation::{Validate, ValidationError, ValidationResult};

/// Environment variable naming an alternate config file.
pub const CONFIG_PATH_ENV: &str = "STOCKPICK_CONFIG";

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".stockpick"),
        |dirs| dirs.home_dir().join(".stockpick"),
    )
}

/// Get the configuration file path.
///
/// `STOCKPICK_CONFIG` overrides the default location; `~` and `$VARS` in it
/// are expanded.
pub fn config_path() -> PathBuf {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(raw) if !raw.trim().is_empty() => expand_path(&raw),
        _ => config_dir().join("config.json"),
    }
}

/// Expand `~` and environment variables in a user supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}

/// Load a JSON config file, falling back to defaults when it does not exist.
pub fn load_json_or_default<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        return Ok(T::default());
    }
    load_json(path)
}

/// Load a JSON config file from a specific path.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets to set to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

impl ObservabilityConfig {
    /// Apply `STOCKPICK_LOG_LEVEL` / `STOCKPICK_LOG_FORMAT` overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("STOCKPICK_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.log_level = level;
            }
        }
        if let Ok(format) = std::env::var("STOCKPICK_LOG_FORMAT") {
            if !format.trim().is_empty() {
                self.log_format = format;
            }
        }
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("'{}' is not one of {:?}", self.log_level, LEVELS),
            });
        }
        if self.log_format != "json" && self.log_format != "pretty" {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("'{}' must be 'json' or 'pretty'", self.log_format),
            });
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
