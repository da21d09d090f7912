//! Engine configuration.
//!
//! Aggregates everything a run needs into one JSON document:
//!
//! ```json
//! {
//!   "observability": { "log_level": "info", "log_format": "pretty" },
//!   "settings": { "portfolio": { "stop_loss": 0.08, "take_profit": 0.2 } },
//!   "screening": { "primary_threshold": 0.8, "relaxed_threshold": 0.6, "top_n": 10 },
//!   "quality_gate": { "threshold": 5 }
//! }
//! ```
//!
//! # Environment Variable Mapping
//! - `STOCKPICK_CONFIG` → config file path
//! - `STOCKPICK_LOG_LEVEL` → observability.log_level
//! - `STOCKPICK_LOG_FORMAT` → observability.log_format
//! - `STOCKPICK_STOP_LOSS` → settings.portfolio.stop_loss
//! - `STOCKPICK_TAKE_PROFIT` → settings.portfolio.take_profit

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use stockpick_common::config::{config_path, load_json, load_json_or_default, ObservabilityConfig};
use stockpick_common::validation::{collect_errors, Validate, ValidationResult};

use crate::screener::{QualityGateConfig, ScreeningParams, StrategySettings};

/// Numeric overrides read from the environment.
const NUMERIC_OVERRIDES: [&str; 2] = ["STOCKPICK_STOP_LOSS", "STOCKPICK_TAKE_PROFIT"];

/// Full engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub settings: StrategySettings,

    #[serde(default)]
    pub screening: ScreeningParams,

    #[serde(default)]
    pub quality_gate: QualityGateConfig,
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from this file
    File(PathBuf),
    /// No file at this path, defaults used
    Defaults(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults(path) => write!(f, "defaults (no file at {})", path.display()),
        }
    }
}

impl EngineConfig {
    /// Load from the default location (or `STOCKPICK_CONFIG`) with env overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from a specific path with env overrides. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config: Self = load_json_or_default(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from a path the user named explicitly. A missing file is an error.
    pub fn load_required(path: &Path) -> Result<Self> {
        let mut config: Self = load_json(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from `explicit` if given, else from the default location, and
    /// report which source was used.
    pub fn load_with_source(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        match explicit {
            Some(path) => Ok((
                Self::load_required(path)?,
                ConfigSource::File(path.to_path_buf()),
            )),
            None => {
                let path = config_path();
                let source = if path.exists() {
                    ConfigSource::File(path.clone())
                } else {
                    ConfigSource::Defaults(path.clone())
                };
                Ok((Self::load_from(&path)?, source))
            }
        }
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Non-numeric values are skipped; see [`EngineConfig::rejected_env_overrides`].
    pub fn apply_env_overrides(&mut self) {
        self.observability.apply_env_overrides();

        if let Some(stop) = env_f64("STOCKPICK_STOP_LOSS") {
            self.settings.portfolio.stop_loss = stop;
        }
        if let Some(target) = env_f64("STOCKPICK_TAKE_PROFIT") {
            self.settings.portfolio.take_profit = target;
        }
    }

    /// Numeric overrides that are set but do not parse, as `(key, value)`.
    pub fn rejected_env_overrides() -> Vec<(&'static str, String)> {
        rejected_overrides(|key| std::env::var(key).ok())
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> ValidationResult<()> {
        collect_errors(vec![
            self.observability.validate(),
            self.settings.validate(),
            self.screening.validate(),
            self.quality_gate.validate(),
        ])
    }
}

fn env_f64(key: &str) -> Option<f64> {
    parse_f64(&std::env::var(key).ok()?)
}

fn parse_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

fn rejected_overrides<F>(lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    NUMERIC_OVERRIDES
        .iter()
        .filter_map(|&key| {
            let raw = lookup(key)?;
            parse_f64(&raw).is_none().then_some((key, raw))
        })
        .collect()
}
