//! Load: config loading from file and environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use super::model::{AnalyzerConfig, ClassifyConfig, QueryConfig, ScoreWeights};
use crate::error::ConfigError;

pub const CONFIG_FILE_ENV: &str = "FLOWSCAN_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "flowscan.toml";

const WEIGHT_TOLERANCE: f64 = 1e-9;

impl AnalyzerConfig {
    /// Load configuration from the file named by `FLOWSCAN_CONFIG_FILE`
    /// (default `flowscan.toml`), then apply environment overrides.
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Like [`AnalyzerConfig::load`], but an explicit path must exist.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                Self::from_file(path)?
            }
            None => {
                let path = std::env::var(CONFIG_FILE_ENV)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
                if path.exists() {
                    tracing::info!("Loading configuration from: {}", path.display());
                    Self::from_file(&path)?
                } else {
                    tracing::debug!("Config file not found at {}, using defaults", path.display());
                    Self::default()
                }
            }
        };

        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Environment variables override file config for critical settings.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("FLOWSCAN_PARSE_MODE") {
            self.parse.mode = mode.parse()?;
        }
        if let Some(rule) = lookup("FLOWSCAN_IN_EFFECT_RULE") {
            self.parse.in_effect_rule = rule.parse()?;
        }
        if let Some(sort) = lookup("FLOWSCAN_SORT") {
            self.query.sort = sort.parse()?;
        }
        if let Some(limit) = lookup("FLOWSCAN_LIMIT") {
            self.query.limit = match limit.trim() {
                "all" | "none" => None,
                n => Some(n.parse().map_err(|_| ConfigError::InvalidEnv {
                    var: "FLOWSCAN_LIMIT",
                    value: limit.clone(),
                })?),
            };
        }
        Ok(())
    }

    /// Reject values that would make a run meaningless. Called before any
    /// input is read.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.query.validate()?;
        self.classify.validate()?;
        self.score.validate()
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flags_only && self.offloaded_only {
            return Err(ConfigError::ConflictingModes);
        }
        check_threshold("min_uptime_hours", self.min_uptime_hours)?;
        check_threshold("min_mb", self.min_mb)?;
        check_threshold("min_rate_mbps", self.min_rate_mbps)
    }
}

impl ClassifyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("high_rate_mbps", self.high_rate_mbps)?;
        check_threshold("traditional_min_hours", self.traditional_min_hours)?;
        check_threshold("traditional_min_mb", self.traditional_min_mb)
    }
}

impl ScoreWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [("uptime", self.uptime), ("bytes", self.bytes), ("rate", self.rate)];
        if let Some((name, w)) = weights.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::InvalidWeights(format!("{} weight {} is negative or not finite", name, w)));
        }

        let sum: f64 = weights.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::InvalidWeights(format!("weights sum to {}, expected 1", sum)));
        }
        Ok(())
    }
}
