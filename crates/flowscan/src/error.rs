use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration rejected before any input is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown sort key '{0}' (expected uptime, bytes, rate or both)")]
    UnknownSortKey(String),

    #[error("Unknown parse mode '{0}' (expected template, scan or auto)")]
    UnknownParseMode(String),

    #[error("Unknown in-effect rule '{0}' (expected marker or presence)")]
    UnknownInEffectRule(String),

    #[error("flags-only and offloaded-only cannot be combined")]
    ConflictingModes,

    #[error("Invalid threshold {name} = {value}: must be a finite, non-negative number")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Invalid score weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid value '{value}' for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Run-level failures. Per-block failures are counted, never raised.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No block produced a record. Distinct from a query with zero matches.
    #[error("No connection records could be extracted ({blocks_seen} blocks seen, {failed} failed)")]
    EmptyInput { blocks_seen: u64, failed: u64 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to serialize export: {0}")]
    Export(#[from] serde_json::Error),
}

impl AnalyzeError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AnalyzeError::Io { path: path.into(), source }
    }
}
