// Domain-driven module structure for flowscan.

// Core pipeline
pub mod parser;
pub mod flags;
pub mod record;
pub mod metrics;
pub mod filter;

// Supporting modules
pub mod conf;
pub mod error;
pub mod export;
pub mod summary;
pub mod runtime;

pub use conf::AnalyzerConfig;
pub use error::{AnalyzeError, ConfigError};
pub use record::{ConnectionRecord, Endpoint, Protocol};
