//! Conf module: configuration model and loading.

pub mod load;
pub mod model;

pub use load::{CONFIG_FILE_ENV, DEFAULT_CONFIG_FILE};
pub use model::{AnalyzerConfig, ClassifyConfig, ParseConfig, QueryConfig, ScoreWeights};
