/// Record extraction for `show conn detail` dumps
///
/// # Architecture
///
/// - `block.rs`: splits raw text into per-connection blocks
/// - `traits.rs`: the `FieldLocator` seam
/// - `formats/`: strict template and permissive scan locators
/// - `build.rs`: shared validation and normalization into `ConnectionRecord`
/// - `extractor.rs`: runs locators per `ParseMode`, counts failures
/// - `units.rs`: duration and byte-count normalization
/// - `stats.rs`: per-run extraction counters

pub mod block;
pub mod build;
pub mod extractor;
pub mod formats;
pub mod model;
pub mod stats;
pub mod traits;
pub mod units;

// Re-export commonly used types
pub use block::BlockSplitter;
pub use build::build_record;
pub use extractor::{Extraction, RecordExtractor, Records};
pub use model::{BlockFields, FailureKind, FormatError, ParseError, ParseMode, ParseStrategy, RawBlock};
pub use stats::ParseStats;
pub use traits::FieldLocator;
