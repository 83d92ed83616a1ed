pub use super::model::{BlockFields, ParseError, ParseStrategy, RawBlock};

/// Locates raw field text inside a block.
///
/// Implementations only find strings; validation and normalization happen
/// once, in [`super::build::build_record`].
pub trait FieldLocator: Send + Sync {
    fn locate(&self, block: &RawBlock<'_>) -> Result<BlockFields, ParseError>;
    fn strategy(&self) -> ParseStrategy;
}
