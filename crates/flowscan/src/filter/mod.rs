//! Classification & query engine: predicates, stable sort, limit.

pub mod engine;
pub mod query;
pub mod sort;

pub use engine::{FilterEngine, FilterSnapshot, Predicate};
pub use query::{Query, QueryMode, QueryResult};
pub use sort::{sort_records, SortKey};
