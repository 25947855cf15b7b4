//! Flat vector index with snapshot persistence and top-k retrieval.

pub mod error;
pub mod flat;
pub mod retriever;

pub use error::IndexError;
pub use flat::{FlatIndex, Hit, IndexEntry};
pub use retriever::{DEFAULT_TOP_K, Retriever};
