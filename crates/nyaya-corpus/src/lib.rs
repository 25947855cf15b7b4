//! Document loading, chunking, and ingestion for the legal corpus.

pub mod error;
pub mod extract;
pub mod loader;
pub mod pipeline;
pub mod splitter;
pub mod types;

pub use error::CorpusError;
pub use extract::extract_upload;
pub use loader::{CsvLoader, DocxLoader, TextLoader};
pub use pipeline::IngestionPipeline;
pub use splitter::{SplitterConfig, TextSplitter};
pub use types::{Chunk, Document, DocumentMetadata};

#[cfg(feature = "pdf")]
pub use loader::PdfLoader;

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

pub trait DocumentLoader: Send + Sync {
    fn load(
        &self,
        path: &std::path::Path,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<Document>, CorpusError>> + Send + '_>,
    >;

    fn supported_extensions(&self) -> &[&str];
}
