//! Errors surfaced by the query pipeline and summarizer.

use nyaya_index::IndexError;
use nyaya_llm::LlmError;

/// Failure modes of a query or summarization request. Validation variants
/// carry the exact messages clients see; their wording is part of the API.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Query cannot be empty.")]
    EmptyQuery,

    #[error("Text input cannot be empty.")]
    EmptyText,

    #[error("Please provide a document file.")]
    MissingFile,

    #[error("Unsupported file type.")]
    UnsupportedFileType,

    #[error("Error reading file: {0}")]
    Extraction(String),

    #[error("retrieval failed: {0}")]
    Retrieval(#[from] IndexError),

    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),
}

impl QueryError {
    /// Whether the error was caused by the request rather than the service.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyQuery
                | Self::EmptyText
                | Self::MissingFile
                | Self::UnsupportedFileType
                | Self::Extraction(_)
        )
    }
}
