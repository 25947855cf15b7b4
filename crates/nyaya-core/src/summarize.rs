//! Text summarization over an ephemeral retrieval pass.
//!
//! Submitted text is chunked and embedded into a throwaway index, the
//! chunk most representative of the whole document is retrieved, and the
//! generator is asked to summarize that passage. The retrieval pass is
//! best-effort: when it yields nothing the head of the raw text is
//! summarized instead.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use nyaya_corpus::{Document, DocumentMetadata, SplitterConfig, TextSplitter};
use nyaya_index::{FlatIndex, IndexEntry};
use nyaya_llm::{LlmError, LlmProvider};

use crate::error::QueryError;

/// Retrieval query run against the ephemeral index.
pub const SUMMARIZE_QUERY: &str =
    "What are the primary topics, arguments, and conclusions in this document?";

const SUMMARIZE_PROMPT: &str = "You are an AI assistant skilled in document summarization. Provide a concise summary:
- Highlight key points.
- Avoid unnecessary repetition.
- Make it easy to understand.

Context: {context}";

// Chunking for submitted text, independent of the corpus ingestion settings.
const CHUNK_MAX_LENGTH: usize = 1000;
const CHUNK_OVERLAP: usize = 200;

/// Characters of raw text used as context when no passage can be retrieved.
const FALLBACK_CONTEXT_CHARS: usize = 1000;

pub struct Summarizer<P: LlmProvider> {
    generator: Arc<P>,
    embedder: Arc<P>,
    splitter: TextSplitter,
}

impl<P: LlmProvider> Summarizer<P> {
    /// `generator` produces the summary; `embedder` powers the ephemeral
    /// retrieval pass and may be a different provider instance.
    #[must_use]
    pub fn new(generator: Arc<P>, embedder: Arc<P>) -> Self {
        Self {
            generator,
            embedder,
            splitter: TextSplitter::new(SplitterConfig {
                max_length: CHUNK_MAX_LENGTH,
                overlap: CHUNK_OVERLAP,
            }),
        }
    }

    /// Summarize `text`. The text is trimmed before validation.
    ///
    /// # Errors
    /// [`QueryError::EmptyText`] for blank input, [`QueryError::Generation`]
    /// when the provider fails.
    pub async fn summarize(&self, text: &str) -> Result<String, QueryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QueryError::EmptyText);
        }

        let context = match self.best_passage(text).await {
            Ok(Some(passage)) => passage,
            Ok(None) => head(text),
            Err(e) => {
                tracing::warn!(error = %e, "ephemeral retrieval failed, summarizing raw text head");
                head(text)
            }
        };

        let prompt = SUMMARIZE_PROMPT.replace("{context}", &context);
        let summary = self.generator.generate(&prompt).await?;
        tracing::debug!(chars = text.chars().count(), "text summarized");
        Ok(summary)
    }

    /// Chunk and embed the text, then retrieve the single best chunk for
    /// the fixed summarization query.
    async fn best_passage(&self, text: &str) -> Result<Option<String>, LlmError> {
        let document = Document {
            content: text.to_owned(),
            metadata: DocumentMetadata {
                source: "submitted-text".into(),
                content_type: "text/plain".into(),
                extra: HashMap::new(),
            },
        };
        let chunks = self.splitter.split(&document);
        if chunks.is_empty() {
            return Ok(None);
        }

        let mut index = FlatIndex::new();
        for chunk in chunks {
            let vector = self.embedder.embed(&chunk.content).await?;
            index.insert(IndexEntry {
                vector,
                source: chunk.metadata.source,
                content_type: chunk.metadata.content_type,
                content: chunk.content,
                chunk_index: chunk.chunk_index,
            });
        }
        let query_vector = self.embedder.embed(SUMMARIZE_QUERY).await?;
        let hits = index.search(&query_vector, 1);
        Ok(hits.into_iter().next().map(|hit| hit.content))
    }
}

impl<P: LlmProvider> fmt::Debug for Summarizer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Summarizer").finish_non_exhaustive()
    }
}

fn head(text: &str) -> String {
    text.chars().take(FALLBACK_CONTEXT_CHARS).collect()
}
