use std::path::Path;

use nyaya_index::{FlatIndex, IndexEntry};
use nyaya_llm::provider::EmbedFuture;

use crate::splitter::TextSplitter;
use crate::{CorpusError, Document, DocumentLoader};

pub type EmbedFn = Box<dyn Fn(&str) -> EmbedFuture + Send + Sync>;

/// Builds the retrieval index: split documents, embed every chunk, and
/// accumulate the entries in insertion order.
///
/// Any embedding failure aborts the whole run; a snapshot is only
/// written from a fully built index.
pub struct IngestionPipeline {
    splitter: TextSplitter,
    index: FlatIndex,
    embed_fn: EmbedFn,
}

impl IngestionPipeline {
    pub fn new(splitter: TextSplitter, embed_fn: EmbedFn) -> Self {
        Self {
            splitter,
            index: FlatIndex::new(),
            embed_fn,
        }
    }

    #[must_use]
    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    #[must_use]
    pub fn into_index(self) -> FlatIndex {
        self.index
    }

    /// Ingest one document: split, embed, index. Returns the chunk count.
    ///
    /// Chunks are embedded before any of them is indexed, so a failed
    /// document leaves the index as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding fails.
    pub async fn ingest(&mut self, document: Document) -> Result<usize, CorpusError> {
        let chunks = self.splitter.split(&document);
        if chunks.is_empty() {
            return Ok(0);
        }

        let mut entries = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let vector = (self.embed_fn)(&chunk.content).await?;
            entries.push(IndexEntry {
                vector,
                content: chunk.content,
                source: chunk.metadata.source.clone(),
                content_type: chunk.metadata.content_type.clone(),
                chunk_index: chunk.chunk_index,
            });
        }

        let count = entries.len();
        for entry in entries {
            self.index.insert(entry);
        }

        Ok(count)
    }

    /// # Errors
    ///
    /// Returns an error if loading or embedding fails.
    pub async fn load_and_ingest(
        &mut self,
        loader: &(dyn DocumentLoader + '_),
        path: &Path,
    ) -> Result<usize, CorpusError> {
        let documents = loader.load(path).await?;
        let mut total = 0;
        for doc in documents {
            total += self.ingest(doc).await?;
        }
        Ok(total)
    }

    /// Ingest every supported file directly under `dir`, in file name
    /// order. Files with no matching loader are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or any file
    /// fails to load or embed.
    pub async fn ingest_dir(
        &mut self,
        dir: &Path,
        loaders: &[&dyn DocumentLoader],
    ) -> Result<usize, CorpusError> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        // File name order keeps the index (and its tie-breaking) reproducible.
        files.sort();

        let mut total = 0;
        for path in files {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase)
                .unwrap_or_default();

            let Some(loader) = loaders
                .iter()
                .find(|l| l.supported_extensions().contains(&ext.as_str()))
            else {
                tracing::debug!(path = %path.display(), "no loader for file, skipping");
                continue;
            };

            let count = self.load_and_ingest(*loader, &path).await?;
            tracing::info!(path = %path.display(), chunks = count, "ingested file");
            total += count;
        }

        Ok(total)
    }
}
