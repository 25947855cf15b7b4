use std::sync::Arc;

use nyaya_llm::LlmProvider;

use crate::error::IndexError;
use crate::flat::{FlatIndex, Hit};

/// Number of chunks handed to the prompt builder.
pub const DEFAULT_TOP_K: usize = 4;

/// Query-side search: embeds the query and ranks it against a read-only
/// index snapshot shared across requests.
pub struct Retriever<P: LlmProvider> {
    index: Arc<FlatIndex>,
    provider: Arc<P>,
    top_k: usize,
}

impl<P: LlmProvider> Retriever<P> {
    pub fn new(index: Arc<FlatIndex>, provider: Arc<P>) -> Self {
        Self {
            index,
            provider,
            top_k: DEFAULT_TOP_K,
        }
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[must_use]
    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    /// Return the best-matching chunks for `query`, best first.
    ///
    /// An empty index short-circuits to an empty result without calling
    /// the embedding backend.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding the query fails.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<Hit>, IndexError> {
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let vector = self.provider.embed(query).await?;
        let hits = self.index.search(&vector, self.top_k);
        tracing::debug!(hits = hits.len(), top_k = self.top_k, "retrieved chunks");
        Ok(hits)
    }
}

impl<P: LlmProvider> Clone for Retriever<P> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            provider: Arc::clone(&self.provider),
            top_k: self.top_k,
        }
    }
}

impl<P: LlmProvider> std::fmt::Debug for Retriever<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("entries", &self.index.len())
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat::IndexEntry;
    use nyaya_llm::mock::MockProvider;

    async fn index_with(provider: &MockProvider, texts: &[&str]) -> FlatIndex {
        let mut index = FlatIndex::new();
        for (i, text) in texts.iter().enumerate() {
            let vector = provider.embed(text).await.unwrap();
            index.insert(IndexEntry {
                vector,
                content: (*text).to_string(),
                source: "test".to_string(),
                content_type: "text/plain".to_string(),
                chunk_index: i,
            });
        }
        index
    }

    #[tokio::test]
    async fn empty_index_skips_embedding() {
        // A provider that fails on embed proves the short-circuit path.
        let provider = Arc::new(MockProvider::failing_embed());
        let retriever = Retriever::new(Arc::new(FlatIndex::new()), provider);

        let hits = retriever.retrieve("any query").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn retrieve_returns_at_most_top_k() {
        let provider = MockProvider::new();
        let index = index_with(
            &provider,
            &[
                "Section 378 defines theft.",
                "Section 302 covers murder.",
                "Section 420 covers cheating.",
                "Section 376 covers assault.",
                "Section 124A covers sedition.",
                "Section 499 covers defamation.",
            ],
        )
        .await;

        let retriever = Retriever::new(Arc::new(index), Arc::new(provider));
        let hits = retriever.retrieve("What is theft?").await.unwrap();
        assert_eq!(hits.len(), DEFAULT_TOP_K);
    }

    #[tokio::test]
    async fn retrieve_ranks_matching_chunk_first() {
        let provider = MockProvider::new();
        let index = index_with(
            &provider,
            &[
                "Whoever commits murder shall be punished under Section 302.",
                "Theft is punishable under Section 378.",
                "Defamation is addressed by Section 499.",
            ],
        )
        .await;

        let retriever = Retriever::new(Arc::new(index), Arc::new(provider));
        let hits = retriever
            .retrieve("Theft is punishable under Section 378.")
            .await
            .unwrap();
        assert_eq!(hits[0].content, "Theft is punishable under Section 378.");
    }

    #[tokio::test]
    async fn repeated_queries_return_identical_ranking() {
        let provider = MockProvider::new();
        let index = index_with(&provider, &["alpha fact", "beta fact", "gamma fact"]).await;
        let retriever = Retriever::new(Arc::new(index), Arc::new(provider));

        let ranking = |hits: Vec<Hit>| hits.into_iter().map(|h| h.content).collect::<Vec<_>>();
        let first = ranking(retriever.retrieve("fact").await.unwrap());
        let second = ranking(retriever.retrieve("fact").await.unwrap());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn with_top_k_overrides_default() {
        let provider = MockProvider::new();
        let index = index_with(&provider, &["one fact", "two facts", "three facts"]).await;

        let retriever = Retriever::new(Arc::new(index), Arc::new(provider)).with_top_k(2);
        let hits = retriever.retrieve("facts").await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn embed_failure_propagates() {
        let provider = MockProvider::failing_embed();
        let mut index = FlatIndex::new();
        index.insert(IndexEntry {
            vector: vec![1.0; 16],
            content: "chunk".to_string(),
            source: "test".to_string(),
            content_type: "text/plain".to_string(),
            chunk_index: 0,
        });

        let retriever = Retriever::new(Arc::new(index), Arc::new(provider));
        let result = retriever.retrieve("query").await;
        assert!(matches!(result, Err(IndexError::Embedding(_))));
    }
}
