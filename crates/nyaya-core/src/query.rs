//! Retrieval-augmented query answering.

use std::fmt;
use std::sync::Arc;

use nyaya_index::Retriever;
use nyaya_llm::LlmProvider;

use crate::error::QueryError;
use crate::language::verify_language;
use crate::prompt::{self, BASELINE_LANGUAGE};

/// An answered legal query: the trimmed query text and the final response,
/// apology notice included when the language guard added one.
#[derive(Debug, Clone)]
pub struct Answer {
    pub query: String,
    pub response: String,
}

/// Drives a query through retrieval, prompt construction, generation, and
/// the language guard.
pub struct QueryPipeline<P: LlmProvider> {
    retriever: Retriever<P>,
    provider: Arc<P>,
}

impl<P: LlmProvider> QueryPipeline<P> {
    #[must_use]
    pub fn new(retriever: Retriever<P>, provider: Arc<P>) -> Self {
        Self {
            retriever,
            provider,
        }
    }

    /// Answer `query` in the requested language.
    ///
    /// The query is trimmed before validation. Absent or unknown language
    /// codes fall back to the baseline language.
    ///
    /// # Errors
    /// [`QueryError::EmptyQuery`] for blank input, [`QueryError::Retrieval`]
    /// when query embedding or the index fails, [`QueryError::Generation`]
    /// when the provider fails.
    pub async fn answer(
        &self,
        query: &str,
        language: Option<&str>,
    ) -> Result<Answer, QueryError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        let language = language
            .filter(|code| prompt::is_supported(code))
            .unwrap_or(BASELINE_LANGUAGE);

        let hits = self.retriever.retrieve(query).await?;
        let context = hits
            .iter()
            .map(|hit| hit.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let prompt = prompt::build_prompt(language, query, &context);

        let generated = self.provider.generate(&prompt).await?;
        let response = verify_language(generated, language);

        tracing::info!(language, hits = hits.len(), "query answered");
        Ok(Answer {
            query: query.to_owned(),
            response,
        })
    }
}

impl<P: LlmProvider> fmt::Debug for QueryPipeline<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryPipeline")
            .field("retriever", &self.retriever)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use nyaya_index::{FlatIndex, IndexEntry};
    use nyaya_llm::mock::MockProvider;

    use super::*;
    use crate::language::APOLOGY_NOTICE;

    async fn indexed(provider: &MockProvider, texts: &[&str]) -> FlatIndex {
        let mut index = FlatIndex::new();
        for (i, text) in texts.iter().enumerate() {
            let vector = provider.embed(text).await.unwrap();
            index.insert(IndexEntry {
                vector,
                content: (*text).to_owned(),
                source: "test.txt".into(),
                content_type: "text/plain".into(),
                chunk_index: i,
            });
        }
        index
    }

    fn pipeline(provider: MockProvider, index: FlatIndex) -> QueryPipeline<MockProvider> {
        let provider = Arc::new(provider);
        let retriever = Retriever::new(Arc::new(index), Arc::clone(&provider));
        QueryPipeline::new(retriever, provider)
    }

    #[tokio::test]
    async fn blank_query_is_rejected_before_any_work() {
        let provider = MockProvider::new();
        let p = pipeline(provider.clone(), FlatIndex::new());
        let err = p.answer("   ", None).await.unwrap_err();
        assert!(matches!(err, QueryError::EmptyQuery));
        assert_eq!(provider.generate_calls(), 0);
    }

    #[tokio::test]
    async fn answers_with_retrieved_context() {
        let provider = MockProvider::with_responses(vec![
            "- Predicted Offense: Theft\n- Relevant Legal Section: Section 378".into(),
        ]);
        let index = indexed(
            &provider,
            &[
                "Theft is defined under Section 378 of the Indian Penal Code.",
                "Murder is defined under Section 300.",
            ],
        )
        .await;
        let p = pipeline(provider.clone(), index);

        let answer = p.answer("  What is theft?  ", Some("en")).await.unwrap();
        assert_eq!(answer.query, "What is theft?");
        assert!(answer.response.contains("Section 378"));

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Indian Penal Code"));
        assert!(prompts[0].contains("What is theft?"));
        assert!(prompts[0].contains("Theft is defined under Section 378"));
        assert!(prompts[0].contains("Murder is defined under Section 300."));
    }

    #[tokio::test]
    async fn requested_language_selects_its_template() {
        let provider = MockProvider::with_responses(vec![
            "चोरी के लिए धारा 378 के अनुसार तीन वर्ष तक का कारावास हो सकता है। यह अपराध की गंभीरता पर निर्भर करता है।"
                .into(),
        ]);
        let p = pipeline(provider.clone(), FlatIndex::new());

        let answer = p.answer("चोरी की सजा क्या है?", Some("hi")).await.unwrap();
        assert!(!answer.response.starts_with(APOLOGY_NOTICE));
        assert!(provider.prompts()[0].contains("भारतीय दंड संहिता"));
    }

    #[tokio::test]
    async fn english_fallback_for_other_language_gains_notice() {
        let canned = "The punishment for theft is imprisonment of up to three years under the penal code.";
        let provider = MockProvider::with_responses(vec![canned.into()]);
        let p = pipeline(provider, FlatIndex::new());

        let answer = p.answer("What is theft?", Some("ta")).await.unwrap();
        assert!(answer.response.starts_with(APOLOGY_NOTICE));
        assert!(answer.response.ends_with(canned));
    }

    #[tokio::test]
    async fn unknown_language_code_uses_baseline() {
        let canned = "Theft is punishable with imprisonment under the penal code provisions.";
        let provider = MockProvider::with_responses(vec![canned.into()]);
        let p = pipeline(provider.clone(), FlatIndex::new());

        let answer = p.answer("What is theft?", Some("fr")).await.unwrap();
        assert_eq!(answer.response, canned);
        assert!(provider.prompts()[0].contains("Indian Penal Code"));
    }

    #[tokio::test]
    async fn empty_index_yields_empty_context() {
        let provider = MockProvider::with_responses(vec!["General legal advice.".into()]);
        let p = pipeline(provider.clone(), FlatIndex::new());

        let answer = p.answer("What is theft?", None).await.unwrap();
        assert_eq!(answer.response, "General legal advice.");
        assert!(provider.prompts()[0].contains("Relevant Context:\n\n"));
    }

    #[tokio::test]
    async fn generation_failure_propagates() {
        let provider = MockProvider::failing();
        let p = pipeline(provider, FlatIndex::new());
        let err = p.answer("What is theft?", None).await.unwrap_err();
        assert!(matches!(err, QueryError::Generation(_)));
    }

    #[tokio::test]
    async fn embedding_failure_is_a_retrieval_error() {
        let provider = MockProvider::failing_embed();
        let mut index = FlatIndex::new();
        index.insert(IndexEntry {
            vector: vec![1.0, 0.0],
            content: "Theft.".into(),
            source: "t.txt".into(),
            content_type: "text/plain".into(),
            chunk_index: 0,
        });
        let p = pipeline(provider.clone(), index);

        let err = p.answer("What is theft?", None).await.unwrap_err();
        assert!(matches!(err, QueryError::Retrieval(_)));
        assert_eq!(provider.generate_calls(), 0);
    }
}
