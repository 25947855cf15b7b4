use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::provider::LlmProvider;

const API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_SECS: u64 = 1;

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    embedding_model: String,
    base_url: String,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Clone for GeminiProvider {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            embedding_model: self.embedding_model.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl GeminiProvider {
    #[must_use]
    pub fn new(api_key: String, model: String, embedding_model: String) -> Self {
        Self {
            client: crate::http::default_client(),
            api_key,
            model,
            embedding_model,
            base_url: API_URL.to_owned(),
        }
    }

    /// Override the API endpoint, for tests against a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, mut base_url: String) -> Self {
        while base_url.ends_with('/') {
            base_url.pop();
        }
        self.base_url = base_url;
        self
    }

    async fn send_generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        for attempt in 0..=MAX_RETRIES {
            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if attempt == MAX_RETRIES {
                    return Err(LlmError::RateLimited);
                }
                let delay = retry_delay(&response, attempt);
                tracing::warn!(
                    "Gemini rate limited, retrying in {}s (attempt {}/{})",
                    delay.as_secs(),
                    attempt + 1,
                    MAX_RETRIES
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            let text = response.text().await.map_err(LlmError::Http)?;

            if !status.is_success() {
                tracing::error!("Gemini API error {status}: {text}");
                return Err(LlmError::Api {
                    provider: "gemini",
                    status: status.as_u16(),
                    message: text,
                });
            }

            let resp: GenerateResponse = serde_json::from_str(&text)?;
            let answer: String = resp
                .candidates
                .first()
                .map(|c| {
                    c.content
                        .parts
                        .iter()
                        .map(|p| p.text.as_str())
                        .collect::<String>()
                })
                .unwrap_or_default();

            if answer.is_empty() {
                return Err(LlmError::EmptyResponse { provider: "gemini" });
            }
            return Ok(answer);
        }

        Err(LlmError::RateLimited)
    }
}

impl LlmProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.send_generate(prompt).await
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let model = format!("models/{}", self.embedding_model);
        let body = EmbedRequest {
            model: &model,
            content: RequestContent {
                parts: vec![RequestPart { text }],
            },
        };
        let url = format!(
            "{}/models/{}:embedContent",
            self.base_url, self.embedding_model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(LlmError::Http)?;

        if !status.is_success() {
            tracing::error!("Gemini embedding API error {status}: {text}");
            return Err(LlmError::Api {
                provider: "gemini",
                status: status.as_u16(),
                message: text,
            });
        }

        let resp: EmbedResponse = serde_json::from_str(&text)?;
        if resp.embedding.values.is_empty() {
            return Err(LlmError::EmptyResponse { provider: "gemini" });
        }
        Ok(resp.embedding.values)
    }

    fn supports_embeddings(&self) -> bool {
        true
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "gemini"
    }
}

fn retry_delay(response: &reqwest::Response, attempt: u32) -> Duration {
    if let Some(val) = response.headers().get("retry-after")
        && let Ok(s) = val.to_str()
        && let Ok(secs) = s.parse::<u64>()
    {
        return Duration::from_secs(secs);
    }
    Duration::from_secs(BASE_BACKOFF_SECS << attempt)
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    content: RequestContent<'a>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f32>,
}
