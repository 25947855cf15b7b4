//! Service configuration: TOML file with `NYAYA_*` environment overrides.
//!
//! API keys are never part of the config file. `GEMINI_API_KEY` and
//! `TOGETHER_API_KEY` are read from the environment at provider
//! construction time.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use nyaya_corpus::SplitterConfig;
use nyaya_index::DEFAULT_TOP_K;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub chunker: ChunkerConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist, then apply environment overrides.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<Self>(&content)?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("NYAYA_SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = std::env::var("NYAYA_SERVER_PORT")
            && let Ok(port) = v.parse::<u16>()
        {
            self.server.port = port;
        }
        if let Ok(v) = std::env::var("NYAYA_LLM_PROVIDER") {
            match v.parse::<ProviderKind>() {
                Ok(kind) => self.llm.provider = kind,
                Err(_) => {
                    tracing::warn!(value = %v, "ignoring unrecognized NYAYA_LLM_PROVIDER");
                }
            }
        }
        if let Ok(v) = std::env::var("NYAYA_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("NYAYA_LLM_EMBEDDING_MODEL") {
            self.llm.embedding_model = v;
        }
        if let Ok(v) = std::env::var("NYAYA_INDEX_SNAPSHOT") {
            self.index.snapshot_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("NYAYA_INDEX_TOP_K")
            && let Ok(top_k) = v.parse::<usize>()
        {
            self.index.top_k = top_k;
        }
        if let Ok(v) = std::env::var("NYAYA_CORPUS_DIR") {
            self.corpus.dir = PathBuf::from(v);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunker.overlap >= self.chunker.max_length {
            return Err(ConfigError::Invalid(format!(
                "chunker overlap ({}) must be smaller than max_length ({})",
                self.chunker.overlap, self.chunker.max_length
            )));
        }
        if self.index.top_k == 0 {
            return Err(ConfigError::Invalid("index top_k must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on request body size, uploads included.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkerConfig {
    #[serde(default = "default_chunk_max_length")]
    pub max_length: usize,
    #[serde(default = "default_chunk_overlap")]
    pub overlap: usize,
}

impl ChunkerConfig {
    /// Splitter settings for corpus ingestion.
    #[must_use]
    pub fn splitter(&self) -> SplitterConfig {
        SplitterConfig {
            max_length: self.max_length,
            overlap: self.overlap,
        }
    }
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_length: default_chunk_max_length(),
            overlap: default_chunk_overlap(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    /// Directory scanned for source documents at ingest time.
    #[serde(default = "default_corpus_dir")]
    pub dir: PathBuf,
    /// Standalone dataset files ingested in addition to `dir`.
    #[serde(default)]
    pub datasets: Vec<PathBuf>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: default_corpus_dir(),
            datasets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Together,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Together => "together",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(Self::Gemini),
            "together" => Ok(Self::Together),
            other => Err(ConfigError::Invalid(format!("unknown provider: {other}"))),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    5000
}

fn default_max_body_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_model() -> String {
    "gemini-2.0-flash-exp".into()
}

fn default_embedding_model() -> String {
    "embedding-001".into()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("ipc_vector_db.bin")
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_chunk_max_length() -> usize {
    SplitterConfig::default().max_length
}

fn default_chunk_overlap() -> usize {
    SplitterConfig::default().overlap
}

fn default_corpus_dir() -> PathBuf {
    PathBuf::from("corpus")
}
