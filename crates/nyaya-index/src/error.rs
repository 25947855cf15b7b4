#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("snapshot is corrupt: {0}")]
    Corrupt(String),

    #[error("embedding failed: {0}")]
    Embedding(#[from] nyaya_llm::LlmError),
}
