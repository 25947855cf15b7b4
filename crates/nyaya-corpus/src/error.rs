#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("file too large: {0} bytes")]
    FileTooLarge(u64),

    #[cfg(feature = "pdf")]
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("document archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("document markup error: {0}")]
    Markup(#[from] quick_xml::Error),

    #[error("dataset error: {0}")]
    Dataset(#[from] csv::Error),

    #[error("embedding failed: {0}")]
    Embedding(#[from] nyaya_llm::LlmError),

    #[error("index error: {0}")]
    Index(#[from] nyaya_index::IndexError),
}
