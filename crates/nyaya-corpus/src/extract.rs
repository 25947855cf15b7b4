//! Text extraction from in-memory uploads.
//!
//! Mirrors the file loaders but works on bytes already read from a
//! request body, dispatching on the uploaded file name's extension.

use crate::CorpusError;
use crate::loader::docx;

/// Extract plain text from an uploaded file body.
///
/// Supported extensions are `pdf` (behind the `pdf` feature), `docx`,
/// and `txt`; the extension match is case-insensitive.
///
/// # Errors
/// [`CorpusError::UnsupportedFormat`] for unknown extensions, otherwise
/// the format-specific extraction error.
pub fn extract_upload(filename: &str, bytes: &[u8]) -> Result<String, CorpusError> {
    let extension = filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match extension.as_str() {
        #[cfg(feature = "pdf")]
        "pdf" => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| CorpusError::Pdf(e.to_string()))
        }
        "docx" => docx::extract_docx_text(bytes),
        "txt" => String::from_utf8(bytes.to_vec()).map_err(|e| {
            CorpusError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        }),
        other => Err(CorpusError::UnsupportedFormat(other.to_owned())),
    }
}
