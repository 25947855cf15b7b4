use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;
use std::pin::Pin;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::{CorpusError, DEFAULT_MAX_FILE_SIZE, Document, DocumentLoader, DocumentMetadata};

pub struct DocxLoader {
    pub max_file_size: u64,
}

impl Default for DocxLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Pull the visible text out of a `.docx` archive.
///
/// A `.docx` file is a zip archive whose body text lives in
/// `word/document.xml`.
pub(crate) fn extract_docx_text(bytes: &[u8]) -> Result<String, CorpusError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;
    Ok(extract_body_text(&xml)?)
}

/// Walk the document markup collecting `w:t` text runs. Paragraph ends
/// and explicit breaks become newlines.
fn extract_body_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:br" => text.push('\n'),
                b"w:tab" => text.push(' '),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run => text.push_str(&e.unescape()?),
            Ok(Event::Eof) => break,
            Err(e) => return Err(e),
            Ok(_) => {}
        }
        buf.clear();
    }

    Ok(text)
}

impl DocumentLoader for DocxLoader {
    fn load(
        &self,
        path: &Path,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<Document>, CorpusError>> + Send + '_>>
    {
        let path = path.to_path_buf();
        let max_size = self.max_file_size;
        Box::pin(async move {
            let path = std::fs::canonicalize(&path)?;

            let meta = tokio::fs::metadata(&path).await?;
            if meta.len() > max_size {
                return Err(CorpusError::FileTooLarge(meta.len()));
            }

            let bytes = tokio::fs::read(&path).await?;
            let content = tokio::task::spawn_blocking(move || extract_docx_text(&bytes))
                .await
                .map_err(|e| CorpusError::Io(std::io::Error::other(e)))??;

            Ok(vec![Document {
                content,
                metadata: DocumentMetadata {
                    source: path.display().to_string(),
                    content_type:
                        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                            .to_owned(),
                    extra: HashMap::new(),
                },
            }])
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    use super::*;

    const BODY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Theft is punishable</w:t></w:r><w:r><w:t xml:space="preserve"> under Section 378.</w:t></w:r></w:p>
    <w:p><w:r><w:t>Second paragraph.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    fn make_docx(xml: &str) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn text_runs_join_within_a_paragraph() {
        let text = extract_body_text(BODY_XML).unwrap();
        assert!(text.contains("Theft is punishable under Section 378."));
    }

    #[test]
    fn paragraphs_separated_by_newlines() {
        let text = extract_body_text(BODY_XML).unwrap();
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Second paragraph.");
    }

    #[test]
    fn entities_are_unescaped() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>Smith &amp; Sons</w:t></w:r></w:p></w:body></w:document>"#;
        let text = extract_body_text(xml).unwrap();
        assert!(text.contains("Smith & Sons"));
    }

    #[test]
    fn non_text_elements_are_ignored() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>Visible</w:t></w:r></w:p></w:body></w:document>"#;
        let text = extract_body_text(xml).unwrap();
        assert_eq!(text.trim(), "Visible");
    }

    #[tokio::test]
    async fn load_extracts_document_body() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("judgment.docx");
        std::fs::write(&file, make_docx(BODY_XML)).unwrap();

        let docs = DocxLoader::default().load(&file).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].content.contains("Theft is punishable under Section 378."));
        assert!(docs[0].metadata.content_type.contains("wordprocessingml"));
    }

    #[tokio::test]
    async fn archive_without_document_xml_is_an_error() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer.start_file("unrelated.txt", options).unwrap();
        writer.write_all(b"nothing").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.docx");
        std::fs::write(&file, bytes).unwrap();

        let result = DocxLoader::default().load(&file).await;
        assert!(matches!(result, Err(CorpusError::Archive(_))));
    }

    #[tokio::test]
    async fn non_zip_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("fake.docx");
        std::fs::write(&file, "plain text pretending").unwrap();

        let result = DocxLoader::default().load(&file).await;
        assert!(matches!(result, Err(CorpusError::Archive(_))));
    }

    #[test]
    fn supported_extensions_list() {
        assert_eq!(DocxLoader::default().supported_extensions(), &["docx"]);
    }
}
