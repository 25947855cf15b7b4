use std::collections::HashMap;
use std::path::Path;
use std::pin::Pin;

use csv::{ReaderBuilder, StringRecord};

use crate::{CorpusError, DEFAULT_MAX_FILE_SIZE, Document, DocumentLoader, DocumentMetadata};

/// Loads tabular datasets. Every data row becomes its own document so
/// that one record stays one retrievable unit after chunking.
pub struct CsvLoader {
    pub max_file_size: u64,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Flatten a record into one line, non-empty fields joined by single spaces.
fn flatten_record(record: &StringRecord) -> String {
    record
        .iter()
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl DocumentLoader for CsvLoader {
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

            let raw = tokio::fs::read(&path).await?;
            let source = path.display().to_string();

            let mut reader = ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .from_reader(raw.as_slice());

            let mut documents = Vec::new();
            for (row, record) in reader.records().enumerate() {
                let content = flatten_record(&record?);
                if content.is_empty() {
                    continue;
                }

                let mut extra = HashMap::new();
                extra.insert("row".to_owned(), row.to_string());

                documents.push(Document {
                    content,
                    metadata: DocumentMetadata {
                        source: source.clone(),
                        content_type: "text/csv".to_owned(),
                        extra,
                    },
                });
            }

            Ok(documents)
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["csv"]
    }
}
