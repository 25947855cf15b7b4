use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// One embedded chunk together with the payload needed to answer from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub vector: Vec<f32>,
    pub content: String,
    pub source: String,
    pub content_type: String,
    pub chunk_index: usize,
}

#[derive(Debug, Clone)]
pub struct Hit {
    pub content: String,
    pub source: String,
    pub score: f32,
}

/// Brute-force cosine index over all corpus chunks.
///
/// Entries keep insertion order, which makes tie-breaking during search
/// deterministic: equal scores rank earlier-inserted entries first.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FlatIndex {
    entries: Vec<IndexEntry>,
}

impl FlatIndex {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, entry: IndexEntry) {
        self.entries.push(entry);
    }

    /// Score every entry against `vector` and return the best `limit` hits,
    /// highest score first. An empty index yields an empty result.
    #[must_use]
    pub fn search(&self, vector: &[f32], limit: usize) -> Vec<Hit> {
        let mut scored: Vec<Hit> = self
            .entries
            .iter()
            .map(|entry| Hit {
                content: entry.content.clone(),
                source: entry.source.clone(),
                score: cosine_similarity(vector, &entry.vector),
            })
            .collect();

        // Stable sort preserves insertion order between equal scores.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        scored
    }

    /// Persist the index to `path`, replacing any previous snapshot.
    ///
    /// The snapshot is written to a sibling `.tmp` file first and renamed
    /// into place, so a crash mid-write leaves the old snapshot intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or encoded.
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("tmp");
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            bincode::serialize_into(&mut writer, self)?;
            writer.flush()?;
        }
        std::fs::rename(&tmp, path)?;

        tracing::debug!(path = %path.display(), entries = self.entries.len(), "snapshot written");
        Ok(())
    }

    /// Load a snapshot previously written by [`FlatIndex::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, cannot be decoded, or
    /// holds vectors of differing dimensions.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let file = File::open(path)?;
        let index: Self = bincode::deserialize_from(BufReader::new(file))?;

        if let Some(first) = index.entries.first() {
            let dim = first.vector.len();
            if index.entries.iter().any(|e| e.vector.len() != dim) {
                return Err(IndexError::Corrupt(
                    "snapshot mixes embedding dimensions".into(),
                ));
            }
        }

        tracing::info!(path = %path.display(), entries = index.entries.len(), "snapshot loaded");
        Ok(index)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
