use crate::types::{Chunk, Document};

#[derive(Debug, Clone, Copy)]
pub struct SplitterConfig {
    pub max_length: usize,
    pub overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            max_length: 1024,
            overlap: 200,
        }
    }
}

pub struct TextSplitter {
    config: SplitterConfig,
}

impl TextSplitter {
    #[must_use]
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// Split a document into chunks of at most `max_length` characters.
    ///
    /// Chunks end on paragraph breaks or sentence endings where possible,
    /// then between words. Only a run with no whitespace at all is cut at
    /// fixed character offsets, with `overlap` characters repeated between
    /// consecutive cuts.
    #[must_use]
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        let text = &document.content;
        if text.is_empty() {
            return Vec::new();
        }

        let pieces = bound_pieces(
            split_boundaries(text),
            self.config.max_length,
            self.config.overlap,
        );

        merge_pieces(&pieces, self.config.max_length, self.config.overlap)
            .into_iter()
            .enumerate()
            .map(|(i, content)| Chunk {
                content,
                metadata: document.metadata.clone(),
                chunk_index: i,
            })
            .collect()
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Cut text into pieces at natural boundaries: paragraph breaks and
/// sentence endings followed by a space.
fn split_boundaries(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        current.push(chars[i]);

        if chars[i] == '\n' && i + 1 < chars.len() && chars[i + 1] == '\n' {
            current.push(chars[i + 1]);
            i += 1;
            if !current.trim().is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
        } else if (chars[i] == '.' || chars[i] == '?' || chars[i] == '!')
            && i + 1 < chars.len()
            && chars[i + 1] == ' '
            && !current.trim().is_empty()
        {
            pieces.push(std::mem::take(&mut current));
        }

        i += 1;
    }

    if !current.trim().is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Re-cut any piece longer than `max_length`, first between words, then at
/// fixed character offsets for runs without any whitespace.
fn bound_pieces(pieces: Vec<String>, max_length: usize, overlap: usize) -> Vec<String> {
    let mut bounded = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if char_len(&piece) <= max_length {
            bounded.push(piece);
            continue;
        }
        for word in split_words(&piece) {
            if char_len(&word) > max_length {
                bounded.extend(split_chars(&word, max_length, overlap));
            } else {
                bounded.push(word);
            }
        }
    }
    bounded
}

/// Cut text before each word, keeping whitespace attached to the preceding
/// word so concatenating the pieces reproduces the input.
fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            in_space = true;
        } else if in_space {
            words.push(std::mem::take(&mut current));
            in_space = false;
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// Merge boundary pieces into chunks, carrying recent pieces forward as
/// overlap. The carry is capped so no chunk can exceed `max_length`.
fn merge_pieces(pieces: &[String], max_length: usize, overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    // Sliding window: track only the piece indices contributing to the current chunk.
    let mut window_start = 0;

    for (idx, piece) in pieces.iter().enumerate() {
        let piece_len = char_len(piece);

        if !current.is_empty() && current_len + piece_len > max_length {
            chunks.push(std::mem::take(&mut current));

            let budget = overlap.min(max_length.saturating_sub(piece_len));
            let mut carried = 0;
            let mut carry_start = idx;
            for i in (window_start..idx).rev() {
                let len = char_len(&pieces[i]);
                if carried + len > budget {
                    break;
                }
                carried += len;
                carry_start = i;
            }
            for p in &pieces[carry_start..idx] {
                current.push_str(p);
            }
            current_len = carried;
            window_start = carry_start;
        }

        current.push_str(piece);
        current_len += piece_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn split_chars(text: &str, max_length: usize, overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let step = max_length.saturating_sub(overlap).max(1);
    let mut start = 0;

    while start < chars.len() {
        let end = (start + max_length).min(chars.len());
        let window: String = chars[start..end].iter().collect();
        if !window.trim().is_empty() {
            chunks.push(window);
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}
