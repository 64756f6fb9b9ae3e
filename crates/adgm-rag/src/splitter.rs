//! # Recursive Character Splitter
//!
//! Splits text into overlapping chunks of at most `chunk_size` characters.
//!
//! The text is cut on the first separator from the list that occurs in it
//! (paragraph break, line break, space, then individual characters). Each
//! separator stays attached to the start of the piece that follows it.
//! Pieces shorter than `chunk_size` are greedily merged into chunks; pieces
//! that are still too long are split again with the remaining separators.
//! When a chunk is emitted, leading pieces are dropped until at most
//! `chunk_overlap` characters are carried into the next chunk.
//!
//! Chunks are whitespace-trimmed and empty chunks are dropped. All lengths
//! are counted in characters, not bytes.

use serde::{Deserialize, Serialize};

/// Default chunk length.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default overlap carried between consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splitter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSplitter {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl TextSplitter {
    /// Overlap is clamped below `chunk_size`, and `chunk_size` is at least 1.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with(text, &SEPARATORS)
    }

    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut separator = separators.last().copied().unwrap_or("");
        let mut remaining: &[&str] = &[];
        for (i, candidate) in separators.iter().copied().enumerate() {
            if candidate.is_empty() {
                separator = candidate;
                break;
            }
            if text.contains(candidate) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut small: Vec<&str> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                small.push(piece);
                continue;
            }
            if !small.is_empty() {
                chunks.extend(self.merge(&small));
                small.clear();
            }
            if remaining.is_empty() {
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_with(piece, remaining));
            }
        }
        if !small.is_empty() {
            chunks.extend(self.merge(&small));
        }
        chunks
    }

    /// Greedily join pieces into chunks with overlap. Separators are already
    /// part of the pieces, so pieces are concatenated directly.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: std::collections::VecDeque<&str> = std::collections::VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    tracing::debug!(total, chunk_size = self.chunk_size, "chunk exceeds target size");
                }
                if !window.is_empty() {
                    push_trimmed(&mut chunks, &window);
                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        match window.pop_front() {
                            Some(front) => total -= char_len(front),
                            None => break,
                        }
                    }
                }
            }
            window.push_back(piece);
            total += len;
        }
        push_trimmed(&mut chunks, &window);
        chunks
    }
}

fn push_trimmed(chunks: &mut Vec<String>, window: &std::collections::VecDeque<&str>) {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Cut `text` before every occurrence of `separator`. An empty separator
/// cuts between characters. Empty pieces are dropped.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (at, _) in text.match_indices(separator) {
        if at > start {
            pieces.push(&text[start..at]);
        }
        start = at;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}
