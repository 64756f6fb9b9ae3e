//! # Vector Index
//!
//! Brute-force cosine similarity over every stored chunk. The knowledge base
//! is a few thousand chunks at most, so a linear scan is fast enough and
//! keeps the on-disk format a single readable JSON file.
//!
//! ## On-disk format
//!
//! `{dir}/index.json`:
//!
//! ```json
//! {
//!   "embedding_model": "text-embedding-3-small",
//!   "dimension": 1536,
//!   "created_at": "2026-01-15T12:00:00Z",
//!   "chunk_size": 1000,
//!   "chunk_overlap": 200,
//!   "entries": [ { "id": "<sha256 hex of text>", "source": "...", "text": "...", "vector": [ ... ] } ]
//! }
//! ```

use std::cmp::Ordering;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RagError;
use crate::splitter::TextSplitter;

/// Index file name inside the index directory.
pub const INDEX_FILE: &str = "index.json";

/// A stored chunk and its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub source: String,
    pub text: String,
    pub vector: Vec<f32>,
}

/// A chunk returned by a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub source: String,
    pub text: String,
    pub score: f32,
}

/// The persisted knowledge-base index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    pub embedding_model: String,
    pub dimension: usize,
    pub created_at: DateTime<Utc>,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn new(embedding_model: impl Into<String>, dimension: usize, splitter: TextSplitter) -> Self {
        Self {
            embedding_model: embedding_model.into(),
            dimension,
            created_at: Utc::now(),
            chunk_size: splitter.chunk_size,
            chunk_overlap: splitter.chunk_overlap,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a chunk. Chunks whose text is already indexed are ignored;
    /// returns whether the chunk was added.
    pub fn insert(&mut self, source: &str, text: &str, vector: Vec<f32>) -> Result<bool, RagError> {
        if vector.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }
        let id = adgm_core::sha256_digest(text.as_bytes()).to_hex();
        if self.entries.iter().any(|e| e.id == id) {
            return Ok(false);
        }
        self.entries.push(IndexEntry {
            id,
            source: source.to_string(),
            text: text.to_string(),
            vector,
        });
        Ok(true)
    }

    /// The `k` entries most similar to `query`, best first. Ties keep
    /// insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, RagError> {
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_similarity(query, &e.vector)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, score)| ScoredChunk {
                source: self.entries[i].source.clone(),
                text: self.entries[i].text.clone(),
                score,
            })
            .collect())
    }

    /// Fail unless the index was built with `model`.
    pub fn ensure_model(&self, model: &str) -> Result<(), RagError> {
        if self.embedding_model != model {
            return Err(RagError::ModelMismatch {
                index_model: self.embedding_model.clone(),
                configured: model.to_string(),
            });
        }
        Ok(())
    }

    /// Write `{dir}/index.json`, creating `dir` if needed.
    pub fn save(&self, dir: &Path) -> Result<(), RagError> {
        std::fs::create_dir_all(dir).map_err(|e| RagError::io(dir, e))?;
        let path = dir.join(INDEX_FILE);
        let json = serde_json::to_vec(self)?;
        std::fs::write(&path, json).map_err(|e| RagError::io(&path, e))?;
        tracing::info!(path = %path.display(), entries = self.len(), "saved knowledge-base index");
        Ok(())
    }

    /// Read `{dir}/index.json`.
    pub fn load(dir: &Path) -> Result<Self, RagError> {
        let path = dir.join(INDEX_FILE);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RagError::IndexNotFound(dir.to_path_buf()))
            }
            Err(e) => return Err(RagError::io(&path, e)),
        };
        let index: Self = serde_json::from_slice(&bytes)?;
        if let Some(bad) = index.entries.iter().find(|e| e.vector.len() != index.dimension) {
            return Err(RagError::DimensionMismatch {
                expected: index.dimension,
                got: bad.vector.len(),
            });
        }
        tracing::info!(
            path = %path.display(),
            entries = index.len(),
            model = %index.embedding_model,
            "loaded knowledge-base index"
        );
        Ok(index)
    }
}

/// Cosine similarity; zero when either vector has zero length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
