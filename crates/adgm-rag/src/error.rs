//! Knowledge-base error types.

use std::path::PathBuf;

/// Errors from building, persisting, or querying the knowledge base.
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    /// Filesystem access failed.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A source file could not be turned into text.
    #[error("could not extract text from {path}: {message}")]
    Extract { path: PathBuf, message: String },

    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// A provider returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The embeddings provider answered with the wrong number of vectors.
    #[error("embeddings provider returned {got} vectors for {expected} inputs")]
    EmbeddingCount { expected: usize, got: usize },

    /// Missing or invalid provider configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Index file could not be (de)serialized.
    #[error("index serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No index file exists at the expected location.
    #[error("no knowledge-base index at {0}; run `adgm index build` first")]
    IndexNotFound(PathBuf),

    /// The index was built with a different embedding model than the one
    /// configured for queries.
    #[error("index was built with embedding model {index_model:?} but {configured:?} is configured")]
    ModelMismatch {
        index_model: String,
        configured: String,
    },

    /// A vector has a different dimension than the index.
    #[error("vector dimension {got} does not match index dimension {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Neither local files nor web pages yielded any text.
    #[error("no source documents found; add files to the data directory or enable web sources")]
    NoSources,
}

impl RagError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
