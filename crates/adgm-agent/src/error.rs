//! Error types for the review engine.

use std::path::PathBuf;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse YAML config {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("OPENAI_API_KEY environment variable is required for the {0} provider")]
    MissingApiKey(&'static str),

    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),

    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: String, value: String },

    #[error("knowledge base: {0}")]
    Rag(#[from] adgm_rag::RagError),

    #[error("chat client: {0}")]
    Llm(#[from] LlmError),
}

/// Errors from the chat-completion API.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The API returned a non-2xx status.
    #[error("chat API {endpoint} returned {status}: {body}")]
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

    /// The response carried no message content.
    #[error("chat API returned no choices")]
    EmptyResponse,

    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors that abort a whole review. Per-document failures are recorded
/// in the report instead.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("no documents were uploaded")]
    NoDocuments,

    #[error("{0} is not a .docx file; only .docx documents can be reviewed")]
    UnsupportedFile(String),

    #[error("document {0} was uploaded more than once")]
    DuplicateDocument(String),

    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("knowledge base: {0}")]
    Rag(#[from] adgm_rag::RagError),
}
