//! # Error Types
//!
//! Errors raised by the domain layer. Everything derives `thiserror` so the
//! messages compose cleanly into the API and CLI error chains.

use thiserror::Error;

/// Top-level error type for the domain layer.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Model output could not be turned into compliance issues.
    #[error("issue extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// Report serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure to recover a JSON issue array from model output.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The output contained no `[` ... `]` span at all.
    #[error("no JSON array found in model output")]
    NoJsonArray,

    /// A bracketed span was found but it is not a valid issue array.
    #[error("model output is not a valid issue array: {0}")]
    InvalidJson(#[source] serde_json::Error),
}
