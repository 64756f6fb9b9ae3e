//! # adgm-agent: Review Engine
//!
//! Turns uploaded `.docx` files into a compliance report and annotated copies.
//!
//! ## Modules
//!
//! - [`config`]: `AgentConfig`: YAML file plus environment overrides.
//! - [`llm`]: chat-completion client with transport retry.
//! - [`prompt`]: the ADGM red-flag prompt.
//! - [`analysis`]: retrieve context, prompt, and parse one document.
//! - [`review`]: the end-to-end pipeline: checklist, analysis, report,
//!   annotation.
//!
//! ## Crate Policy
//!
//! - Documents within a review are analysed sequentially.
//! - A failure in one document never aborts the review; it is recorded in
//!   that document's entry of the report.
//! - Secrets never appear in `Debug` output.

pub mod analysis;
pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod review;

use std::sync::Arc;

pub use analysis::Analyzer;
pub use config::{AgentConfig, EmbeddingProvider};
pub use error::{ConfigError, LlmError, ReviewError};
pub use llm::ChatClient;
pub use review::{
    ChecklistStatus, CompletedReview, ReviewOutcome, ReviewPipeline, ReviewedDocument,
    UploadedDocument,
};

use adgm_rag::{RagError, Retriever, VectorIndex};

/// Load the knowledge-base index named by `config` and pair it with the
/// configured embedder. `Ok(None)` when no index has been built yet.
pub fn load_retriever(config: &AgentConfig) -> Result<Option<Retriever>, ConfigError> {
    let index = match VectorIndex::load(&config.index_dir) {
        Ok(index) => index,
        Err(RagError::IndexNotFound(dir)) => {
            tracing::warn!(dir = %dir.display(), "no knowledge-base index found");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let retriever = Retriever::new(Arc::new(index), config.embedder()?)?;
    Ok(Some(retriever))
}

/// Build the review pipeline described by `config`.
pub fn pipeline_from_config(config: &AgentConfig) -> Result<ReviewPipeline, ConfigError> {
    let chat = ChatClient::from_config(config)?;
    let analyzer = Analyzer::new(chat, load_retriever(config)?)
        .with_limits(config.top_k, config.max_query_chars);
    Ok(ReviewPipeline::new(analyzer))
}
