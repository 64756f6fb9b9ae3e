//! # Single-Document Analysis
//!
//! 1. Retrieve ADGM context, using the leading `max_query_chars` characters
//!    of the document as the query.
//! 2. Render the red-flag prompt with the document and the retrieved context.
//! 3. Ask the chat model and return its raw reply.
//!
//! When no knowledge-base index is loaded the context is left empty and the
//! model reviews the document on its own.

use adgm_core::{extract_issues, ComplianceIssue, DocumentReview};
use adgm_rag::{context_text, Retriever};

use crate::config::AgentConfig;
use crate::error::ReviewError;
use crate::llm::ChatClient;
use crate::prompt::review_prompt;

/// Analyses one document at a time.
#[derive(Debug, Clone)]
pub struct Analyzer {
    chat: ChatClient,
    retriever: Option<Retriever>,
    top_k: usize,
    max_query_chars: usize,
}

impl Analyzer {
    pub fn new(chat: ChatClient, retriever: Option<Retriever>) -> Self {
        let defaults = AgentConfig::default();
        Self {
            chat,
            retriever,
            top_k: defaults.top_k,
            max_query_chars: defaults.max_query_chars,
        }
    }

    pub fn with_limits(mut self, top_k: usize, max_query_chars: usize) -> Self {
        self.top_k = top_k;
        self.max_query_chars = max_query_chars;
        self
    }

    pub fn has_index(&self) -> bool {
        self.retriever.is_some()
    }

    pub fn retriever(&self) -> Option<&Retriever> {
        self.retriever.as_ref()
    }

    /// Retrieve context for `content`, render the prompt, and return the
    /// model's raw output.
    pub async fn analyze_document(&self, content: &str) -> Result<String, ReviewError> {
        let context = match &self.retriever {
            Some(retriever) => {
                let query = truncate_chars(content, self.max_query_chars);
                context_text(&retriever.retrieve(query, self.top_k).await?)
            }
            None => {
                tracing::warn!("no knowledge-base index loaded; analysing without ADGM context");
                String::new()
            }
        };
        let prompt = review_prompt(content, &context);
        Ok(self.chat.complete(&prompt).await?)
    }

    /// Analyse and parse. Failures become a [`DocumentReview`] carrying
    /// the error message rather than aborting the review.
    pub async fn review_document(&self, name: &str, content: &str) -> DocumentReview {
        match self.issues_for(content).await {
            Ok(issues) => {
                tracing::info!(document = name, issues = issues.len(), "document analysed");
                DocumentReview::with_issues(name, issues)
            }
            Err(message) => {
                tracing::warn!(document = name, error = %message, "document analysis failed");
                DocumentReview::failed(name, message)
            }
        }
    }

    async fn issues_for(&self, content: &str) -> Result<Vec<ComplianceIssue>, String> {
        let raw = self.analyze_document(content).await.map_err(|e| e.to_string())?;
        extract_issues(&raw).map_err(|e| e.to_string())
    }
}

/// The longest prefix of `s` with at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}
