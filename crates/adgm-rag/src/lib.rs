//! # adgm-rag: Knowledge Base
//!
//! Builds and queries the ADGM regulatory knowledge base that grounds each
//! document review.
//!
//! ## Pipeline
//!
//! ```text
//! data dir (.pdf .docx .txt .md) ─┐
//!                                 ├─> SourceDocument ─> TextSplitter ─> Embedder ─> VectorIndex ─> index.json
//! ADGM web pages (scraped) ───────┘
//! ```
//!
//! At query time a [`Retriever`] embeds the query with the same model the
//! index was built with and returns the top-k chunks by cosine similarity.
//!
//! ## Crate Policy
//!
//! - Provider HTTP calls retry transport failures with exponential backoff.
//! - API keys never appear in `Debug` output.
//! - No `.unwrap()` outside tests.

pub mod build;
pub mod embedding;
pub mod error;
pub mod index;
pub mod loader;
pub mod retriever;
pub mod retry;
pub mod scrape;
pub mod splitter;

pub use build::{build_index, BuildOptions, DEFAULT_DATA_DIR, DEFAULT_INDEX_DIR};
pub use embedding::{Embedder, HashingEmbedder, OpenAiEmbeddings, OpenAiEmbeddingsConfig};
pub use error::RagError;
pub use index::{ScoredChunk, VectorIndex, INDEX_FILE};
pub use loader::SourceDocument;
pub use retriever::{context_text, Retriever, DEFAULT_TOP_K};
pub use retry::RetryPolicy;
pub use scrape::{Scraper, DEFAULT_WEB_SOURCES};
pub use splitter::TextSplitter;

/// Resolve `path` against a provider base URL, treating the base as a
/// directory whether or not it ends in `/`.
pub fn provider_url(base: &url::Url, path: &str) -> Result<url::Url, url::ParseError> {
    if base.path().ends_with('/') {
        base.join(path)
    } else {
        let dir = format!("{}/", base.path());
        let mut base = base.clone();
        base.set_path(&dir);
        base.join(path)
    }
}
