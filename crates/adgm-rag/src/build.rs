//! # Index Build
//!
//! Loads local reference files and (optionally) web pages, splits them into
//! chunks, embeds the chunks, and assembles a [`VectorIndex`].

use std::path::PathBuf;

use crate::embedding::Embedder;
use crate::error::RagError;
use crate::index::VectorIndex;
use crate::loader::{load_directory, SourceDocument};
use crate::scrape::Scraper;
use crate::splitter::TextSplitter;

/// Default directory of local reference documents.
pub const DEFAULT_DATA_DIR: &str = "data/adgm_docs";
/// Default index directory.
pub const DEFAULT_INDEX_DIR: &str = "adgm_index";

/// What to feed into an index build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub data_dir: PathBuf,
    /// Pages to scrape; empty disables web sources.
    pub web_sources: Vec<String>,
    pub splitter: TextSplitter,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            web_sources: crate::scrape::DEFAULT_WEB_SOURCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            splitter: TextSplitter::default(),
        }
    }
}

/// Gather every source document the options describe.
pub async fn collect_sources(
    options: &BuildOptions,
    scraper: Option<&Scraper>,
) -> Result<Vec<SourceDocument>, RagError> {
    let mut sources = load_directory(&options.data_dir)?;
    if let Some(scraper) = scraper {
        if !options.web_sources.is_empty() {
            sources.extend(scraper.fetch_all(&options.web_sources).await);
        }
    }
    if sources.is_empty() {
        return Err(RagError::NoSources);
    }
    Ok(sources)
}

/// Split and embed `sources` into a fresh index.
pub async fn index_sources(
    sources: &[SourceDocument],
    splitter: TextSplitter,
    embedder: &Embedder,
) -> Result<VectorIndex, RagError> {
    let mut chunk_sources = Vec::new();
    let mut chunk_texts = Vec::new();
    for doc in sources {
        for chunk in splitter.split(&doc.text) {
            chunk_sources.push(doc.source.as_str());
            chunk_texts.push(chunk);
        }
    }
    if chunk_texts.is_empty() {
        return Err(RagError::NoSources);
    }
    tracing::info!(
        sources = sources.len(),
        chunks = chunk_texts.len(),
        model = %embedder.model(),
        "embedding knowledge-base chunks"
    );

    let vectors = embedder.embed_documents(&chunk_texts).await?;
    if vectors.len() != chunk_texts.len() {
        return Err(RagError::EmbeddingCount {
            expected: chunk_texts.len(),
            got: vectors.len(),
        });
    }
    let dimension = vectors.first().map(Vec::len).unwrap_or_default();

    let mut index = VectorIndex::new(embedder.model(), dimension, splitter);
    let mut duplicates = 0usize;
    for ((source, text), vector) in chunk_sources.into_iter().zip(&chunk_texts).zip(vectors) {
        if !index.insert(source, text, vector)? {
            duplicates += 1;
        }
    }
    if duplicates > 0 {
        tracing::debug!(duplicates, "dropped duplicate chunks");
    }
    Ok(index)
}

/// Collect, split and embed: the whole build.
pub async fn build_index(
    options: &BuildOptions,
    embedder: &Embedder,
    scraper: Option<&Scraper>,
) -> Result<VectorIndex, RagError> {
    let sources = collect_sources(options, scraper).await?;
    index_sources(&sources, options.splitter, embedder).await
}
