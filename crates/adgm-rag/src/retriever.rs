//! Query-time retrieval: embed the query, scan the index.

use std::sync::Arc;

use crate::embedding::Embedder;
use crate::error::RagError;
use crate::index::{ScoredChunk, VectorIndex};

/// Chunks returned per query unless the caller asks otherwise.
pub const DEFAULT_TOP_K: usize = 4;

/// A loaded index paired with the embedder that built it.
#[derive(Debug, Clone)]
pub struct Retriever {
    index: Arc<VectorIndex>,
    embedder: Embedder,
}

impl Retriever {
    /// Fails with [`RagError::ModelMismatch`] when `embedder` is not the
    /// model the index was built with.
    pub fn new(index: Arc<VectorIndex>, embedder: Embedder) -> Result<Self, RagError> {
        index.ensure_model(&embedder.model())?;
        Ok(Self { index, embedder })
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>, RagError> {
        if self.index.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let vector = self.embedder.embed_query(query).await?;
        let hits = self.index.search(&vector, k)?;
        tracing::debug!(hits = hits.len(), k, "retrieved context");
        Ok(hits)
    }
}

/// Join retrieved chunk texts into one context block, separated by blank
/// lines.
pub fn context_text(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;
    use crate::splitter::TextSplitter;

    fn retriever() -> Retriever {
        let hashing = HashingEmbedder::new(256);
        let mut index = VectorIndex::new(hashing.model(), 256, TextSplitter::default());
        for (source, text) in [
            ("setting-up", "Every company must file Articles of Association with the Registration Authority."),
            ("courts", "Disputes are heard by the ADGM Courts, not the UAE Federal Courts."),
            ("accounts", "Annual accounts must be filed within nine months of the financial year end."),
        ] {
            index.insert(source, text, hashing.embed_one(text)).unwrap();
        }
        Retriever::new(Arc::new(index), Embedder::Hashing(hashing)).unwrap()
    }

    #[tokio::test]
    async fn retrieves_most_relevant_chunk_first() {
        let hits = retriever()
            .retrieve("Which courts have jurisdiction over disputes?", 2)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].source, "courts");
    }

    #[tokio::test]
    async fn zero_k_returns_nothing() {
        assert!(retriever().retrieve("anything", 0).await.unwrap().is_empty());
    }

    #[test]
    fn mismatched_embedder_is_rejected() {
        let index = VectorIndex::new("text-embedding-3-small", 256, TextSplitter::default());
        let err = Retriever::new(Arc::new(index), Embedder::Hashing(HashingEmbedder::new(256)))
            .unwrap_err();
        assert!(matches!(err, RagError::ModelMismatch { .. }));
    }

    #[test]
    fn context_joins_with_blank_lines() {
        let chunks = vec![
            ScoredChunk { source: "a".into(), text: "one".into(), score: 0.9 },
            ScoredChunk { source: "b".into(), text: "two".into(), score: 0.5 },
        ];
        assert_eq!(context_text(&chunks), "one\n\ntwo");
        assert_eq!(context_text(&[]), "");
    }
}
