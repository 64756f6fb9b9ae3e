//! # Embeddings
//!
//! Two providers behind one enum:
//!
//! - [`OpenAiEmbeddings`] calls an OpenAI-compatible `POST {base}/embeddings`
//!   endpoint in batches.
//! - [`HashingEmbedder`] hashes lower-cased word tokens into a fixed number
//!   of signed buckets and L2-normalises the result. It needs no network and
//!   is deterministic, which makes it the provider for offline runs and tests.
//!
//! The provider's model name is stored in the index so that an index is never
//! queried with vectors from a different model.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;
use zeroize::Zeroizing;

use crate::error::RagError;
use crate::retry::RetryPolicy;

/// Default embeddings model for the HTTP provider.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// Default base URL of the HTTP provider.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";
/// Default dimension of the hashing provider.
pub const DEFAULT_HASHING_DIMENSION: usize = 384;

const DEFAULT_BATCH_SIZE: usize = 64;

/// Settings for [`OpenAiEmbeddings`].
///
/// `Debug` redacts the API key.
#[derive(Clone)]
pub struct OpenAiEmbeddingsConfig {
    pub base_url: Url,
    pub model: String,
    pub api_key: Zeroizing<String>,
    pub timeout_secs: u64,
    pub batch_size: usize,
}

impl std::fmt::Debug for OpenAiEmbeddingsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddingsConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl OpenAiEmbeddingsConfig {
    pub fn new(base_url: Url, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            model: model.into(),
            api_key: Zeroizing::new(api_key.into()),
            timeout_secs: 60,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// Client for an OpenAI-compatible embeddings endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddings {
    http: reqwest::Client,
    endpoint_url: Url,
    model: String,
    batch_size: usize,
}

impl OpenAiEmbeddings {
    pub fn new(config: OpenAiEmbeddingsConfig) -> Result<Self, RagError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.api_key.as_str()))
                .map_err(|_| RagError::Config("API key is not a valid header value".into()))?,
        );
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| RagError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        let endpoint_url = crate::provider_url(&config.base_url, "embeddings")
            .map_err(|e| RagError::Config(format!("invalid embeddings base URL: {e}")))?;

        Ok(Self {
            http,
            endpoint_url,
            model: config.model,
            batch_size: config.batch_size.max(1),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Embed one batch. Calls `POST {base}/embeddings`.
    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let endpoint = "POST /embeddings";
        let body = EmbeddingsRequest {
            model: &self.model,
            input: batch,
        };

        let resp = RetryPolicy::default().send(|| {
            self.http
                .post(self.endpoint_url.clone())
                .json(&body)
                .send()
        })
        .await
        .map_err(|e| RagError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(RagError::ApiError {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let mut parsed: EmbeddingsResponse =
            resp.json().await.map_err(|e| RagError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })?;
        if parsed.data.len() != batch.len() {
            return Err(RagError::EmbeddingCount {
                expected: batch.len(),
                got: parsed.data.len(),
            });
        }
        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }

    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            vectors.extend(self.embed_batch(batch).await?);
            tracing::debug!(done = vectors.len(), total = texts.len(), "embedded batch");
        }
        Ok(vectors)
    }
}

/// Offline embedder: signed feature hashing over word tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIMENSION)
    }
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model(&self) -> String {
        format!("hashing-{}", self.dimension)
    }

    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let digest = adgm_core::sha256_digest(token.to_lowercase().as_bytes()).bytes;
            let mut head = [0u8; 8];
            head.copy_from_slice(&digest[..8]);
            let h = u64::from_le_bytes(head);
            let bucket = (h % self.dimension as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }
        normalize(&mut vector);
        vector
    }
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}

/// An embeddings provider.
#[derive(Debug, Clone)]
pub enum Embedder {
    OpenAi(OpenAiEmbeddings),
    Hashing(HashingEmbedder),
}

impl Embedder {
    /// Model name recorded in, and checked against, the index.
    pub fn model(&self) -> String {
        match self {
            Self::OpenAi(client) => client.model().to_string(),
            Self::Hashing(hashing) => hashing.model(),
        }
    }

    /// Embed documents, one vector per input, in input order.
    pub async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        match self {
            Self::OpenAi(client) => client.embed(texts).await,
            Self::Hashing(hashing) => Ok(texts.iter().map(|t| hashing.embed_one(t)).collect()),
        }
    }

    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let mut vectors = self.embed_documents(&[text.to_string()]).await?;
        vectors.pop().ok_or(RagError::EmbeddingCount {
            expected: 1,
            got: 0,
        })
    }
}
