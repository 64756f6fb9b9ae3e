//! # Agent Configuration
//!
//! Settings come from an optional YAML file, then environment variables
//! override individual fields:
//!
//! | Variable                  | Field |
//! |---------------------------|-------|
//! | `OPENAI_API_KEY`          | `api_key` (never read from YAML) |
//! | `ADGM_LLM_MODEL`          | `llm.model` |
//! | `ADGM_LLM_BASE_URL`       | `llm.base_url` |
//! | `ADGM_EMBEDDING_PROVIDER` | `embedding.provider` (`openai` or `hashing`) |
//! | `ADGM_EMBEDDING_MODEL`    | `embedding.model` |
//! | `ADGM_INDEX_DIR`          | `index_dir` |
//! | `ADGM_DATA_DIR`           | `data_dir` |
//! | `ADGM_TIMEOUT_SECS`       | `timeout_secs` |
//!
//! Every field has a default, so an empty file (or no file) is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use adgm_rag::embedding::{DEFAULT_EMBEDDING_MODEL, DEFAULT_HASHING_DIMENSION, DEFAULT_OPENAI_BASE_URL};
use adgm_rag::{
    BuildOptions, Embedder, HashingEmbedder, OpenAiEmbeddings, OpenAiEmbeddingsConfig,
    TextSplitter, DEFAULT_DATA_DIR, DEFAULT_INDEX_DIR, DEFAULT_TOP_K, DEFAULT_WEB_SOURCES,
};
use serde::{Deserialize, Serialize};
use url::Url;
use zeroize::Zeroizing;

use crate::error::ConfigError;

/// Default chat model.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o";

/// Chat-completion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: 0.0,
        }
    }
}

/// Which embeddings provider to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    OpenAi,
    Hashing,
}

impl EmbeddingProvider {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "hashing" => Some(Self::Hashing),
            _ => None,
        }
    }
}

/// Embeddings settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub provider: EmbeddingProvider,
    /// Base URL of the HTTP provider; defaults to the chat base URL.
    pub base_url: Option<String>,
    pub model: String,
    pub hashing_dimension: usize,
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::OpenAi,
            base_url: None,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            hashing_dimension: DEFAULT_HASHING_DIMENSION,
            batch_size: 64,
        }
    }
}

/// Complete agent configuration.
///
/// Custom `Debug` redacts the API key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub llm: LlmSettings,
    pub embedding: EmbeddingSettings,
    pub index_dir: PathBuf,
    pub data_dir: PathBuf,
    pub web_sources: Vec<String>,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Chunks of regulatory context retrieved per document.
    pub top_k: usize,
    /// Leading characters of a document used as the retrieval query.
    pub max_query_chars: usize,
    pub timeout_secs: u64,
    #[serde(skip)]
    pub api_key: Option<Zeroizing<String>>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let splitter = TextSplitter::default();
        Self {
            llm: LlmSettings::default(),
            embedding: EmbeddingSettings::default(),
            index_dir: PathBuf::from(DEFAULT_INDEX_DIR),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            web_sources: DEFAULT_WEB_SOURCES.iter().map(|s| s.to_string()).collect(),
            chunk_size: splitter.chunk_size,
            chunk_overlap: splitter.chunk_overlap,
            top_k: DEFAULT_TOP_K,
            max_query_chars: 4000,
            timeout_secs: 60,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("llm", &self.llm)
            .field("embedding", &self.embedding)
            .field("index_dir", &self.index_dir)
            .field("data_dir", &self.data_dir)
            .field("web_sources", &self.web_sources)
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("top_k", &self.top_k)
            .field("max_query_chars", &self.max_query_chars)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AgentConfig {
    /// Load from `path` (if given) and apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content).map_err(|e| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Apply overrides from `lookup` (the process environment in production,
    /// a map in tests).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(Zeroizing::new(key));
        }
        if let Some(model) = lookup("ADGM_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = lookup("ADGM_LLM_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(raw) = lookup("ADGM_EMBEDDING_PROVIDER") {
            self.embedding.provider =
                EmbeddingProvider::parse(&raw).ok_or_else(|| ConfigError::InvalidValue {
                    var: "ADGM_EMBEDDING_PROVIDER".into(),
                    value: raw.clone(),
                })?;
        }
        if let Some(model) = lookup("ADGM_EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        if let Some(dir) = lookup("ADGM_INDEX_DIR") {
            self.index_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("ADGM_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("ADGM_TIMEOUT_SECS") {
            self.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "ADGM_TIMEOUT_SECS".into(),
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn splitter(&self) -> TextSplitter {
        TextSplitter::new(self.chunk_size, self.chunk_overlap)
    }

    pub fn build_options(&self, with_web: bool) -> BuildOptions {
        BuildOptions {
            data_dir: self.data_dir.clone(),
            web_sources: if with_web {
                self.web_sources.clone()
            } else {
                Vec::new()
            },
            splitter: self.splitter(),
        }
    }

    pub fn llm_base_url(&self) -> Result<Url, ConfigError> {
        parse_url("llm.base_url", &self.llm.base_url)
    }

    pub(crate) fn api_key(&self, provider: &'static str) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(String::as_str)
            .ok_or(ConfigError::MissingApiKey(provider))
    }

    /// Construct the configured embeddings provider.
    pub fn embedder(&self) -> Result<Embedder, ConfigError> {
        match self.embedding.provider {
            EmbeddingProvider::Hashing => Ok(Embedder::Hashing(HashingEmbedder::new(
                self.embedding.hashing_dimension,
            ))),
            EmbeddingProvider::OpenAi => {
                let base_url = match &self.embedding.base_url {
                    Some(url) => parse_url("embedding.base_url", url)?,
                    None => self.llm_base_url()?,
                };
                let mut config = OpenAiEmbeddingsConfig::new(
                    base_url,
                    self.embedding.model.clone(),
                    self.api_key("openai embeddings")?,
                );
                config.timeout_secs = self.timeout_secs;
                config.batch_size = self.embedding.batch_size;
                Ok(Embedder::OpenAi(OpenAiEmbeddings::new(config)?))
            }
        }
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(field.to_string(), e.to_string()))
}
