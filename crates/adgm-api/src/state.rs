//! # Application State
//!
//! Completed reviews are kept in process memory, keyed by a random UUID.
//! The review pipeline is optional: without a model API key the server still
//! serves the upload page and checklist, and reviews return 503.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use adgm_agent::{ReviewPipeline, ReviewedDocument};
use adgm_core::ReviewReport;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

/// Reviews kept in memory before the oldest is evicted.
pub const DEFAULT_MAX_STORED_REVIEWS: usize = 100;

#[derive(Debug)]
struct Entries<T> {
    map: HashMap<Uuid, T>,
    /// Insertion order, oldest first.
    order: VecDeque<Uuid>,
}

/// Thread-safe in-memory map from id to record.
///
/// With a capacity set, inserting a new key past the capacity evicts the
/// oldest record.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<Entries<T>>>,
    capacity: Option<usize>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            capacity: self.capacity,
        }
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Unbounded store.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Store holding at most `capacity` records (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(Some(capacity.max(1)))
    }

    fn build(capacity: Option<usize>) -> Self {
        Self {
            data: Arc::new(RwLock::new(Entries {
                map: HashMap::new(),
                order: VecDeque::new(),
            })),
            capacity,
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        let mut entries = self.data.write();
        let previous = entries.map.insert(id, value);
        if previous.is_some() {
            return previous;
        }
        entries.order.push_back(id);
        if let Some(capacity) = self.capacity {
            while entries.order.len() > capacity {
                if let Some(oldest) = entries.order.pop_front() {
                    entries.map.remove(&oldest);
                    tracing::debug!(id = %oldest, "evicted oldest stored record");
                }
            }
        }
        None
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().map.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.data.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().map.is_empty()
    }
}

/// A finished review held for download.
#[derive(Debug, Clone)]
pub struct StoredReview {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub report: Arc<ReviewReport>,
    pub documents: Arc<Vec<ReviewedDocument>>,
}

impl StoredReview {
    /// Find a reviewed copy by its upload name or by its `reviewed_` name.
    pub fn document(&self, name: &str) -> Option<&ReviewedDocument> {
        self.documents
            .iter()
            .find(|d| d.file_name == name || d.source_name == name)
    }
}

/// Server configuration read from the environment.
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub auth_token: Option<String>,
    /// Completed reviews kept for download.
    pub max_stored_reviews: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            max_stored_reviews: DEFAULT_MAX_STORED_REVIEWS,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("max_stored_reviews", &self.max_stored_reviews)
            .finish()
    }
}

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pipeline: Option<Arc<ReviewPipeline>>,
    pub reviews: Store<StoredReview>,
}

impl AppState {
    /// State with no pipeline and auth disabled.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    pub fn with_config(config: AppConfig, pipeline: Option<ReviewPipeline>) -> Self {
        Self {
            reviews: Store::with_capacity(config.max_stored_reviews),
            config,
            pipeline: pipeline.map(Arc::new),
        }
    }

    /// Whether reviews will be grounded in a knowledge-base index.
    pub fn index_loaded(&self) -> bool {
        self.pipeline
            .as_ref()
            .is_some_and(|p| p.analyzer().has_index())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
