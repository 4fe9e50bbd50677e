//! In-memory store implementation using moka

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::{KeyPage, ListKeys, Store};
use crate::domain::DomainError;

/// Configuration for the in-memory store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoreConfig {
    /// Maximum number of entries; unbounded when `None`
    pub max_capacity: Option<u64>,
}

impl InMemoryStoreConfig {
    /// Bounds the number of stored entries
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }
}

/// Process-local store backed by moka.
///
/// Entries never expire. With a capacity bound, moka evicts the least
/// valuable entries once the bound is exceeded.
#[derive(Debug)]
pub struct InMemoryStore {
    entries: MokaCache<String, String>,
}

impl InMemoryStore {
    /// Creates an unbounded in-memory store
    pub fn new() -> Self {
        Self::with_config(InMemoryStoreConfig::default())
    }

    pub fn with_config(config: InMemoryStoreConfig) -> Self {
        let mut builder = MokaCache::builder();

        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        Self {
            entries: builder.build(),
        }
    }

    /// Number of stored entries after pending maintenance has run
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.get(key).await)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.entries
            .insert(key.to_string(), value.to_string())
            .await;
        Ok(())
    }

    async fn list_keys(&self, params: &ListKeys) -> Result<KeyPage, DomainError> {
        self.entries.run_pending_tasks().await;

        let prefix = params.prefix.clone();
        let snapshot = self.entries.clone();

        let mut keys: Vec<String> = tokio::task::spawn_blocking(move || {
            snapshot
                .iter()
                .map(|(k, _)| k.to_string())
                .filter(|k| prefix.as_deref().is_none_or(|p| k.starts_with(p)))
                .collect()
        })
        .await
        .map_err(|e| DomainError::store(format!("Failed to iterate store: {}", e)))?;

        keys.sort_unstable();

        // The cursor is the last key of the previous page
        if let Some(cursor) = &params.cursor {
            keys.retain(|k| k.as_str() > cursor.as_str());
        }

        if keys.len() <= params.limit {
            return Ok(KeyPage::complete(keys));
        }

        keys.truncate(params.limit);
        let cursor = keys.last().cloned().unwrap_or_default();

        Ok(KeyPage::partial(keys, cursor))
    }

    fn backend_name(&self) -> &'static str {
        "in_memory"
    }
}
