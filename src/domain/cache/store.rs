//! Key-value store trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::DomainError;

/// One page of a key listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyPage {
    pub keys: Vec<String>,
    /// Opaque cursor for the next page, `None` once the listing is complete
    pub cursor: Option<String>,
    pub list_complete: bool,
}

impl KeyPage {
    pub fn complete(keys: Vec<String>) -> Self {
        Self {
            keys,
            cursor: None,
            list_complete: true,
        }
    }

    pub fn partial(keys: Vec<String>, cursor: impl Into<String>) -> Self {
        Self {
            keys,
            cursor: Some(cursor.into()),
            list_complete: false,
        }
    }
}

/// Parameters for listing keys
#[derive(Debug, Clone, Default)]
pub struct ListKeys {
    pub prefix: Option<String>,
    pub cursor: Option<String>,
    pub limit: usize,
}

impl ListKeys {
    pub const DEFAULT_LIMIT: usize = 100;
    pub const MAX_LIMIT: usize = 1000;

    pub fn new() -> Self {
        Self {
            prefix: None,
            cursor: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, Self::MAX_LIMIT);
        self
    }
}

/// Persistent string store with no expiry.
///
/// Values are stored verbatim. Writes are last-writer-wins.
#[async_trait]
pub trait Store: Send + Sync + Debug {
    /// Gets the raw value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores `value` under `key`, replacing any previous value
    async fn put(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Lists stored keys one page at a time
    async fn list_keys(&self, params: &ListKeys) -> Result<KeyPage, DomainError>;

    /// Store backend name for logs and health checks
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock store for testing, with independent read and write failure switches
    #[derive(Debug, Default)]
    pub struct MockStore {
        entries: Mutex<BTreeMap<String, String>>,
        read_error: Mutex<Option<String>>,
        write_error: Mutex<Option<String>>,
        puts: AtomicUsize,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(self, key: &str, value: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            self
        }

        pub fn with_read_error(self, error: impl Into<String>) -> Self {
            *self.read_error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn with_write_error(self, error: impl Into<String>) -> Self {
            *self.write_error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn entry(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        pub fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }

        pub fn put_count(&self) -> usize {
            self.puts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Store for MockStore {
        async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
            if let Some(error) = self.read_error.lock().unwrap().clone() {
                return Err(DomainError::store(error));
            }

            Ok(self.entry(key))
        }

        async fn put(&self, key: &str, value: &str) -> Result<(), DomainError> {
            if let Some(error) = self.write_error.lock().unwrap().clone() {
                return Err(DomainError::store(error));
            }

            self.puts.fetch_add(1, Ordering::SeqCst);
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn list_keys(&self, params: &ListKeys) -> Result<KeyPage, DomainError> {
            if let Some(error) = self.read_error.lock().unwrap().clone() {
                return Err(DomainError::store(error));
            }

            let keys = self
                .entries
                .lock()
                .unwrap()
                .keys()
                .filter(|k| params.prefix.as_deref().is_none_or(|p| k.starts_with(p)))
                .cloned()
                .collect();

            Ok(KeyPage::complete(keys))
        }

        fn backend_name(&self) -> &'static str {
            "mock"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_store_put_get() {
            let store = MockStore::new();
            store.put("key1", "value1").await.unwrap();

            let result = store.get("key1").await.unwrap();
            assert_eq!(result, Some("value1".to_string()));
            assert_eq!(store.put_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_store_read_error() {
            let store = MockStore::new().with_read_error("boom");
            assert!(store.get("key").await.is_err());
        }

        #[tokio::test]
        async fn test_mock_store_write_error() {
            let store = MockStore::new().with_write_error("boom");
            assert!(store.put("key", "value").await.is_err());
            assert_eq!(store.len(), 0);
        }
    }
}
