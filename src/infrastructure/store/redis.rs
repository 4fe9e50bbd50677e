//! Redis store implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::cache::{KeyPage, ListKeys, Store};
use crate::domain::DomainError;

/// Configuration for the Redis store
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Connection timeout
    pub connection_timeout: Duration,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisStoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// Redis-backed store.
///
/// Values are written with plain `SET` and never expire. Listing walks the
/// keyspace with `SCAN`, so the cursor is the Redis scan cursor.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    config: RedisStoreConfig,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisStore {
    pub async fn new(config: RedisStoreConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::store(format!("Failed to create Redis client: {}", e)))?;

        let connection = tokio::time::timeout(
            config.connection_timeout,
            ConnectionManager::new(client),
        )
        .await
        .map_err(|_| {
            DomainError::store(format!(
                "Timed out connecting to Redis after {:?}",
                config.connection_timeout
            ))
        })?
        .map_err(|e| DomainError::store(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    pub async fn with_url(url: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(RedisStoreConfig::new(url)).await
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    fn strip_prefix(&self, key: String) -> String {
        match &self.config.key_prefix {
            Some(prefix) => key
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix(':'))
                .map(str::to_string)
                .unwrap_or(key),
            None => key,
        }
    }

    fn match_pattern(&self, prefix: Option<&str>) -> String {
        let escaped_prefix = self
            .config
            .key_prefix
            .as_deref()
            .map(|p| format!("{}:", escape_glob(p)))
            .unwrap_or_default();

        format!(
            "{}{}*",
            escaped_prefix,
            prefix.map(escape_glob).unwrap_or_default()
        )
    }
}

/// Escapes Redis glob metacharacters; cache keys contain brackets
fn escape_glob(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

#[async_trait]
impl Store for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let result: Option<String> = conn.get(&prefixed_key).await.map_err(|e| {
            DomainError::store(format!("Failed to get key '{}': {}", key, e))
        })?;

        Ok(result)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let _: () = conn
            .set(&prefixed_key, value)
            .await
            .map_err(|e| DomainError::store(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn list_keys(&self, params: &ListKeys) -> Result<KeyPage, DomainError> {
        let cursor: u64 = match params.cursor.as_deref() {
            Some(c) => c
                .parse()
                .map_err(|_| DomainError::store(format!("Invalid scan cursor '{}'", c)))?,
            None => 0,
        };

        let pattern = self.match_pattern(params.prefix.as_deref());
        let mut conn = self.connection.clone();

        let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(&pattern)
            .arg("COUNT")
            .arg(params.limit)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                DomainError::store(format!("Failed to scan keys with pattern '{}': {}", pattern, e))
            })?;

        let keys = keys.into_iter().map(|k| self.strip_prefix(k)).collect();

        if next_cursor == 0 {
            Ok(KeyPage::complete(keys))
        } else {
            Ok(KeyPage::partial(keys, next_cursor.to_string()))
        }
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests require a running Redis instance
    // Run with: cargo test -- --ignored

    fn get_test_config() -> RedisStoreConfig {
        RedisStoreConfig::new("redis://127.0.0.1:6379").with_key_prefix("cairn-test")
    }

    #[test]
    fn test_escape_glob() {
        assert_eq!(escape_glob("[cairn]0.12::0.87"), "\\[cairn\\]0.12::0.87");
        assert_eq!(escape_glob("a*b?c\\d"), "a\\*b\\?c\\\\d");
        assert_eq!(escape_glob("plain"), "plain");
    }

    #[test]
    fn test_config_builder() {
        let config = RedisStoreConfig::new("redis://localhost")
            .with_key_prefix("patterns")
            .with_connection_timeout(Duration::from_secs(1));

        assert_eq!(config.url, "redis://localhost");
        assert_eq!(config.key_prefix, Some("patterns".to_string()));
        assert_eq!(config.connection_timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_put_and_get() {
        let store = RedisStore::new(get_test_config()).await.unwrap();

        store.put("[cairn]0.12::0.87", "value1").await.unwrap();

        let result = store.get("[cairn]0.12::0.87").await.unwrap();
        assert_eq!(result, Some("value1".to_string()));
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_get_missing() {
        let store = RedisStore::new(get_test_config()).await.unwrap();

        let result = store.get("[cairn]missing").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_list_keys_strips_prefix() {
        let store = RedisStore::new(get_test_config()).await.unwrap();

        store.put("[promenade]0.40::0.60", "gift").await.unwrap();

        let mut keys = Vec::new();
        let mut params = ListKeys::new().with_prefix("[promenade]");

        loop {
            let page = store.list_keys(&params).await.unwrap();
            keys.extend(page.keys);

            match page.cursor {
                Some(cursor) => params = params.with_cursor(cursor),
                None => break,
            }
        }

        assert!(keys.contains(&"[promenade]0.40::0.60".to_string()));
        assert!(keys.iter().all(|k| k.starts_with("[promenade]")));
    }
}
