//! Get-or-compute orchestration over the store

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

use super::key::CacheKey;
use super::store::Store;
use crate::domain::pattern::Pattern;
use crate::domain::DomainError;

/// Whether a value came from the store or was freshly computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
}

impl CacheOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }
}

/// A value served by the response cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedValue {
    pub key: String,
    pub value: String,
    pub outcome: CacheOutcome,
}

/// Configuration for the response cache
#[derive(Debug, Clone, Default)]
pub struct ResponseCacheConfig {
    /// Serialize misses per key so at most one computation runs per key
    pub single_flight: bool,
}

impl ResponseCacheConfig {
    pub fn with_single_flight(mut self) -> Self {
        self.single_flight = true;
        self
    }
}

/// Cache of generated artifacts keyed by quantized pattern.
///
/// Hits return the stored value untouched. Misses run the supplied
/// computation and persist its result before returning it; a failed
/// computation writes nothing. Store failures propagate without retry.
#[derive(Debug)]
pub struct ResponseCache {
    store: Arc<dyn Store>,
    config: ResponseCacheConfig,
    in_flight: InFlightTable,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_config(store, ResponseCacheConfig::default())
    }

    pub fn with_config(store: Arc<dyn Store>, config: ResponseCacheConfig) -> Self {
        Self {
            store,
            config,
            in_flight: InFlightTable::default(),
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Returns the cached value for `pattern` under `namespace`, computing and
    /// storing it on a miss
    pub async fn get_or_compute<F, Fut>(
        &self,
        namespace: &str,
        pattern: &Pattern,
        compute: F,
    ) -> Result<CachedValue, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, DomainError>>,
    {
        let key = CacheKey::derive(namespace, pattern);

        if let Some(value) = self.store.get(key.as_str()).await? {
            debug!(key = %key, "Cache hit");
            return Ok(hit(key, value));
        }

        if !self.config.single_flight {
            return self.compute_and_store(key, compute).await;
        }

        let _permit = self.in_flight.acquire(key.as_str()).await;

        // Another request may have filled the key while we waited
        if let Some(value) = self.store.get(key.as_str()).await? {
            debug!(key = %key, "Cache hit after waiting on in-flight generation");
            return Ok(hit(key, value));
        }

        self.compute_and_store(key, compute).await
    }

    async fn compute_and_store<F, Fut>(
        &self,
        key: CacheKey,
        compute: F,
    ) -> Result<CachedValue, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, DomainError>>,
    {
        debug!(key = %key, "Cache miss, computing value");

        let value = compute().await?;
        self.store.put(key.as_str(), &value).await?;

        debug!(key = %key, bytes = value.len(), "Stored computed value");

        Ok(CachedValue {
            key: key.into_string(),
            value,
            outcome: CacheOutcome::Miss,
        })
    }
}

fn hit(key: CacheKey, value: String) -> CachedValue {
    CachedValue {
        key: key.into_string(),
        value,
        outcome: CacheOutcome::Hit,
    }
}

/// Per-key async locks for single-flight misses
#[derive(Debug, Default)]
struct InFlightTable {
    locks: Mutex<HashMap<String, InFlightEntry>>,
}

#[derive(Debug, Default)]
struct InFlightEntry {
    lock: Arc<AsyncMutex<()>>,
    /// Permits holding or waiting on `lock`
    holders: usize,
}

impl InFlightTable {
    async fn acquire(&self, key: &str) -> InFlightPermit<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            let entry = locks.entry(key.to_string()).or_default();
            entry.holders += 1;
            entry.lock.clone()
        };

        // Registered before waiting so a cancelled waiter still releases its slot
        let mut permit = InFlightPermit {
            table: self,
            key: key.to_string(),
            guard: None,
        };
        permit.guard = Some(lock.lock_owned().await);
        permit
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

struct InFlightPermit<'a> {
    table: &'a InFlightTable,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        self.guard.take();

        let mut locks = self
            .table
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = locks.get_mut(&self.key) {
            entry.holders = entry.holders.saturating_sub(1);

            if entry.holders == 0 {
                locks.remove(&self.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::store::mock::MockStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn pattern() -> Pattern {
        Pattern::new("cairn", "0.12", "0.87", "brief tap")
    }

    #[tokio::test]
    async fn test_miss_computes_and_stores() {
        let store = Arc::new(MockStore::new());
        let cache = ResponseCache::new(store.clone());

        let result = cache
            .get_or_compute("cairn", &pattern(), || async { Ok("generated".to_string()) })
            .await
            .unwrap();

        assert_eq!(result.outcome, CacheOutcome::Miss);
        assert_eq!(result.value, "generated");
        assert_eq!(result.key, "[cairn]0.12::0.87");
        assert_eq!(store.entry("[cairn]0.12::0.87"), Some("generated".to_string()));
    }

    #[tokio::test]
    async fn test_hit_skips_compute() {
        let store = Arc::new(MockStore::new().with_entry("[cairn]0.12::0.87", "CACHED"));
        let cache = ResponseCache::new(store.clone());
        let calls = AtomicUsize::new(0);

        let result = cache
            .get_or_compute("cairn", &pattern(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("fresh".to_string())
            })
            .await
            .unwrap();

        assert_eq!(result.outcome, CacheOutcome::Hit);
        assert_eq!(result.value, "CACHED");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn test_second_call_returns_stored_value_verbatim() {
        let store = Arc::new(MockStore::new());
        let cache = ResponseCache::new(store.clone());
        let envelope = r#"{"id":"msg_1","content":[{"type":"text","text":"ü ∞"}]}"#;

        let first = cache
            .get_or_compute("cairn", &pattern(), || async { Ok(envelope.to_string()) })
            .await
            .unwrap();
        let second = cache
            .get_or_compute("cairn", &pattern(), || async {
                Ok("should not be used".to_string())
            })
            .await
            .unwrap();

        assert_eq!(first.outcome, CacheOutcome::Miss);
        assert_eq!(second.outcome, CacheOutcome::Hit);
        assert_eq!(second.value.as_bytes(), envelope.as_bytes());
    }

    #[tokio::test]
    async fn test_compute_failure_writes_nothing() {
        let store = Arc::new(MockStore::new());
        let cache = ResponseCache::new(store.clone());

        let result = cache
            .get_or_compute("cairn", &pattern(), || async {
                Err(DomainError::generation_backend(500, "overloaded"))
            })
            .await;

        assert!(matches!(
            result,
            Err(DomainError::GenerationBackend { status: 500, .. })
        ));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_store_read_failure_propagates_without_compute() {
        let store = Arc::new(MockStore::new().with_read_error("unreachable"));
        let cache = ResponseCache::new(store);
        let calls = AtomicUsize::new(0);

        let result = cache
            .get_or_compute("cairn", &pattern(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("fresh".to_string())
            })
            .await;

        assert!(matches!(result, Err(DomainError::Store { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_write_failure_propagates() {
        let store = Arc::new(MockStore::new().with_write_error("read only"));
        let cache = ResponseCache::new(store);

        let result = cache
            .get_or_compute("cairn", &pattern(), || async { Ok("fresh".to_string()) })
            .await;

        assert!(matches!(result, Err(DomainError::Store { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_misses_both_compute_by_default() {
        let store = Arc::new(MockStore::new());
        let cache = ResponseCache::new(store.clone());
        let calls = AtomicUsize::new(0);

        let compute = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok("value".to_string())
        };

        let p = pattern();
        let (a, b) = tokio::join!(
            cache.get_or_compute("cairn", &p, compute),
            cache.get_or_compute("cairn", &p, compute)
        );

        assert_eq!(a.unwrap().outcome, CacheOutcome::Miss);
        assert_eq!(b.unwrap().outcome, CacheOutcome::Miss);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.put_count(), 2);
    }

    #[tokio::test]
    async fn test_single_flight_computes_once() {
        let store = Arc::new(MockStore::new());
        let cache = ResponseCache::with_config(
            store.clone(),
            ResponseCacheConfig::default().with_single_flight(),
        );
        let calls = AtomicUsize::new(0);

        let compute = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok("value".to_string())
        };

        let p = pattern();
        let results = futures::future::join_all(
            (0..5).map(|_| cache.get_or_compute("cairn", &p, compute)),
        )
        .await;

        let outcomes: Vec<CacheOutcome> = results.into_iter().map(|r| r.unwrap().outcome).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.put_count(), 1);
        assert_eq!(
            outcomes.iter().filter(|o| **o == CacheOutcome::Miss).count(),
            1
        );
        assert_eq!(cache.in_flight.len(), 0);
    }

    #[tokio::test]
    async fn test_single_flight_releases_lock_after_failure() {
        let store = Arc::new(MockStore::new());
        let cache = ResponseCache::with_config(
            store.clone(),
            ResponseCacheConfig::default().with_single_flight(),
        );

        let failed = cache
            .get_or_compute("cairn", &pattern(), || async {
                Err(DomainError::generation_transport("timed out"))
            })
            .await;
        assert!(failed.is_err());
        assert_eq!(cache.in_flight.len(), 0);

        let retried = cache
            .get_or_compute("cairn", &pattern(), || async { Ok("value".to_string()) })
            .await
            .unwrap();
        assert_eq!(retried.outcome, CacheOutcome::Miss);
    }

    #[tokio::test]
    async fn test_single_flight_cancelled_waiter_releases_entry() {
        use tokio_test::{assert_pending, assert_ready};

        let store = Arc::new(MockStore::new());
        let cache = ResponseCache::with_config(
            store.clone(),
            ResponseCacheConfig::default().with_single_flight(),
        );
        let p = pattern();
        let (tx, rx) = tokio::sync::oneshot::channel::<String>();

        let mut holder = tokio_test::task::spawn(cache.get_or_compute(
            "cairn",
            &p,
            move || async move {
                rx.await
                    .map_err(|_| DomainError::generation_transport("sender dropped"))
            },
        ));
        assert_pending!(holder.poll());

        let mut waiter = tokio_test::task::spawn(cache.get_or_compute("cairn", &p, || async {
            Ok("unused".to_string())
        }));
        assert_pending!(waiter.poll());
        assert_eq!(cache.in_flight.len(), 1);

        tx.send("value".to_string()).unwrap();
        let stored = assert_ready!(holder.poll()).unwrap();
        assert_eq!(stored.outcome, CacheOutcome::Miss);

        // The waiter is woken but dropped before it takes the lock
        drop(waiter);
        drop(holder);

        assert_eq!(cache.in_flight.len(), 0);
        assert_eq!(store.put_count(), 1);
    }
}
