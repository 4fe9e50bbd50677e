//! Cache domain - pattern keys, the store abstraction and get-or-compute

mod key;
mod response_cache;
mod store;

pub use key::{derive_key, namespace_prefix, CacheKey, COORDINATE_PRECISION};
pub use response_cache::{CacheOutcome, CachedValue, ResponseCache, ResponseCacheConfig};
pub use store::{KeyPage, ListKeys, Store};

#[cfg(test)]
pub use store::mock::MockStore;
