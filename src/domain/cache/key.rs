//! Cache key derivation for patterns

use std::fmt;

use crate::domain::pattern::{to_fixed, Pattern};

/// Fractional digits kept per coordinate when quantizing
pub const COORDINATE_PRECISION: usize = 2;

const COORDINATE_SEPARATOR: &str = "::";

/// A cache key derived from a generator namespace and a quantized pattern.
///
/// Rendered as `[namespace]temporal::spatial`, e.g. `[cairn]0.12::0.87`.
/// The summary never takes part in the key, so samples that quantize to the
/// same cell share one cached artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    key: String,
}

impl CacheKey {
    pub fn derive(namespace: &str, pattern: &Pattern) -> Self {
        let temporal = to_fixed(pattern.temporal_value(), COORDINATE_PRECISION);
        let spatial = to_fixed(pattern.spatial_value(), COORDINATE_PRECISION);

        Self {
            key: format!(
                "{}{}{}{}",
                namespace_prefix(namespace),
                temporal,
                COORDINATE_SEPARATOR,
                spatial
            ),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn into_string(self) -> String {
        self.key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

/// Derives the cache key string for `pattern` under `namespace`
pub fn derive_key(namespace: &str, pattern: &Pattern) -> String {
    CacheKey::derive(namespace, pattern).into_string()
}

/// The leading `[namespace]` segment shared by every key of a generator
pub fn namespace_prefix(namespace: &str) -> String {
    format!("[{}]", namespace)
}
