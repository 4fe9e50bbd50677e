//! Dispatch of inbound pattern requests to generators

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::cache::{CacheOutcome, ResponseCache};
use crate::domain::generator::GeneratorRegistry;
use crate::domain::llm::GenerationBackend;
use crate::domain::pattern::PatternRequest;
use crate::domain::DomainError;

/// The artifact served for a routed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedResponse {
    pub namespace: String,
    pub key: String,
    /// Raw generation envelope, exactly as stored
    pub body: String,
    pub outcome: CacheOutcome,
}

/// Stateless dispatcher from `pattern.type` to the matching generator.
///
/// All state lives in the store behind the response cache.
#[derive(Debug, Clone)]
pub struct PatternRouter {
    registry: Arc<GeneratorRegistry>,
    cache: Arc<ResponseCache>,
    backend: Arc<dyn GenerationBackend>,
}

impl PatternRouter {
    pub fn new(
        registry: Arc<GeneratorRegistry>,
        cache: Arc<ResponseCache>,
        backend: Arc<dyn GenerationBackend>,
    ) -> Self {
        Self {
            registry,
            cache,
            backend,
        }
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub async fn route(&self, request: &PatternRequest) -> Result<RoutedResponse, DomainError> {
        let pattern_type = request.pattern.pattern_type.as_deref();

        let generator = self.registry.resolve(pattern_type).inspect_err(|_| {
            warn!(
                pattern_type = pattern_type.unwrap_or("<missing>"),
                known = ?self.registry.namespaces(),
                "No generator for pattern type"
            );
        })?;

        debug!(
            namespace = %generator.namespace(),
            temporal = request.pattern.temporal_text(),
            spatial = request.pattern.spatial_text(),
            "Routing pattern"
        );

        let cached = generator
            .respond(&request.pattern, &self.cache, self.backend.as_ref())
            .await?;

        Ok(RoutedResponse {
            namespace: generator.namespace().to_string(),
            key: cached.key,
            body: cached.value,
            outcome: cached.outcome,
        })
    }
}
