//! Generator domain - named strategies producing one flavor of artifact

mod cairn;
mod promenade;
mod registry;

pub use cairn::CairnGenerator;
pub use promenade::PromenadeGenerator;
pub use registry::GeneratorRegistry;

use std::fmt::Debug;
use std::time::Instant;

use async_trait::async_trait;
use tracing::info;

use crate::domain::cache::{CachedValue, ResponseCache};
use crate::domain::llm::{GenerationBackend, GenerationRequest, Usage};
use crate::domain::pattern::Pattern;
use crate::domain::DomainError;

/// A named response strategy sharing the pattern cache protocol.
///
/// Implementors supply the namespace, persona and prompt template; `invoke`
/// and `respond` are shared.
#[async_trait]
pub trait Generator: Send + Sync + Debug {
    /// Identifier used in cache keys and as the dispatch discriminator
    fn namespace(&self) -> &str;

    /// Persona sent as the system role of every generation call
    fn system_role(&self) -> &str;

    /// Substitutes the pattern into this generator's prompt template
    fn build_prompt(&self, pattern: &Pattern) -> String;

    /// Model override for this generator, if any
    fn model(&self) -> Option<&str> {
        None
    }

    /// Calls the backend and returns its raw serialized envelope
    async fn invoke(
        &self,
        pattern: &Pattern,
        backend: &dyn GenerationBackend,
    ) -> Result<String, DomainError> {
        let mut request = GenerationRequest::new(self.system_role(), self.build_prompt(pattern));

        if let Some(model) = self.model() {
            request = request.with_model(model);
        }

        let start = Instant::now();
        let envelope = backend.generate(request).await?;

        info!(
            namespace = %self.namespace(),
            backend = backend.backend_name(),
            id = envelope.id.as_deref().unwrap_or_default(),
            model = envelope.model.as_deref().unwrap_or_default(),
            stop_reason = envelope.stop_reason.as_deref().unwrap_or_default(),
            text_chars = envelope.text.chars().count(),
            output_tokens = envelope.usage.as_ref().map(|u| u.output_tokens).unwrap_or_default(),
            total_tokens = envelope.usage.as_ref().map(Usage::total).unwrap_or_default(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Generated artifact"
        );

        Ok(envelope.into_raw())
    }

    /// Serves the artifact for `pattern`, generating it on a cache miss
    async fn respond(
        &self,
        pattern: &Pattern,
        cache: &ResponseCache,
        backend: &dyn GenerationBackend,
    ) -> Result<CachedValue, DomainError> {
        cache
            .get_or_compute(self.namespace(), pattern, || self.invoke(pattern, backend))
            .await
    }
}

/// Interaction characteristics shared by every prompt template
fn characteristics(pattern: &Pattern) -> String {
    format!(
        "Recent Interaction Pattern: {summary}\n\
         Interaction Characteristics:\n\
         - On a scale of 0 to 1 with 0 being rhythmic and 1 being chaotic, this pattern is {temporal}\n\
         - On a scale of 0 to 1 with 0 being clustered and 1 being scattered, this pattern is {spatial}",
        summary = pattern.summary,
        temporal = pattern.temporal_text(),
        spatial = pattern.spatial_text(),
    )
}
