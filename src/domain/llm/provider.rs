use async_trait::async_trait;
use std::fmt::Debug;

use super::{GenerationEnvelope, GenerationRequest};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Capability for producing text from a system role and a user prompt
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GenerationBackend: Send + Sync + Debug {
    /// Sends one generation request.
    ///
    /// A non-success response fails with `DomainError::GenerationBackend`
    /// carrying the status and body.
    async fn generate(&self, request: GenerationRequest)
        -> Result<GenerationEnvelope, DomainError>;

    /// Get the backend name
    fn backend_name(&self) -> &'static str;
}
