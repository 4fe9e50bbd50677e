//! Generation backend domain models and traits

mod provider;
mod request;
mod response;

pub use provider::GenerationBackend;
pub use request::GenerationRequest;
pub use response::{GenerationEnvelope, Usage};

#[cfg(test)]
pub use provider::MockGenerationBackend;
