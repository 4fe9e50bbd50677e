//! Domain layer - Core business logic and entities

pub mod cache;
pub mod error;
pub mod generator;
pub mod llm;
pub mod pattern;
pub mod router;

pub use cache::{
    derive_key, CacheKey, CacheOutcome, CachedValue, KeyPage, ListKeys, ResponseCache,
    ResponseCacheConfig, Store,
};
pub use error::DomainError;
pub use generator::{CairnGenerator, Generator, GeneratorRegistry, PromenadeGenerator};
pub use llm::{GenerationBackend, GenerationEnvelope, GenerationRequest, Usage};
pub use pattern::{Pattern, PatternRequest};
pub use router::{PatternRouter, RoutedResponse};
