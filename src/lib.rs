//! Cairn Gateway
//!
//! Edge router for interaction patterns. Each pattern is quantized into a
//! namespaced cache key; a stored artifact is served as-is, otherwise the
//! matching generator asks the generation backend for one and stores it
//! forever.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use config::{GenerationConfig, StoreSettings, API_KEY_FALLBACK_ENV};
use domain::{
    CairnGenerator, DomainError, GenerationBackend, GeneratorRegistry, PatternRouter,
    PromenadeGenerator, ResponseCache, ResponseCacheConfig, Store,
};
use infrastructure::llm::{AnthropicBackend, HttpClient};
use infrastructure::store::{StoreConfig, StoreFactory, StoreType};
use tracing::{info, warn};

/// Create the application state from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let backend = create_generation_backend(&config.generation)?;
    create_app_state_with_backend(config, backend).await
}

/// Create the application state around an existing generation backend
pub async fn create_app_state_with_backend(
    config: &AppConfig,
    backend: Arc<dyn GenerationBackend>,
) -> anyhow::Result<AppState> {
    let store = create_store(&config.store).await?;
    info!(backend = store.backend_name(), "Store initialized");

    let mut cache_config = ResponseCacheConfig::default();
    if config.cache.single_flight {
        cache_config = cache_config.with_single_flight();
    }
    let cache = ResponseCache::with_config(store.clone(), cache_config);

    let registry = create_generator_registry(&config.generation);
    info!(namespaces = ?registry.namespaces(), "Generators registered");

    let router = PatternRouter::new(Arc::new(registry), Arc::new(cache), backend);

    Ok(AppState::new(Arc::new(router), store).with_debug(config.debug.enabled))
}

/// Anthropic backend with the configured key, endpoint, model and timeout
pub fn create_generation_backend(
    config: &GenerationConfig,
) -> Result<Arc<dyn GenerationBackend>, DomainError> {
    let api_key = config.resolve_api_key().ok_or_else(|| {
        DomainError::configuration(format!(
            "No generation API key: set generation.api_key or {}",
            API_KEY_FALLBACK_ENV
        ))
    })?;

    let client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;

    let backend = AnthropicBackend::with_base_url(client, api_key, &config.base_url)
        .with_model(&config.model)
        .with_max_tokens(config.max_tokens);

    info!(
        base_url = %config.base_url,
        model = %config.model,
        max_tokens = config.max_tokens,
        "Generation backend initialized"
    );

    Ok(Arc::new(backend))
}

/// Built-in generators with per-namespace model overrides applied
pub fn create_generator_registry(config: &GenerationConfig) -> GeneratorRegistry {
    let mut cairn = CairnGenerator::new();
    let mut promenade = PromenadeGenerator::new();

    for (namespace, model) in &config.models {
        match namespace.as_str() {
            CairnGenerator::NAMESPACE => cairn = cairn.with_model(model),
            PromenadeGenerator::NAMESPACE => promenade = promenade.with_model(model),
            _ => warn!(namespace = %namespace, "Ignoring model override for unknown namespace"),
        }
    }

    GeneratorRegistry::new()
        .with_generator(cairn)
        .with_generator(promenade)
}

pub async fn create_store(settings: &StoreSettings) -> Result<Arc<dyn Store>, DomainError> {
    let store_type: StoreType = settings.store_type.parse()?;

    let config = StoreConfig {
        store_type,
        redis_url: settings.redis_url.clone(),
        key_prefix: settings.key_prefix.clone(),
        max_capacity: settings.max_capacity,
        connection_timeout: None,
    };

    StoreFactory::new().create(&config).await
}
