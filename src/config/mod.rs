//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheSettings, CorsConfig, DebugConfig, GenerationConfig, LogFormat,
    LoggingConfig, MetricsConfig, ServerConfig, StoreSettings, API_KEY_FALLBACK_ENV,
};
