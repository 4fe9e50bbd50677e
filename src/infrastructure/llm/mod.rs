//! Generation backend implementations

mod anthropic;
mod http_client;

pub use anthropic::{
    AnthropicBackend, DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_ANTHROPIC_MODEL, DEFAULT_MAX_TOKENS,
};
pub use http_client::{HttpClient, HttpClientTrait, HttpResponse};
