use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::http_client::HttpClientTrait;
use crate::domain::{DomainError, GenerationBackend, GenerationEnvelope, GenerationRequest, Usage};
use crate::infrastructure::observability::record_generation;

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Generation backend calling the Anthropic messages API
#[derive(Debug)]
pub struct AnthropicBackend<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl<C: HttpClientTrait> AnthropicBackend<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_ANTHROPIC_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            api_key: api_key.into(),
            base_url,
            model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Model used when a request carries no override
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, model: &str, request: &GenerationRequest) -> serde_json::Value {
        serde_json::json!({
            "model": model,
            "max_tokens": request.max_tokens.unwrap_or(self.max_tokens),
            "system": request.system,
            "messages": [AnthropicMessage::user(&request.prompt)],
        })
    }

    /// Reads the fields used for logging. A success status with a body that
    /// is not JSON is a backend error, so it never reaches the cache. Valid
    /// JSON of an unexpected shape is kept verbatim.
    fn parse_envelope(
        &self,
        status: u16,
        raw: String,
    ) -> Result<GenerationEnvelope, DomainError> {
        let value = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => value,
            Err(e) => {
                error!(
                    status,
                    error = %e,
                    body = %raw,
                    "Generation backend returned a non-JSON body"
                );
                return Err(DomainError::generation_backend(status, raw));
            }
        };

        let parsed = match serde_json::from_value::<AnthropicResponse>(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Generation envelope did not match the messages schema");
                return Ok(GenerationEnvelope::new(raw));
            }
        };

        let text = parsed
            .content
            .into_iter()
            .filter(|block| block.content_type == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        let mut envelope = GenerationEnvelope::new(raw).with_text(text);

        if let Some(id) = parsed.id {
            envelope = envelope.with_id(id);
        }

        if let Some(model) = parsed.model {
            envelope = envelope.with_model(model);
        }

        if let Some(reason) = parsed.stop_reason {
            envelope = envelope.with_stop_reason(reason);
        }

        if let Some(usage) = parsed.usage {
            envelope = envelope.with_usage(Usage::new(usage.input_tokens, usage.output_tokens));
        }

        Ok(envelope)
    }
}

#[async_trait]
impl<C: HttpClientTrait> GenerationBackend for AnthropicBackend<C> {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationEnvelope, DomainError> {
        let model = request.model.as_deref().unwrap_or(&self.model).to_string();
        let url = self.messages_url();
        let body = self.build_request(&model, &request);

        let start = Instant::now();
        let result = self.client.post_json(&url, self.headers(), &body).await;
        let duration = start.elapsed();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                record_generation(self.backend_name(), &model, "transport_error", duration);
                error!(model = %model, error = %e, "Generation request failed");
                return Err(e);
            }
        };

        record_generation(
            self.backend_name(),
            &model,
            &response.status.to_string(),
            duration,
        );

        if !response.is_success() {
            error!(
                model = %model,
                status = response.status,
                body = %response.body,
                "Generation backend returned an error"
            );
            return Err(DomainError::generation_backend(response.status, response.body));
        }

        self.parse_envelope(response.status, response.body)
    }

    fn backend_name(&self) -> &'static str {
        "anthropic"
    }
}

// Anthropic API types

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> AnthropicMessage<'a> {
    fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    id: Option<String>,
    model: Option<String>,
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}
