use serde::{Deserialize, Serialize};

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Result of a generation call.
///
/// `raw` is the backend's serialized response exactly as received; it is what
/// gets cached and returned to callers. The remaining fields are the parts of
/// the envelope this service reads for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationEnvelope {
    pub raw: String,
    pub id: Option<String>,
    pub model: Option<String>,
    pub text: String,
    pub stop_reason: Option<String>,
    pub usage: Option<Usage>,
}

impl GenerationEnvelope {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            id: None,
            model: None,
            text: String::new(),
            stop_reason: None,
            usage: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_stop_reason(mut self, reason: impl Into<String>) -> Self {
        self.stop_reason = Some(reason.into());
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn into_raw(self) -> String {
        self.raw
    }
}
