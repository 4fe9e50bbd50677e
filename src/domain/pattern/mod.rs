//! Pattern domain - the normalized description of an interaction sample

mod quantize;

pub use quantize::{parse_coordinate, to_fixed};

use serde::{Deserialize, Deserializer, Serialize};

/// A quantizable sample of user interaction.
///
/// Coordinates are carried as their wire text. They are only interpreted as
/// numbers when a cache key is derived, so prompts see exactly what the
/// client sent. An absent coordinate is `None` and quantizes to `NaN`; an
/// explicit `null` is empty text and quantizes to `0.00`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    /// 0 = rhythmic, 1 = chaotic
    #[serde(
        default,
        deserialize_with = "coordinate",
        skip_serializing_if = "Option::is_none"
    )]
    pub temporal: Option<String>,
    /// 0 = clustered, 1 = scattered
    #[serde(
        default,
        alias = "spacial",
        deserialize_with = "coordinate",
        skip_serializing_if = "Option::is_none"
    )]
    pub spatial: Option<String>,
    #[serde(default)]
    pub summary: String,
    /// Selects the generator that handles this pattern
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub pattern_type: Option<String>,
}

impl Pattern {
    pub fn new(
        pattern_type: impl Into<String>,
        temporal: impl Into<String>,
        spatial: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            temporal: Some(temporal.into()),
            spatial: Some(spatial.into()),
            summary: summary.into(),
            pattern_type: Some(pattern_type.into()),
        }
    }

    /// Wire text of the temporal coordinate, empty when absent
    pub fn temporal_text(&self) -> &str {
        self.temporal.as_deref().unwrap_or_default()
    }

    pub fn spatial_text(&self) -> &str {
        self.spatial.as_deref().unwrap_or_default()
    }

    pub fn temporal_value(&self) -> f64 {
        coordinate_value(self.temporal.as_deref())
    }

    pub fn spatial_value(&self) -> f64 {
        coordinate_value(self.spatial.as_deref())
    }
}

/// Inbound request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRequest {
    pub pattern: Pattern,
    /// Read from the wire but not used for dispatch or keying
    #[serde(
        rename = "sessionToken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub session_token: Option<String>,
}

impl PatternRequest {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

fn coordinate_value(text: Option<&str>) -> f64 {
    text.map_or(f64::NAN, parse_coordinate)
}

/// Accepts a coordinate as a JSON string or number; `null` becomes empty text.
fn coordinate<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Ok(Some(text)),
        serde_json::Value::Number(number) => Ok(Some(number.to_string())),
        serde_json::Value::Null => Ok(Some(String::new())),
        other => Err(D::Error::custom(format!(
            "coordinate must be a string or number, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
