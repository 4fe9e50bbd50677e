use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Generation backend error: status {status}")]
    GenerationBackend { status: u16, body: String },

    #[error("Generation transport error: {message}")]
    GenerationTransport { message: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Malformed pattern: {message}")]
    MalformedPattern { message: String },

    #[error("Unknown pattern type: {}", pattern_type.as_deref().unwrap_or("<missing>"))]
    UnknownPatternType { pattern_type: Option<String> },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn generation_backend(status: u16, body: impl Into<String>) -> Self {
        Self::GenerationBackend {
            status,
            body: body.into(),
        }
    }

    pub fn generation_transport(message: impl Into<String>) -> Self {
        Self::GenerationTransport {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn malformed_pattern(message: impl Into<String>) -> Self {
        Self::MalformedPattern {
            message: message.into(),
        }
    }

    pub fn unknown_pattern_type(pattern_type: Option<&str>) -> Self {
        Self::UnknownPatternType {
            pattern_type: pattern_type.map(str::to_string),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_backend_error_hides_body() {
        let error = DomainError::generation_backend(500, "upstream stack trace");
        assert_eq!(error.to_string(), "Generation backend error: status 500");
    }

    #[test]
    fn test_unknown_pattern_type_error() {
        let error = DomainError::unknown_pattern_type(Some("unknown"));
        assert_eq!(error.to_string(), "Unknown pattern type: unknown");

        let error = DomainError::unknown_pattern_type(None);
        assert_eq!(error.to_string(), "Unknown pattern type: <missing>");
    }

    #[test]
    fn test_store_error() {
        let error = DomainError::store("connection refused");
        assert_eq!(error.to_string(), "Store error: connection refused");
    }
}
