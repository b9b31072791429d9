use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Provider configuration error: {0}")]
    ProviderConfiguration(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// The request could not be encoded; no network attempt was made.
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Connection, timeout or mid-stream read failure.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Request cancelled")]
    Cancelled,

    /// The backend rejected the call, either with a non-success status or an
    /// `error` field inside a decoded response. `message` is the raw payload.
    #[error("API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: BoxError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_surfaces_raw_payload() {
        let err = LlmError::Api {
            message: "model not found".to_string(),
            status_code: Some(500),
        };

        assert_eq!(err.to_string(), "API error: model not found");
    }

    #[test]
    fn cancellation_has_fixed_message() {
        assert_eq!(LlmError::Cancelled.to_string(), "Request cancelled");
    }

    #[test]
    fn parse_error_preserves_source() {
        let source = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err = LlmError::Parse {
            message: "Failed to decode stream record".to_string(),
            source: Box::new(source),
        };

        assert!(std::error::Error::source(&err).is_some());
    }
}
