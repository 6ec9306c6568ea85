use thiserror::Error;

#[derive(Debug, Error)]
pub enum CreditoError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Transport error from {source_name}: {reason}")]
    Transport { source_name: String, reason: String },

    #[error("{source_name} answered HTTP {status}")]
    HttpStatus { source_name: String, status: u16 },

    #[error("Malformed response from {source_name}: {reason}")]
    Malformed { source_name: String, reason: String },

    #[error("No usable rate value from {0}")]
    NoUsableValue(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CreditoError {
    fn from(e: serde_json::Error) -> Self {
        CreditoError::SerializationError(e.to_string())
    }
}

impl CreditoError {
    /// Attach the name of the rate source to a reqwest failure.
    #[cfg(feature = "http")]
    pub(crate) fn from_http(source_name: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return CreditoError::Timeout(source_name.to_string());
        }
        if let Some(status) = e.status() {
            return CreditoError::HttpStatus {
                source_name: source_name.to_string(),
                status: status.as_u16(),
            };
        }
        CreditoError::Transport {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        }
    }
}
