use std::io;
use thiserror::Error;

/// Failure of a call to one of the backing services (completion or classification).
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status; `body` is the raw response text.
    #[error("{body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout(err.to_string())
        } else if err.is_connect() {
            ServiceError::Network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            ServiceError::MalformedResponse(err.to_string())
        } else {
            ServiceError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::MalformedResponse(format!("JSON error: {}", err))
    }
}

/// Unified error type for the factchat application
#[derive(Error, Debug)]
pub enum FactChatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// Backing service errors that escaped a turn boundary
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for FactChatError {
    fn from(err: reqwest::Error) -> Self {
        FactChatError::Service(err.into())
    }
}

impl From<serde_json::Error> for FactChatError {
    fn from(err: serde_json::Error) -> Self {
        FactChatError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for FactChatError {
    fn from(err: serde_yml::Error) -> Self {
        FactChatError::Serialization(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_raw_body() {
        let err = ServiceError::Status {
            status: 500,
            body: "{\"error\":\"model not loaded\"}".to_string(),
        };
        assert_eq!(err.to_string(), "{\"error\":\"model not loaded\"}");
    }

    #[test]
    fn service_error_wraps_into_app_error() {
        let err: FactChatError = ServiceError::Timeout("60s elapsed".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Service error: Request timed out: 60s elapsed"
        );
    }
}
