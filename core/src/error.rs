//! Error types for the Graylog API client.
//!
//! # Design
//! Every adapter failure is an `AdapterError`, tagged by cause so callers can
//! branch on the variant instead of the message. The `Display` text keeps the
//! wording existing log consumers already match on ("Invalid API Response",
//! "Bad JSON in response", "{code}: {reason}").

use crate::http::TransportError;

/// Result type alias for adapter and facade operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors returned by `RestAdapter` and `GraylogApi`.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// No response was obtained: connection refused, DNS, TLS, timeout.
    #[error("Invalid API Response")]
    Transport(#[source] TransportError),

    /// The response body is not valid JSON. Checked before the status code.
    #[error("Bad JSON in response")]
    Decode(#[source] serde_json::Error),

    /// The server answered with a status outside 200..=299.
    #[error("{code}: {reason}")]
    HttpStatus { code: u16, reason: String },

    /// A caller-supplied value was rejected before any request was sent.
    #[error("{0}")]
    InvalidArgument(String),
}

impl AdapterError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// HTTP status code, for `HttpStatus` errors only.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Errors from building an `AdapterConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn messages_keep_legacy_wording() {
        let transport = AdapterError::Transport("connection refused".into());
        assert_eq!(transport.to_string(), "Invalid API Response");

        let decode = AdapterError::Decode(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert_eq!(decode.to_string(), "Bad JSON in response");

        let status = AdapterError::HttpStatus {
            code: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(status.to_string(), "404: Not Found");
        assert_eq!(status.status_code(), Some(404));
    }

    #[test]
    fn transport_error_keeps_its_cause() {
        let err = AdapterError::Transport("connection refused".into());
        assert!(err.is_transport());
        assert_eq!(err.source().unwrap().to_string(), "connection refused");
        assert_eq!(err.status_code(), None);
    }
}
