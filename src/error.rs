//! Error Types
//!
//! Every failure the client can report falls into one of four kinds:
//! validation (before any I/O), transport, protocol, and upstream API errors.
//! Graceful end of a stream is not an error and is reported as `Ok(None)`.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Main error type for client operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was rejected before it was sent
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Client configuration is missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network, connection, cancellation or deadline failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response was received but its framing was not understood
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A well-framed payload was not valid JSON for the expected type
    #[error("Failed to decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        /// The payload that failed to decode (truncated)
        body: String,
    },

    /// The upstream service answered with an error envelope
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// An error payload arrived in-band on an event stream
    #[error("Stream error: {raw}")]
    Stream {
        /// The frame payload exactly as received
        raw: String,
        /// The decoded envelope, when the payload was a valid one
        error: Option<ApiError>,
    },
}

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Protocol,
    Api,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) | Error::Config(_) => ErrorKind::Validation,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Protocol(_) | Error::Decode { .. } => ErrorKind::Protocol,
            Error::Api(_) => ErrorKind::Api,
            Error::Stream { error: Some(_), .. } => ErrorKind::Api,
            Error::Stream { error: None, .. } => ErrorKind::Protocol,
        }
    }

    /// The upstream error envelope, whether it came from an HTTP status or in-band
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            Error::Stream { error, .. } => error.as_ref(),
            _ => None,
        }
    }

    /// Whether the operation was aborted through its cancellation token
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Transport(TransportError::Cancelled))
    }

    /// Whether the operation ran past its deadline
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Transport(err) => err.is_timeout(),
            _ => false,
        }
    }

    pub(crate) fn decode(source: serde_json::Error, body: &[u8]) -> Self {
        let body = String::from_utf8_lossy(&body[..body.len().min(500)]).into_owned();
        Error::Decode { source, body }
    }
}

/// Failures below the protocol layer
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client failed to send the request or read the response
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading the response body failed
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    /// The cancellation token fired
    #[error("request cancelled")]
    Cancelled,

    /// The request deadline elapsed
    #[error("request timed out")]
    TimedOut,

    /// The connection was already released
    #[error("connection already closed")]
    Closed,
}

impl TransportError {
    /// Whether this failure was caused by a deadline
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::TimedOut => true,
            TransportError::Http(err) => err.is_timeout(),
            TransportError::Io(err) => err.kind() == std::io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Error::Transport(TransportError::TimedOut);
        }
        Error::Transport(TransportError::Http(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Transport(TransportError::Io(err))
    }
}

/// Error body returned by the API: `{"error": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// An upstream error, carried verbatim
#[derive(Debug, Clone, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable message
    pub message: String,

    /// Provider error code (number or string, depending on the upstream)
    #[serde(default)]
    pub code: Value,

    /// Extra context such as the raw provider error or moderation reasons
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,

    /// HTTP status the envelope arrived with (absent for in-band errors)
    #[serde(skip)]
    pub status: Option<u16>,
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_envelope() {
        let body = r#"{"error":{"message":"No credits","code":402,"metadata":{"provider_name":"x"}}}"#;
        let resp: ErrorResponse = serde_json::from_str(body).unwrap();
        let err = resp.error.unwrap();

        assert_eq!(err.message, "No credits");
        assert_eq!(err.code, serde_json::json!(402));
        assert_eq!(err.metadata.unwrap()["provider_name"], "x");
        assert_eq!(err.status, None);
    }

    #[test]
    fn test_api_error_string_code() {
        let body = r#"{"error":{"message":"bad","code":"invalid_model"}}"#;
        let resp: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.error.unwrap().code, "invalid_model");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::Validation("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(Error::Config("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(
            Error::Transport(TransportError::Cancelled).kind(),
            ErrorKind::Transport
        );
        assert_eq!(Error::Protocol("x".into()).kind(), ErrorKind::Protocol);

        let bad = serde_json::from_str::<Value>("{").unwrap_err();
        assert_eq!(Error::decode(bad, b"{").kind(), ErrorKind::Protocol);

        let stream = Error::Stream {
            raw: "{\"error\":1}".into(),
            error: None,
        };
        assert_eq!(stream.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn test_display_carries_message() {
        let err = Error::Api(ApiError {
            message: "invalid request".into(),
            code: Value::Null,
            metadata: None,
            status: Some(400),
        });
        assert_eq!(err.to_string(), "API error: invalid request");
        assert_eq!(err.api_error().unwrap().status, Some(400));
    }

    #[test]
    fn test_cancel_and_timeout_flags() {
        assert!(Error::Transport(TransportError::Cancelled).is_cancelled());
        assert!(Error::Transport(TransportError::TimedOut).is_timeout());

        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert!(Error::from(io).is_timeout());
        assert!(!Error::Protocol("x".into()).is_timeout());
    }
}
