/*
[INPUT]:  Error sources (HTTP transport, status, JSON decoding, broker payloads, arguments)
[OUTPUT]: Structured error types grouped into failure kinds
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the AllCash adapter
#[derive(Error, Debug)]
pub enum AllcashError {
    /// HTTP request failed before a response arrived (connect, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },

    /// Response body is not a JSON object
    #[error("Invalid JSON response: {message}")]
    Decode { message: String, body: String },

    /// Broker reported an `error` field in an otherwise valid response
    #[error("API error: {message}")]
    Broker { message: String },

    /// Caller supplied something the client refuses to send
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Response decoded but lacks a field the operation needs
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Base URL or a request URL could not be parsed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Client construction failed
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse failure classification callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Decode,
    Broker,
    InvalidArgument,
    InvalidResponse,
    Config,
}

impl AllcashError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AllcashError::Http(_) | AllcashError::HttpStatus { .. } => ErrorKind::Transport,
            AllcashError::Decode { .. } => ErrorKind::Decode,
            AllcashError::Broker { .. } => ErrorKind::Broker,
            AllcashError::InvalidArgument(_) | AllcashError::Serialization(_) => {
                ErrorKind::InvalidArgument
            }
            AllcashError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            AllcashError::Config(_) | AllcashError::UrlParse(_) => ErrorKind::Config,
        }
    }

    /// Check if the error came from the HTTP layer
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AllcashError::HttpStatus { status, .. } => Some(*status),
            AllcashError::Http(err) => err.status(),
            _ => None,
        }
    }

    /// Create a status error from status code and raw body
    pub fn http_status(status: StatusCode, body: impl Into<String>) -> Self {
        AllcashError::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Build a broker error from the value of the `error` field.
    ///
    /// Strings are used as-is; anything else is rendered as compact JSON.
    pub fn broker(value: &serde_json::Value) -> Self {
        let message = match value {
            serde_json::Value::String(message) => message.clone(),
            other => other.to_string(),
        };
        AllcashError::Broker { message }
    }
}

/// Result type alias for AllCash operations
pub type Result<T> = std::result::Result<T, AllcashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let status_err = AllcashError::http_status(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(status_err.kind(), ErrorKind::Transport);
        assert!(status_err.is_transport());
        assert_eq!(status_err.status(), Some(StatusCode::BAD_GATEWAY));

        let arg_err = AllcashError::InvalidArgument("empty symbol".to_string());
        assert_eq!(arg_err.kind(), ErrorKind::InvalidArgument);
        assert!(!arg_err.is_transport());
        assert_eq!(arg_err.status(), None);

        let url_err: AllcashError = url::Url::parse("no scheme").unwrap_err().into();
        assert_eq!(url_err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_status_error_display_carries_body() {
        let err = AllcashError::http_status(StatusCode::UNAUTHORIZED, r#"{"detail":"bad token"}"#);
        let rendered = err.to_string();
        assert!(rendered.contains("401"));
        assert!(rendered.contains("bad token"));
    }

    #[test]
    fn test_broker_error_message() {
        let err = AllcashError::broker(&serde_json::json!("insufficient funds"));
        match err {
            AllcashError::Broker { ref message } => assert_eq!(message, "insufficient funds"),
            _ => panic!("Expected Broker error variant"),
        }
        assert_eq!(err.to_string(), "API error: insufficient funds");

        let nested = AllcashError::broker(&serde_json::json!({"code": 7}));
        assert_eq!(nested.to_string(), r#"API error: {"code":7}"#);
    }
}
