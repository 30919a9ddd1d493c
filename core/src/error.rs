//! Error types for the Aircall client.
//!
//! # Design
//! Every failure is returned to the immediate caller. Client (4xx) and server
//! (5xx) errors keep the numeric status and the status line so callers can
//! match on the code instead of parsing message text; the raw body is kept
//! for debugging.

use thiserror::Error;

/// Errors returned by `AircallClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON. No request was sent.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The client was built with an empty access token. No request was sent.
    #[error("access token is empty")]
    EmptyAccessToken,

    /// No response was obtained (DNS, connect, TLS, I/O).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a status in 400..=499.
    #[error("client error: {status_line}")]
    Client {
        status: u16,
        status_line: String,
        body: Vec<u8>,
    },

    /// The server answered with a status of 500 or above.
    #[error("server error: {status_line}")]
    Server {
        status: u16,
        status_line: String,
        body: Vec<u8>,
    },
}

impl ApiError {
    /// HTTP status for client and server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Client { status, .. } | ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_message_carries_status_line() {
        let err = ApiError::Client {
            status: 404,
            status_line: "404 Not Found".to_string(),
            body: Vec::new(),
        };
        assert_eq!(err.to_string(), "client error: 404 Not Found");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
    }

    #[test]
    fn server_error_message_carries_status_line() {
        let err = ApiError::Server {
            status: 503,
            status_line: "503 Service Unavailable".to_string(),
            body: b"down".to_vec(),
        };
        assert_eq!(err.to_string(), "server error: 503 Service Unavailable");
        assert!(!err.is_not_found());
    }

    #[test]
    fn empty_access_token_message() {
        assert_eq!(ApiError::EmptyAccessToken.to_string(), "access token is empty");
        assert_eq!(ApiError::EmptyAccessToken.status(), None);
    }

    #[test]
    fn serialization_error_has_no_status() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = ApiError::Serialization(source);
        assert_eq!(err.status(), None);
        assert!(err.to_string().starts_with("serialization failed: "));
    }
}
