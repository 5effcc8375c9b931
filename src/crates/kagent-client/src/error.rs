//! Error types for the kagent REST client

use thiserror::Error;

/// Errors that can occur while talking to the kagent controller
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status code
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code returned by the server
        status: u16,
        /// Message extracted from the error body
        message: String,
        /// Raw response body
        body: String,
    },

    /// The call is user scoped but no user id was given or configured
    #[error("userID is required")]
    MissingUserId,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A successful response carried no `data`
    #[error("Response from {0} has no data")]
    MissingData(String),

    /// Invalid base URL or path
    #[error("Invalid URL: {0}")]
    Url(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Build an API error from a status code and raw body.
    ///
    /// The message is taken from the envelope's `message` field, then from
    /// an `error` field, and falls back to "Request failed".
    pub fn from_response(status: u16, body: String) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Request failed".to_string());

        ClientError::Api {
            status,
            message,
            body,
        }
    }

    /// HTTP status code, when the server produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is a 404 from the server
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_envelope() {
        let err = ClientError::from_response(
            404,
            r#"{"status":false,"message":"Session not found","error":"NotFound"}"#.to_string(),
        );
        match err {
            ClientError::Api { status, message, .. } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Session not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_message_from_error_field() {
        let err = ClientError::from_response(500, r#"{"error":"boom"}"#.to_string());
        assert!(err.to_string().contains("boom"));
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_message_fallback() {
        let err = ClientError::from_response(502, "<html>bad gateway</html>".to_string());
        match err {
            ClientError::Api { message, body, .. } => {
                assert_eq!(message, "Request failed");
                assert!(body.contains("bad gateway"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_is_not_found() {
        assert!(ClientError::from_response(404, String::new()).is_not_found());
        assert!(!ClientError::MissingUserId.is_not_found());
    }
}
