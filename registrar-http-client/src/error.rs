//! HTTP client error types.

use std::time::Duration;
use thiserror::Error;

/// Result type for HTTP client operations.
pub type Result<T> = std::result::Result<T, HttpClientError>;

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// Every attempt in the retry budget failed.
    #[error("Request failed after {attempts} attempts: {last_error}")]
    RetryExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Error observed on the final attempt.
        #[source]
        last_error: Box<HttpClientError>,
    },

    /// Request timed out.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request building error.
    #[error("Failed to build request: {0}")]
    RequestBuild(String),

    /// The server answered with a status other than 200.
    #[error("Response code {status} from server. Body: \"{body}\"")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Underlying HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl HttpClientError {
    /// Classify a reqwest error raised while sending a request.
    pub(crate) fn from_send(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout)
        } else if error.is_connect() {
            Self::Connection(error.to_string())
        } else if error.is_builder() {
            Self::RequestBuild(error.to_string())
        } else {
            Self::Http(error)
        }
    }

    /// Check if this error is retryable.
    ///
    /// Every single-attempt failure is retryable, including 4xx responses.
    /// Only an exhausted budget is final.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::RetryExhausted { .. })
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_)) || matches!(self, Self::Http(e) if e.is_timeout())
    }

    /// Check if this is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_)) || matches!(self, Self::Http(e) if e.is_connect())
    }

    /// Get the HTTP status code if this is a response error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::RetryExhausted { last_error, .. } => last_error.status_code(),
            _ => None,
        }
    }
}
