//! Error types for the completion API layer

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the completion API
///
/// None of these messages reach browser clients; handlers log them and
/// answer with a fixed message.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Upstream rejected our API key (401)
    #[error("Completion API rejected the API key: {0}")]
    AuthenticationError(String),

    /// Any other non-2xx reply, or a request that never got one (status 0)
    #[error("Completion API returned status {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response byte stream broke off or was not UTF-8
    #[error("Response stream failed: {0}")]
    StreamError(String),

    /// A body or stream event that does not match the wire schema
    #[error("Malformed completion API payload: {0}")]
    SerializationError(String),

    /// Rejected locally before any request was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// 429 from upstream
    #[error("Rate limited by completion API{}", retry_hint(retry_after))]
    RateLimitExceeded { retry_after: Option<Duration> },

    /// Failure reported inside an otherwise successful response
    #[error("Response failed ({code}): {message}")]
    ProviderError { code: String, message: String },
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(delay) => format!(", retry after {}s", delay.as_secs()),
        None => String::new(),
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return LlmError::SerializationError(err.to_string());
        }
        LlmError::HttpError {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            body: err.to_string(),
        }
    }
}
