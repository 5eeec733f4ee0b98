/*
[INPUT]:  Error sources (HTTP, API, serialization, transactions)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Linguo adapter
#[derive(Error, Debug)]
pub enum LinguoError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transaction was mined but reverted
    #[error("Transaction {hash} reverted: {reason}")]
    TransactionReverted { hash: String, reason: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    /// Connection timeout
    #[error("Connection timeout after {duration}s")]
    Timeout { duration: u64 },
}

impl LinguoError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LinguoError::Http(_)
                | LinguoError::RateLimit { .. }
                | LinguoError::Timeout { .. }
                | LinguoError::InvalidResponse(_)
        )
    }

    /// Get retry delay in seconds (if retryable)
    pub fn retry_delay(&self) -> Option<u64> {
        match self {
            LinguoError::RateLimit { retry_after } => Some(*retry_after),
            LinguoError::Timeout { .. } => Some(1),
            _ => None,
        }
    }

    /// Check if the failure happened before a response was received
    pub fn is_transport_error(&self) -> bool {
        matches!(self, LinguoError::Http(_) | LinguoError::Timeout { .. })
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        LinguoError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }
}

/// Result type alias for Linguo operations
pub type Result<T> = std::result::Result<T, LinguoError>;
