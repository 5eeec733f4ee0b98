/*
[INPUT]:  Adapter errors, cancellation, chain failures
[OUTPUT]: Cloneable error taxonomy carried by rejected actions and stored per entry
[POS]:    Error handling layer - workflow/reducer error types
[UPDATE]: When adding new failure kinds surfaced to the store
*/

use linguo_adapter::LinguoError;
use serde::Serialize;
use thiserror::Error;

/// Failure carried by a rejected lifecycle action.
///
/// Cancellation is not a real failure: reducers reset the entry to idle
/// and nothing is surfaced to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "name")]
pub enum ActionError {
    /// Superseded by a newer request for the same key
    #[error("request cancelled by a newer request")]
    #[serde(rename = "CancellationError")]
    Cancellation,

    /// Transaction reverted, failed or never mined
    #[error("transaction failed: {message}")]
    #[serde(rename = "ChainError")]
    Chain {
        tx_hash: Option<String>,
        message: String,
    },

    /// Transport level failure while reading
    #[error("network error: {message}")]
    #[serde(rename = "NetworkError")]
    Network { message: String },

    /// Backend answered with an error
    #[error("API error: {message}")]
    #[serde(rename = "ApiError")]
    Api { code: Option<i32>, message: String },
}

impl ActionError {
    pub fn name(&self) -> &'static str {
        match self {
            ActionError::Cancellation => "CancellationError",
            ActionError::Chain { .. } => "ChainError",
            ActionError::Network { .. } => "NetworkError",
            ActionError::Api { .. } => "ApiError",
        }
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, ActionError::Cancellation)
    }

    pub fn chain(tx_hash: Option<String>, message: impl Into<String>) -> Self {
        ActionError::Chain {
            tx_hash,
            message: message.into(),
        }
    }
}

impl From<LinguoError> for ActionError {
    fn from(err: LinguoError) -> Self {
        match err {
            LinguoError::TransactionReverted { hash, reason } => ActionError::Chain {
                tx_hash: Some(hash),
                message: reason,
            },
            LinguoError::Api { code, message } => ActionError::Api {
                code: Some(code),
                message,
            },
            err if err.is_transport_error() => ActionError::Network {
                message: err.to_string(),
            },
            err => ActionError::Api {
                code: None,
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names() {
        assert_eq!(ActionError::Cancellation.name(), "CancellationError");
        assert!(ActionError::Cancellation.is_cancellation());
        assert!(!ActionError::chain(None, "reverted").is_cancellation());
    }

    #[test]
    fn test_from_linguo_error() {
        let timeout: ActionError = LinguoError::Timeout { duration: 30 }.into();
        assert_eq!(timeout.name(), "NetworkError");

        let api: ActionError = LinguoError::Api {
            code: 500,
            message: "boom".into(),
        }
        .into();
        assert_eq!(
            api,
            ActionError::Api {
                code: Some(500),
                message: "boom".into()
            }
        );

        let reverted: ActionError = LinguoError::TransactionReverted {
            hash: "0x01".into(),
            reason: "out of gas".into(),
        }
        .into();
        assert_eq!(reverted.name(), "ChainError");

        let missing: ActionError = LinguoError::NotFound("/api/tasks/1/dispute".into()).into();
        assert_eq!(missing.name(), "ApiError");
    }

    #[test]
    fn test_serialized_name_tag() {
        let json = serde_json::to_value(ActionError::Cancellation).unwrap();
        assert_eq!(json["name"], "CancellationError");
    }
}
