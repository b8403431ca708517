//! Errors surfaced by the REST client.
//!
//! Every variant renders a user-facing message. Variants that correspond to
//! an HTTP outcome expose a status code through [`ApiError::status`]; status
//! 0 means the backend could not be reached at all.

use std::path::PathBuf;

use jurislead_store::StoreError;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, TLS failure and the like.
    #[error("{message}")]
    Unreachable {
        message: String,
        details: Option<Value>,
    },

    #[error(
        "Request timed out: The request took too long to complete. \
         This may be due to complex case details."
    )]
    Timeout,

    /// The backend answered but refused the operation. `status` is `None`
    /// when the refusal came inside a 2xx body (`"status": "error"`).
    #[error("{message}")]
    Rejected {
        status: Option<u16>,
        message: String,
        details: Option<Value>,
    },

    /// Refused locally before any request was made.
    #[error("{0}")]
    AuthRequired(String),

    /// A 2xx response whose body does not have the expected shape.
    #[error("{message}")]
    MalformedResponse {
        message: String,
        details: Option<Value>,
    },

    /// An upload failed local validation.
    #[error("{0}")]
    Extraction(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("session storage error: {0}")]
    Session(#[from] StoreError),
}

impl ApiError {
    /// HTTP-like status code: 0 unreachable, 408 timeout, 401 when
    /// authentication is missing, or the backend's own status.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unreachable { .. } => Some(0),
            Self::Timeout => Some(408),
            Self::AuthRequired(_) => Some(401),
            Self::Rejected { status, .. } => *status,
            Self::MalformedResponse { .. }
            | Self::Extraction(_)
            | Self::Io { .. }
            | Self::Session(_) => None,
        }
    }

    /// Raw error body or payload, when the backend sent one.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Unreachable { details, .. }
            | Self::Rejected { details, .. }
            | Self::MalformedResponse { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Whether the failure happened in transport rather than at the backend.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Unreachable { .. } | Self::Timeout)
    }

    pub(crate) fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
            details: None,
        }
    }

    /// Map a transport-level reqwest failure.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Unreachable {
                message: "Network error: Unable to reach analysis service".to_string(),
                details: Some(Value::String(err.to_string())),
            }
        }
    }
}

/// Pull a human-readable message out of a JSON error body.
///
/// Checks `message`, then `detail`, then `error`; non-string and blank
/// values are skipped.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    ["message", "detail", "error"]
        .iter()
        .find_map(|k| {
            body.get(*k)
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::unreachable("x").status(), Some(0));
        assert_eq!(ApiError::Timeout.status(), Some(408));
        assert_eq!(ApiError::AuthRequired("x".into()).status(), Some(401));
        let rejected = ApiError::Rejected {
            status: Some(503),
            message: "down".into(),
            details: None,
        };
        assert_eq!(rejected.status(), Some(503));
        assert_eq!(ApiError::Extraction("too big".into()).status(), None);
    }

    #[test]
    fn network_classification() {
        assert!(ApiError::Timeout.is_network());
        assert!(ApiError::unreachable("x").is_network());
        assert!(!ApiError::AuthRequired("x".into()).is_network());
    }

    #[test]
    fn timeout_message_carries_hint() {
        assert!(ApiError::Timeout.to_string().contains("complex case details"));
    }

    #[test]
    fn error_message_field_precedence() {
        assert_eq!(
            error_message(&json!({"detail": "d", "message": "m"})).as_deref(),
            Some("m")
        );
        assert_eq!(error_message(&json!({"detail": "d"})).as_deref(), Some("d"));
        assert_eq!(error_message(&json!({"error": "e"})).as_deref(), Some("e"));
        assert_eq!(error_message(&json!({"message": 3, "error": ""})), None);
    }
}
