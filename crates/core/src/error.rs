//! Structured error model for Billed.
//!
//! Every error carries:
//! - **code**: machine-readable error code (e.g. `STORE_NOT_FOUND`)
//! - **category**: error class (`session`, `config`, `network`, `validation`, `system`)
//! - **recoverable**: whether retrying or fixing input can help
//! - **hints**: actionable suggestions for recovery
//!
//! JSON output format:
//! ```json
//! {
//!   "ok": false,
//!   "error": {
//!     "code": "STORE_NOT_FOUND",
//!     "message": "Erreur 404",
//!     "category": "network",
//!     "recoverable": true,
//!     "hints": ["Check the store URL: billed config show"]
//!   }
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

use billed_common::error::{StoreError, TransportErrorKind};

/// Error category: determines exit code and recovery strategy.
///
/// Exit codes:
/// - `0`: success
/// - `1`: user error (session, config, validation)
/// - `2`: network error
/// - `3`: system error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Session,
    Config,
    Network,
    Validation,
    System,
}

impl ErrorCategory {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCategory::Session => 1,
            ErrorCategory::Config => 1,
            ErrorCategory::Validation => 1,
            ErrorCategory::Network => 2,
            ErrorCategory::System => 3,
        }
    }
}

/// Structured error detail for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub category: ErrorCategory,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

/// Top-level error type for Billed operations outside the container itself.
#[derive(Debug, Error)]
pub enum BilledError {
    // ── Session ──────────────────────────────────────────────────────
    #[error("No session stored")]
    NoSession,

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    // ── Config ───────────────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Network ─────────────────────────────────────────────────────
    #[error(transparent)]
    Store(#[from] StoreError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    // ── System ───────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BilledError {
    /// Get the structured error detail for JSON output.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            BilledError::NoSession => ErrorDetail {
                code: "NO_SESSION".into(),
                message: self.to_string(),
                category: ErrorCategory::Session,
                recoverable: true,
                hints: vec!["Run: billed session set --email <email>".into()],
            },
            BilledError::InvalidSession(msg) => ErrorDetail {
                code: "INVALID_SESSION".into(),
                message: msg.clone(),
                category: ErrorCategory::Session,
                recoverable: true,
                hints: vec!["Reset it with: billed session set --email <email>".into()],
            },
            BilledError::InvalidConfig(msg) => ErrorDetail {
                code: "INVALID_CONFIG".into(),
                message: msg.clone(),
                category: ErrorCategory::Config,
                recoverable: true,
                hints: vec!["Check config.toml or run: billed config show".into()],
            },
            BilledError::Store(e) => {
                let (code, hints) = match e.kind() {
                    TransportErrorKind::NotFound => (
                        "STORE_NOT_FOUND",
                        vec!["Check the store URL: billed config show".to_string()],
                    ),
                    TransportErrorKind::ServerError => (
                        "STORE_SERVER_ERROR",
                        vec!["Retry in a few seconds".to_string()],
                    ),
                    TransportErrorKind::Unknown => (
                        "TRANSPORT_ERROR",
                        vec!["Check network connectivity".to_string()],
                    ),
                };
                ErrorDetail {
                    code: code.into(),
                    message: e.message().to_string(),
                    category: ErrorCategory::Network,
                    recoverable: true,
                    hints,
                }
            }
            BilledError::BillNotFound(id) => ErrorDetail {
                code: "BILL_NOT_FOUND".into(),
                message: self.to_string(),
                category: ErrorCategory::Validation,
                recoverable: true,
                hints: vec![format!("List bill ids with: billed bills (looked for {id})")],
            },
            BilledError::Internal(msg) => ErrorDetail {
                code: "INTERNAL_ERROR".into(),
                message: msg.clone(),
                category: ErrorCategory::System,
                recoverable: false,
                hints: vec![],
            },
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.detail().category.exit_code()
    }

    /// Serialize this error as the JSON error envelope.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ok": false,
            "error": self.detail(),
        })
    }
}

pub type BilledResult<T> = Result<T, BilledError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_404_detail() {
        let err = BilledError::from(StoreError::new("Erreur 404"));
        let detail = err.detail();
        assert_eq!(detail.code, "STORE_NOT_FOUND");
        assert_eq!(detail.message, "Erreur 404");
        assert_eq!(detail.category, ErrorCategory::Network);
        assert_eq!(err.to_string(), "Erreur 404");
    }

    #[test]
    fn test_store_500_detail() {
        let err = BilledError::from(StoreError::new("Erreur 500"));
        assert_eq!(err.detail().code, "STORE_SERVER_ERROR");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_unknown_transport_detail() {
        let err = BilledError::from(StoreError::new("connection refused"));
        assert_eq!(err.detail().code, "TRANSPORT_ERROR");
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(BilledError::NoSession.exit_code(), 1);
        assert_eq!(BilledError::BillNotFound("x".into()).exit_code(), 1);
        assert_eq!(BilledError::Internal("boom".into()).exit_code(), 3);
    }

    #[test]
    fn test_error_json_format() {
        let err = BilledError::BillNotFound("47qAXb6fIm2zOKkLzMro".into());
        let json = err.to_json();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "BILL_NOT_FOUND");
        assert_eq!(json["error"]["category"], "validation");
        assert!(json["error"]["hints"].is_array());
    }

    #[test]
    fn test_error_json_no_empty_hints() {
        let err = BilledError::Internal("unknown".into());
        let serialized = serde_json::to_string(&err.detail()).unwrap();
        assert!(!serialized.contains("\"hints\""));
    }
}
