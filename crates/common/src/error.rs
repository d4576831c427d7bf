//! Store transport errors and their classification.

use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a store failure, derived from its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// The resource is missing (message mentions `404`).
    NotFound,
    /// The store failed internally (message mentions `500`).
    ServerError,
    /// Anything else: connection refused, timeout, bad payload...
    Unknown,
}

impl TransportErrorKind {
    /// Classify an error message by the status indicator it carries.
    pub fn classify(message: &str) -> Self {
        if message.contains("404") {
            TransportErrorKind::NotFound
        } else if message.contains("500") {
            TransportErrorKind::ServerError
        } else {
            TransportErrorKind::Unknown
        }
    }

    /// HTTP status associated with this kind, if any.
    pub fn status_code(self) -> Option<u16> {
        match self {
            TransportErrorKind::NotFound => Some(404),
            TransportErrorKind::ServerError => Some(500),
            TransportErrorKind::Unknown => None,
        }
    }
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportErrorKind::NotFound => write!(f, "not_found"),
            TransportErrorKind::ServerError => write!(f, "server_error"),
            TransportErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// A rejected store call. The message is shown verbatim in the error panel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error for a non-success HTTP status, e.g. `Erreur 404`.
    pub fn from_status(code: u16) -> Self {
        Self::new(format!("Erreur {code}"))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> TransportErrorKind {
        TransportErrorKind::classify(&self.message)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_not_found() {
        assert_eq!(TransportErrorKind::classify("Erreur 404"), TransportErrorKind::NotFound);
    }

    #[test]
    fn test_classify_server_error() {
        assert_eq!(TransportErrorKind::classify("Erreur 500"), TransportErrorKind::ServerError);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(
            TransportErrorKind::classify("connection refused"),
            TransportErrorKind::Unknown
        );
        assert_eq!(TransportErrorKind::classify(""), TransportErrorKind::Unknown);
    }

    #[test]
    fn test_from_status_message() {
        let err = StoreError::from_status(404);
        assert_eq!(err.message(), "Erreur 404");
        assert_eq!(err.to_string(), "Erreur 404");
        assert_eq!(err.kind(), TransportErrorKind::NotFound);
        assert_eq!(err.kind().status_code(), Some(404));
    }

    #[test]
    fn test_unknown_has_no_status() {
        let err = StoreError::new("timed out");
        assert_eq!(err.kind(), TransportErrorKind::Unknown);
        assert_eq!(err.kind().status_code(), None);
    }
}
