use thiserror::Error;

use super::models::EntityKind;

/// Errors raised at the store boundary.
///
/// Under the default key policy a well-typed intent never fails; these only
/// come from untyped input or from the opt-in uniqueness check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Unknown intent: {operation} on {kind}")]
    UnknownIntent { kind: String, operation: String },

    #[error("Malformed {operation} payload for {kind}: {reason}")]
    MalformedPayload {
        kind: EntityKind,
        operation: String,
        reason: String,
    },

    #[error("Duplicate {kind} key: {key}")]
    DuplicateKey { kind: EntityKind, key: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Console form validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    EmptyField(&'static str),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
