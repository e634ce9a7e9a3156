//! Error types for the farmline dispatch pipeline.
//!
//! Validation and guard errors never escape the router as faults: each one
//! is resolved into a `CallResult::Error` carrying its `ErrorKind`. The same
//! holds for collaborator failures, which surface as `HandlerFailure`.

use thiserror::Error;

use crate::result::ErrorKind;

/// A requested call did not match the catalog's parameter contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown operation '{name}'")]
    UnknownOperation { name: String },

    #[error("missing required parameter '{name}'")]
    MissingRequiredParameter { name: String },

    #[error("parameter '{name}' has value '{value}' which is not one of [{}]", .allowed.join(", "))]
    InvalidEnumValue {
        name: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("parameter '{name}' must be of type {expected}")]
    InvalidParameterType { name: String, expected: String },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::UnknownOperation { .. } => ErrorKind::UnknownOperation,
            ValidationError::MissingRequiredParameter { .. } => ErrorKind::MissingRequiredParameter,
            ValidationError::InvalidEnumValue { .. } => ErrorKind::InvalidEnumValue,
            ValidationError::InvalidParameterType { .. } => ErrorKind::InvalidParameterType,
        }
    }
}

/// Everything that can stop a dispatch from producing an `Ok` result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The sequencing guard rejected the call; session state is unchanged.
    #[error("'{operation}' rejected: {reason}")]
    SequenceViolation { operation: String, reason: String },

    /// The session has ended (or is ending) and accepts no further calls.
    #[error("session is closed; '{operation}' cannot be dispatched")]
    SessionClosed { operation: String },

    /// A collaborator raised an unexpected fault.
    #[error("'{operation}' failed: {reason}")]
    HandlerFailure { operation: String, reason: String },

    #[error("'{operation}' did not complete within {timeout_ms} ms")]
    HandlerTimeout { operation: String, timeout_ms: u64 },

    #[error("'{operation}' was cancelled")]
    Cancelled { operation: String },
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::Validation(e) => e.kind(),
            DispatchError::SequenceViolation { .. } => ErrorKind::SequenceViolation,
            DispatchError::SessionClosed { .. } => ErrorKind::SessionClosed,
            DispatchError::HandlerFailure { .. } => ErrorKind::HandlerFailure,
            DispatchError::HandlerTimeout { .. } => ErrorKind::HandlerTimeout,
            DispatchError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }
}

/// Failure reported by an external collaborator (session transport or backend).
///
/// Business outcomes such as "farmer not found" are NOT errors; they come
/// back as ordinary values from the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("session transport error: {reason}")]
    Transport { reason: String },

    #[error("backend error: {reason}")]
    Backend { reason: String },

    #[error("collaborator call cancelled")]
    Cancelled,
}

/// Errors raised outside a dispatch cycle, e.g. while loading configuration.
#[derive(Debug, Error)]
pub enum FarmlineError {
    #[error("configuration error: {reason}")]
    Config { reason: String },

    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    #[error("catalog error: {reason}")]
    Catalog { reason: String },
}

/// Convenience alias used throughout the farmline crates.
pub type FarmlineResult<T> = Result<T, FarmlineError>;
