//! Call outcomes and the outbound result envelope.
//!
//! `CallResult` is what the router produces for every dispatch.
//! `ResultEnvelope` is the uniform shape handed back to the outer loop:
//!
//! ```json
//! { "ok": true,  "payload": { ... } }
//! { "ok": false, "error": { "kind": "sequence_violation", "message": "..." } }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DispatchError;

/// Stable classification of dispatch failures.
///
/// Business outcomes ("not found", "already registered") are deliberately
/// absent: they are successful calls whose payload says so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownOperation,
    MissingRequiredParameter,
    InvalidEnumValue,
    InvalidParameterType,
    SequenceViolation,
    SessionClosed,
    HandlerFailure,
    HandlerTimeout,
    Cancelled,
}

impl ErrorKind {
    /// The snake_case name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownOperation => "unknown_operation",
            ErrorKind::MissingRequiredParameter => "missing_required_parameter",
            ErrorKind::InvalidEnumValue => "invalid_enum_value",
            ErrorKind::InvalidParameterType => "invalid_parameter_type",
            ErrorKind::SequenceViolation => "sequence_violation",
            ErrorKind::SessionClosed => "session_closed",
            ErrorKind::HandlerFailure => "handler_failure",
            ErrorKind::HandlerTimeout => "handler_timeout",
            ErrorKind::Cancelled => "cancelled",
        }
    }

    /// True for errors raised before any handler could run.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorKind::UnknownOperation
                | ErrorKind::MissingRequiredParameter
                | ErrorKind::InvalidEnumValue
                | ErrorKind::InvalidParameterType
        )
    }

    /// A short sentence the agent can speak instead of going silent.
    pub fn spoken_hint(&self) -> &'static str {
        match self {
            ErrorKind::UnknownOperation => "I'm not able to do that on this call.",
            ErrorKind::MissingRequiredParameter => {
                "I need a little more information before I can do that."
            }
            ErrorKind::InvalidEnumValue => "That option isn't one I can use. Could you choose another?",
            ErrorKind::InvalidParameterType => {
                "Some of the details didn't come through in the right format. Could you repeat them?"
            }
            ErrorKind::SequenceViolation => "Give me a moment, let me do that in the right order.",
            ErrorKind::SessionClosed => "This call has already ended.",
            ErrorKind::HandlerFailure => "Something went wrong on our side. Please try again shortly.",
            ErrorKind::HandlerTimeout => "That's taking longer than expected. Let's try again.",
            ErrorKind::Cancelled => "That request was stopped before it finished.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a single dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    /// The handler ran. The payload may still describe a business
    /// outcome such as "not found".
    Ok(Map<String, Value>),

    /// The call was rejected or the handler failed.
    Error { kind: ErrorKind, message: String },
}

impl CallResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, CallResult::Ok(_))
    }

    /// The error kind, if this is an error.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            CallResult::Ok(_) => None,
            CallResult::Error { kind, .. } => Some(*kind),
        }
    }

    /// The payload, if this is a success.
    pub fn payload(&self) -> Option<&Map<String, Value>> {
        match self {
            CallResult::Ok(payload) => Some(payload),
            CallResult::Error { .. } => None,
        }
    }
}

impl From<DispatchError> for CallResult {
    fn from(err: DispatchError) -> Self {
        CallResult::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// The error part of a failed `ResultEnvelope`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Uniform outbound message returned to the outer conversational loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<EnvelopeError>,
}
