//! Dispatch records written to the audit log.
//!
//! Every dispatch, accepted or rejected, produces exactly one
//! `DispatchRecord`. Records are appended and never modified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{result::ErrorKind, session::SessionPhase};

/// How a dispatch ended, reduced to what the audit trail needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Ok,
    Error { kind: ErrorKind },
}

/// An immutable record of one dispatch cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRecord {
    /// The connection the call arrived on.
    pub session_id: String,
    /// The operation name exactly as requested (may be unknown).
    pub operation: String,
    /// Raw parameters as received, before validation.
    pub parameters: Value,
    pub outcome: DispatchOutcome,
    pub phase_before: SessionPhase,
    pub phase_after: SessionPhase,
    /// Wall-clock time the record was created (UTC).
    pub timestamp: DateTime<Utc>,
}
