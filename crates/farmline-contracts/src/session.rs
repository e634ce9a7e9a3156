//! Session identity and lifecycle phase.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for one live voice connection.
///
/// Appears in every log line and dispatch record for that connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    /// Create a new, unique session ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where a session is in the filler / termination lifecycle.
///
/// ```text
/// Active ──agent_filler{lookup}──▶ FillerIssued ──lookup──▶ Active
///    │                                   │
///    └──────────── end_call ─────────────┴──▶ Closing ──farewell sent──▶ Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Active,
    FillerIssued,
    Closing,
    Closed,
}

impl SessionPhase {
    /// True once termination has started.
    pub fn is_terminating(&self) -> bool {
        matches!(self, SessionPhase::Closing | SessionPhase::Closed)
    }
}
