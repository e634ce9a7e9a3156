//! Dispatch event and log types.
//!
//! `DispatchEvent` wraps one `DispatchRecord` with its position in the
//! session's chain and the hashes linking it to its neighbours.
//! `DispatchLog` is the exported view of one session's chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farmline_contracts::record::DispatchRecord;

/// A single entry in a session's SHA-256 hash chain.
///
/// Changing any field, including those of the embedded `record`, invalidates
/// `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchEvent {
    /// Position in the session's chain, starting at 0.
    pub sequence: u64,

    pub session_id: String,

    pub record: DispatchRecord,

    /// Hash of the previous event, or `GENESIS_HASH` for the first one.
    pub prev_hash: String,

    /// Hex SHA-256 over (session_id, sequence, prev_hash, record JSON).
    pub this_hash: String,
}

impl DispatchEvent {
    /// `prev_hash` of the first event in every chain.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// Every dispatch recorded for one session, in chain order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchLog {
    pub session_id: String,

    pub events: Vec<DispatchEvent>,

    /// When the session reached `Closed`. `None` while the call is live.
    pub finalized_at: Option<DateTime<Utc>>,

    /// `this_hash` of the last event. Empty if nothing was recorded.
    pub terminal_hash: String,
}
