//! Hash-chain primitives.
//!
//! Hash input layout (bytes, in order):
//!   1. session_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. JSON of the dispatch record (serde_json, compact)

use sha2::{Digest, Sha256};

use farmline_contracts::{
    error::{FarmlineError, FarmlineResult},
    record::DispatchRecord,
};

use crate::event::DispatchEvent;

/// Compute the lowercase hex SHA-256 for one dispatch event.
///
/// Fails only if `record` cannot be serialized, which would mean its raw
/// parameters contain a value JSON cannot represent.
pub fn hash_event(
    session_id: &str,
    sequence: u64,
    record: &DispatchRecord,
    prev_hash: &str,
) -> FarmlineResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| FarmlineError::AuditWriteFailed {
        reason: format!("dispatch record is not serializable: {}", e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(session_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify a session's chain.
///
/// Valid when every event links to its predecessor (or `GENESIS_HASH`),
/// its sequence matches its position, and its stored hash matches the
/// recomputed one. An empty chain is valid.
pub fn verify_chain(events: &[DispatchEvent]) -> bool {
    let mut expected_prev = DispatchEvent::GENESIS_HASH.to_string();

    for (position, event) in events.iter().enumerate() {
        if event.prev_hash != expected_prev || event.sequence != position as u64 {
            return false;
        }

        match hash_event(&event.session_id, event.sequence, &event.record, &event.prev_hash) {
            Ok(recomputed) if recomputed == event.this_hash => {}
            _ => return false,
        }

        expected_prev = event.this_hash.clone();
    }

    true
}
