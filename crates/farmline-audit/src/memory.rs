//! In-memory implementation of `DispatchRecorder`.
//!
//! One router serves many connections, so `InMemoryDispatchLog` keeps an
//! independent chain per session id. Records for a session that was already
//! finalized are still appended; finalization only stamps the log.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use farmline_contracts::{
    error::{FarmlineError, FarmlineResult},
    record::DispatchRecord,
};
use farmline_core::traits::DispatchRecorder;

use crate::{
    chain::{hash_event, verify_chain},
    event::{DispatchEvent, DispatchLog},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct SessionChain {
    pub(crate) events: Vec<DispatchEvent>,
    pub(crate) sequence: u64,
    pub(crate) last_hash: String,
    pub(crate) finalized_at: Option<DateTime<Utc>>,
}

impl SessionChain {
    fn new() -> Self {
        Self {
            events: Vec::new(),
            sequence: 0,
            last_hash: DispatchEvent::GENESIS_HASH.to_string(),
            finalized_at: None,
        }
    }
}

#[derive(Default)]
pub(crate) struct LogState {
    pub(crate) sessions: HashMap<String, SessionChain>,
    /// Session ids in the order they were first recorded.
    pub(crate) order: Vec<String>,
}

// ── Public log ────────────────────────────────────────────────────────────────

/// Append-only, per-session hash-chained log of every dispatch.
///
/// Clones share the same state, so a caller can keep a handle for export
/// while the router holds another as its recorder.
#[derive(Clone, Default)]
pub struct InMemoryDispatchLog {
    pub(crate) state: Arc<Mutex<LogState>>,
}

impl InMemoryDispatchLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> FarmlineResult<MutexGuard<'_, LogState>> {
        self.state.lock().map_err(|e| FarmlineError::AuditWriteFailed {
            reason: format!("dispatch log lock poisoned: {}", e),
        })
    }

    /// Session ids seen so far, in first-record order.
    pub fn sessions(&self) -> Vec<String> {
        self.lock().map(|s| s.order.clone()).unwrap_or_default()
    }

    /// Export the chain for `session_id`, or `None` if nothing was recorded.
    pub fn export_log(&self, session_id: &str) -> Option<DispatchLog> {
        let state = self.lock().ok()?;
        let chain = state.sessions.get(session_id)?;
        Some(DispatchLog {
            session_id: session_id.to_string(),
            events: chain.events.clone(),
            finalized_at: chain.finalized_at,
            terminal_hash: chain
                .events
                .last()
                .map(|e| e.this_hash.clone())
                .unwrap_or_default(),
        })
    }

    /// Verify every session's chain.
    pub fn verify_integrity(&self) -> bool {
        match self.lock() {
            Ok(state) => state.sessions.values().all(|c| verify_chain(&c.events)),
            Err(_) => false,
        }
    }

    /// Remove and return the chain for `session_id`.
    ///
    /// Call after a session is finalized and its log has been shipped
    /// elsewhere; the in-memory log otherwise keeps every session it saw.
    pub fn remove(&self, session_id: &str) -> Option<DispatchLog> {
        let exported = self.export_log(session_id)?;
        let mut state = self.lock().ok()?;
        state.sessions.remove(session_id);
        state.order.retain(|id| id != session_id);
        debug!(session_id = %session_id, event_count = exported.events.len(), "dispatch log removed");
        Some(exported)
    }

    /// Remove every finalized session and return their logs in first-record order.
    pub fn drain_finalized(&self) -> Vec<DispatchLog> {
        let finalized: Vec<String> = match self.lock() {
            Ok(state) => state
                .order
                .iter()
                .filter(|id| {
                    state
                        .sessions
                        .get(id.as_str())
                        .is_some_and(|c| c.finalized_at.is_some())
                })
                .cloned()
                .collect(),
            Err(_) => return Vec::new(),
        };
        finalized.iter().filter_map(|id| self.remove(id)).collect()
    }

    pub fn is_finalized(&self, session_id: &str) -> bool {
        self.lock()
            .map(|s| {
                s.sessions
                    .get(session_id)
                    .is_some_and(|c| c.finalized_at.is_some())
            })
            .unwrap_or(false)
    }
}

// ── DispatchRecorder impl ─────────────────────────────────────────────────────

impl DispatchRecorder for InMemoryDispatchLog {
    fn record(&self, record: &DispatchRecord) -> FarmlineResult<()> {
        let mut state = self.lock()?;

        if !state.sessions.contains_key(&record.session_id) {
            state.order.push(record.session_id.clone());
        }
        let chain = state
            .sessions
            .entry(record.session_id.clone())
            .or_insert_with(SessionChain::new);

        let prev_hash = chain.last_hash.clone();
        let sequence = chain.sequence;
        let this_hash = hash_event(&record.session_id, sequence, record, &prev_hash)?;

        if chain.finalized_at.is_some() {
            debug!(
                session_id = %record.session_id,
                operation = %record.operation,
                "recording dispatch on a finalized session"
            );
        }

        chain.events.push(DispatchEvent {
            sequence,
            session_id: record.session_id.clone(),
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        chain.sequence += 1;
        chain.last_hash = this_hash;

        Ok(())
    }

    fn finalize(&self, session_id: &str) -> FarmlineResult<()> {
        let mut state = self.lock()?;
        let chain = state
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| FarmlineError::AuditWriteFailed {
                reason: format!("no dispatch log for session '{}'", session_id),
            })?;

        if chain.finalized_at.is_none() {
            chain.finalized_at = Some(Utc::now());
        }

        info!(
            session_id = %session_id,
            event_count = chain.events.len(),
            terminal_hash = %chain.last_hash,
            "dispatch log finalized"
        );

        Ok(())
    }
}
