//! `Session` transport that records instead of speaking.

use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Mutex,
};

use async_trait::async_trait;

use farmline_contracts::error::CollaboratorError;
use farmline_core::traits::{AgentMessage, Session};

/// Keeps every message sent and counts close calls.
///
/// `failing()` builds a transport whose sends always fail, for exercising
/// the farewell-failure path.
#[derive(Debug, Default)]
pub struct RecordingSession {
    sent: Mutex<Vec<AgentMessage>>,
    closes: AtomicU32,
    fail_sends: AtomicBool,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let session = Self::default();
        session.fail_sends.store(true, Ordering::SeqCst);
        session
    }

    /// Make later sends succeed or fail.
    pub fn set_failing(&self, failing: bool) {
        self.fail_sends.store(failing, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<AgentMessage> {
        self.sent.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn close_count(&self) -> u32 {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.close_count() > 0
    }
}

#[async_trait]
impl Session for RecordingSession {
    async fn send(&self, message: AgentMessage) -> Result<(), CollaboratorError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Transport {
                reason: "voice socket closed by peer".to_string(),
            });
        }
        let mut sent = self.sent.lock().map_err(|e| CollaboratorError::Transport {
            reason: format!("session buffer poisoned: {}", e),
        })?;
        sent.push(message);
        Ok(())
    }

    async fn close(&self) -> Result<(), CollaboratorError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
