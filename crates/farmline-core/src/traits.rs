//! Collaborator trait definitions for the dispatch pipeline.
//!
//! These traits are the whole boundary between the core and the outside:
//!
//! - `Session`         : the live voice connection (send a message, close)
//! - `FarmerDirectory` : backend farmer lookup and registration
//! - `Announcer`       : prepares and speaks filler and farewell lines
//! - `DispatchRecorder`: append-only sink for one record per dispatch
//!
//! The router owns none of their state. Every async call receives a
//! `CallContext` whose cancellation token fires when the call times out or
//! the connection is cancelled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use farmline_contracts::{
    call::{FarewellKind, FillerKind, Registration},
    error::{CollaboratorError, FarmlineResult},
    farmer::{FarmerLookup, RegistrationOutcome},
    record::DispatchRecord,
    session::SessionId,
};

/// Per-call context handed to collaborators.
#[derive(Debug, Clone)]
pub struct CallContext {
    pub session_id: SessionId,
    /// Cancelled when the call exceeds its timeout or the connection is cancelled.
    pub cancel: CancellationToken,
}

/// What an utterance injected into the conversation is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentMessageKind {
    Filler,
    Farewell,
}

/// A message the agent speaks over the live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub kind: AgentMessageKind,
    pub text: String,
}

/// The live connection to the caller.
#[async_trait]
pub trait Session: Send + Sync {
    /// Inject a message into the conversation.
    async fn send(&self, message: AgentMessage) -> Result<(), CollaboratorError>;

    /// Tear the connection down. Called once, after the farewell is sent.
    async fn close(&self) -> Result<(), CollaboratorError>;
}

/// Backend farmer records.
///
/// "Not found" and "already registered" are ordinary return values.
/// `Err` is reserved for faults the caller could not have predicted.
#[async_trait]
pub trait FarmerDirectory: Send + Sync {
    async fn lookup(
        &self,
        ctx: &CallContext,
        national_id: &str,
    ) -> Result<FarmerLookup, CollaboratorError>;

    async fn register(
        &self,
        ctx: &CallContext,
        registration: &Registration,
    ) -> Result<RegistrationOutcome, CollaboratorError>;
}

/// Chooses the words for filler and farewell lines and sends them.
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn prepare_filler(
        &self,
        ctx: &CallContext,
        session: &dyn Session,
        kind: FillerKind,
    ) -> Result<(), CollaboratorError>;

    /// Returns once the farewell has been sent over `session`.
    async fn prepare_farewell(
        &self,
        ctx: &CallContext,
        session: &dyn Session,
        kind: FarewellKind,
    ) -> Result<(), CollaboratorError>;
}

/// Append-only record of every dispatch.
///
/// A failed write is logged by the router and never changes the call result.
pub trait DispatchRecorder: Send + Sync {
    fn record(&self, record: &DispatchRecord) -> FarmlineResult<()>;

    /// Seal the records of a session once it reaches `Closed`.
    fn finalize(&self, session_id: &str) -> FarmlineResult<()>;
}

/// A recorder that keeps nothing. The router's default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardRecorder;

impl DispatchRecorder for DiscardRecorder {
    fn record(&self, _record: &DispatchRecord) -> FarmlineResult<()> {
        Ok(())
    }

    fn finalize(&self, _session_id: &str) -> FarmlineResult<()> {
        Ok(())
    }
}
