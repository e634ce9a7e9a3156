//! Runnable farmer-helpline scenarios.
//!
//! Each scenario wires the real router, policy loader and dispatch log to
//! the reference collaborators and replays a scripted sequence of planner
//! calls, printing what the outer loop would forward to the conversation.

pub mod farmer_lookup;
pub mod farmer_registration;
pub mod sequencing_violations;
pub mod slow_backend;

use std::sync::Arc;

use serde_json::Value;

use farmline_audit::InMemoryDispatchLog;
use farmline_contracts::{
    call::CallRequest,
    error::FarmlineResult,
    result::ResultEnvelope,
    settings::DispatchSettings,
};
use farmline_core::{CallRouter, Connection};
use farmline_policy::DispatchPolicy;

use crate::{
    announcer::ScriptedAnnouncer, directory::InMemoryFarmerDirectory, session::RecordingSession,
};

/// Dispatch policy shipped with the reference runtime.
pub const DISPATCH_POLICY: &str = include_str!("../../policies/dispatch.toml");

/// Everything one scenario run needs.
pub struct Bench {
    pub router: CallRouter,
    pub conn: Connection,
    pub session: Arc<RecordingSession>,
    pub directory: Arc<InMemoryFarmerDirectory>,
    pub log: InMemoryDispatchLog,
}

impl Bench {
    /// Seeded directory, bundled policy.
    pub fn standard() -> FarmlineResult<Self> {
        let settings = DispatchPolicy::from_toml_str(DISPATCH_POLICY)?.into_settings();
        Ok(Self::with(
            InMemoryFarmerDirectory::seeded(),
            RecordingSession::new(),
            settings,
        ))
    }

    pub fn with(
        directory: InMemoryFarmerDirectory,
        session: RecordingSession,
        settings: DispatchSettings,
    ) -> Self {
        let directory = Arc::new(directory);
        let session = Arc::new(session);
        let log = InMemoryDispatchLog::new();
        let router = CallRouter::new(directory.clone(), Arc::new(ScriptedAnnouncer::new()))
            .with_settings(settings)
            .with_recorder(Arc::new(log.clone()));
        let conn = router.open(session.clone());
        Self {
            router,
            conn,
            session,
            directory,
            log,
        }
    }

    /// Dispatch one planner call and print the envelope.
    pub async fn call(&mut self, name: &str, parameters: Value) -> ResultEnvelope {
        let request = CallRequest::new(name, parameters);
        let envelope = self.router.handle(&mut self.conn, &request).await;
        print_envelope(name, &envelope);
        println!("    phase now: {:?}", self.conn.phase());
        envelope
    }

    /// Print the audit summary for this connection.
    pub fn print_audit(&self) {
        let session_id = self.conn.id().to_string();
        let events = self
            .log
            .export_log(&session_id)
            .map(|l| l.events.len())
            .unwrap_or(0);
        println!(
            "  Dispatch log integrity: {} ({} event(s), finalized: {})",
            if self.log.verify_integrity() { "VERIFIED" } else { "FAILED" },
            events,
            if self.log.is_finalized(&session_id) { "yes" } else { "no" }
        );
    }
}

pub(crate) fn print_envelope(name: &str, envelope: &ResultEnvelope) {
    match (&envelope.payload, &envelope.error) {
        (Some(payload), _) => {
            println!("  → {:<14} ok     {}", name, Value::Object(payload.clone()));
        }
        (None, Some(error)) => {
            println!("  → {:<14} ERROR  [{}] {}", name, error.kind, error.message);
            println!("    spoken: \"{}\"", error.kind.spoken_hint());
        }
        (None, None) => println!("  → {:<14} (empty envelope)", name),
    }
}
