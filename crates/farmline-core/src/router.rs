//! The call router: validates, sequences, invokes, and records every call.
//!
//! Each dispatch runs the same pipeline:
//!
//!   Validate → Guard → [handler under timeout] → Guard update → Record
//!
//! A handler is never invoked unless validation succeeded AND the sequencing
//! guard admitted the call. Nothing escapes `dispatch` as a fault: every
//! failure is resolved into a `CallResult::Error`.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use farmline_catalog::{Catalog, Validator};
use farmline_contracts::{
    call::{CallRequest, OperationCall},
    error::{CollaboratorError, DispatchError},
    record::{DispatchOutcome, DispatchRecord},
    result::{CallResult, ResultEnvelope},
    session::{SessionId, SessionPhase},
    settings::DispatchSettings,
};

use crate::{
    guard::{Precondition, SequenceGuard},
    handlers::{self, Collaborators},
    normalize::normalize,
    traits::{Announcer, CallContext, DiscardRecorder, DispatchRecorder, FarmerDirectory, Session},
};

/// One live voice connection and the sequencing state it owns.
///
/// Obtain one from `CallRouter::open`. Dispatching takes `&mut Connection`,
/// so calls on a connection are resolved strictly one at a time.
pub struct Connection {
    id: SessionId,
    session: Arc<dyn Session>,
    guard: SequenceGuard,
    cancel: CancellationToken,
}

impl Connection {
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.guard.phase()
    }

    /// Cancel any in-flight call and make every later call return `Cancelled`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A handle that cancels this connection from another task.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Shared, stateless-per-call router. One instance serves every connection.
pub struct CallRouter {
    catalog: Catalog,
    directory: Arc<dyn FarmerDirectory>,
    announcer: Arc<dyn Announcer>,
    recorder: Arc<dyn DispatchRecorder>,
    settings: DispatchSettings,
}

impl CallRouter {
    /// A router over the standard catalog with default settings and no recorder.
    pub fn new(directory: Arc<dyn FarmerDirectory>, announcer: Arc<dyn Announcer>) -> Self {
        Self {
            catalog: Catalog::standard().clone(),
            directory,
            announcer,
            recorder: Arc::new(DiscardRecorder),
            settings: DispatchSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: DispatchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn DispatchRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Start tracking a new live session in phase `Active`.
    pub fn open(&self, session: Arc<dyn Session>) -> Connection {
        let id = SessionId::new();
        info!(session_id = %id, "connection opened");
        Connection {
            id,
            session,
            guard: SequenceGuard::for_catalog(&self.catalog, self.settings.register_precondition),
            cancel: CancellationToken::new(),
        }
    }

    /// Dispatch a protocol request and return the outbound envelope.
    pub async fn handle(&self, conn: &mut Connection, request: &CallRequest) -> ResultEnvelope {
        normalize(self.dispatch(conn, &request.name, &request.parameters).await)
    }

    /// Run one call through the full pipeline.
    pub async fn dispatch(&self, conn: &mut Connection, name: &str, raw: &Value) -> CallResult {
        let phase_before = conn.guard.phase();

        debug!(
            session_id = %conn.id,
            operation = %name,
            phase = ?phase_before,
            "dispatch starting"
        );

        let result = match self.run(conn, name, raw).await {
            Ok(payload) => {
                debug!(session_id = %conn.id, operation = %name, "dispatch succeeded");
                CallResult::Ok(payload)
            }
            Err(err) => {
                log_rejection(&conn.id, name, &err);
                CallResult::from(err)
            }
        };

        self.record(conn, name, raw, &result, phase_before);

        if phase_before != SessionPhase::Closed && conn.guard.phase() == SessionPhase::Closed {
            if let Err(e) = self.recorder.finalize(&conn.id.to_string()) {
                error!(session_id = %conn.id, error = %e, "dispatch log finalize failed");
            }
        }

        result
    }

    async fn run(
        &self,
        conn: &mut Connection,
        name: &str,
        raw: &Value,
    ) -> Result<Map<String, Value>, DispatchError> {
        // ── Step 1: Validation ───────────────────────────────────────────────
        //
        // A closed session refuses every request, well-formed or not.
        conn.guard.check_open(name)?;
        let call = Validator::new(&self.catalog).validate(name, raw)?;

        // ── Step 2: Sequencing guard ─────────────────────────────────────────
        if let Precondition::AdvisoryUnmet { reason } = conn.guard.check_precondition(&call)? {
            warn!(
                session_id = %conn.id,
                operation = %name,
                reason = %reason,
                "advisory precondition unmet, dispatching anyway"
            );
        }

        let ending = matches!(call, OperationCall::EndCall { .. });
        if ending {
            conn.guard.begin_closing();
            info!(session_id = %conn.id, "session closing");
        }

        // ── Step 3: Handler invocation ───────────────────────────────────────
        //
        // Only reachable after validation and the guard both passed.
        let payload = self.invoke(conn, &call).await?;

        // ── Step 4: Guard update ─────────────────────────────────────────────
        let before = conn.guard.phase();
        conn.guard.complete(&call);
        let after = conn.guard.phase();
        if before != after {
            info!(session_id = %conn.id, from = ?before, to = ?after, "phase transition");
        }

        if ending {
            self.finish(conn).await;
        }

        Ok(payload)
    }

    async fn invoke(
        &self,
        conn: &Connection,
        call: &OperationCall,
    ) -> Result<Map<String, Value>, DispatchError> {
        let operation = call.operation().to_string();
        let connection_cancel = conn.cancel.clone();
        let ctx = CallContext {
            session_id: conn.id.clone(),
            cancel: connection_cancel.child_token(),
        };
        let timeout = self.settings.handler_timeout;

        let handler = handlers::invoke(
            call,
            &ctx,
            Collaborators {
                session: conn.session.as_ref(),
                directory: self.directory.as_ref(),
                announcer: self.announcer.as_ref(),
            },
        );

        tokio::select! {
            biased;

            _ = connection_cancel.cancelled() => {
                ctx.cancel.cancel();
                Err(DispatchError::Cancelled { operation })
            }

            outcome = tokio::time::timeout(timeout, handler) => match outcome {
                Ok(Ok(payload)) => Ok(payload),
                Ok(Err(CollaboratorError::Cancelled)) => Err(DispatchError::Cancelled { operation }),
                Ok(Err(e)) => Err(DispatchError::HandlerFailure {
                    operation,
                    reason: e.to_string(),
                }),
                Err(_elapsed) => {
                    ctx.cancel.cancel();
                    Err(DispatchError::HandlerTimeout {
                        operation,
                        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    })
                }
            },
        }
    }

    /// Tear the session down after the farewell was sent.
    async fn finish(&self, conn: &Connection) {
        match conn.session.close().await {
            Ok(()) => info!(session_id = %conn.id, "session closed"),
            Err(e) => error!(session_id = %conn.id, error = %e, "session close failed after farewell"),
        }
    }

    fn record(
        &self,
        conn: &Connection,
        name: &str,
        raw: &Value,
        result: &CallResult,
        phase_before: SessionPhase,
    ) {
        let record = DispatchRecord {
            session_id: conn.id.to_string(),
            operation: name.to_string(),
            parameters: raw.clone(),
            outcome: match result.error_kind() {
                None => DispatchOutcome::Ok,
                Some(kind) => DispatchOutcome::Error { kind },
            },
            phase_before,
            phase_after: conn.guard.phase(),
            timestamp: Utc::now(),
        };

        if let Err(e) = self.recorder.record(&record) {
            error!(session_id = %conn.id, operation = %name, error = %e, "dispatch record write failed");
        }
    }
}

fn log_rejection(session_id: &SessionId, operation: &str, err: &DispatchError) {
    let kind = err.kind();
    match err {
        DispatchError::HandlerFailure { .. } | DispatchError::HandlerTimeout { .. } => {
            error!(session_id = %session_id, operation = %operation, kind = %kind, error = %err, "handler failed");
        }
        DispatchError::Cancelled { .. } => {
            info!(session_id = %session_id, operation = %operation, "dispatch cancelled");
        }
        _ if kind.is_validation() => {
            warn!(session_id = %session_id, operation = %operation, kind = %kind, error = %err, "invalid call rejected");
        }
        _ => {
            warn!(session_id = %session_id, operation = %operation, kind = %kind, error = %err, "dispatch refused by sequencing guard");
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
