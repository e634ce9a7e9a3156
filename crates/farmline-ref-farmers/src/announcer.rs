//! `Announcer` that rotates through fixed phrase tables.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::debug;

use farmline_contracts::{
    call::{FarewellKind, FillerKind},
    error::CollaboratorError,
};
use farmline_core::traits::{AgentMessage, AgentMessageKind, Announcer, CallContext, Session};

use crate::mock_data::{
    GENERAL_FAREWELLS, GENERAL_FILLERS, HELP_FAREWELLS, LOOKUP_FILLERS, THANKS_FAREWELLS,
};

/// Picks the next phrase from the table for the requested kind and sends it.
#[derive(Debug, Default)]
pub struct ScriptedAnnouncer {
    cursor: AtomicUsize,
}

impl ScriptedAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    fn pick(&self, table: &'static [&'static str]) -> &'static str {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        table.get(idx % table.len().max(1)).copied().unwrap_or("")
    }

    pub fn filler_text(&self, kind: FillerKind) -> &'static str {
        self.pick(match kind {
            FillerKind::Lookup => LOOKUP_FILLERS,
            FillerKind::General => GENERAL_FILLERS,
        })
    }

    pub fn farewell_text(&self, kind: FarewellKind) -> &'static str {
        self.pick(match kind {
            FarewellKind::Thanks => THANKS_FAREWELLS,
            FarewellKind::General => GENERAL_FAREWELLS,
            FarewellKind::Help => HELP_FAREWELLS,
        })
    }
}

#[async_trait]
impl Announcer for ScriptedAnnouncer {
    async fn prepare_filler(
        &self,
        ctx: &CallContext,
        session: &dyn Session,
        kind: FillerKind,
    ) -> Result<(), CollaboratorError> {
        let text = self.filler_text(kind);
        debug!(session_id = %ctx.session_id, kind = %kind, text = %text, "sending filler");
        session
            .send(AgentMessage {
                kind: AgentMessageKind::Filler,
                text: text.to_string(),
            })
            .await
    }

    async fn prepare_farewell(
        &self,
        ctx: &CallContext,
        session: &dyn Session,
        kind: FarewellKind,
    ) -> Result<(), CollaboratorError> {
        let text = self.farewell_text(kind);
        debug!(session_id = %ctx.session_id, kind = %kind, text = %text, "sending farewell");
        session
            .send(AgentMessage {
                kind: AgentMessageKind::Farewell,
                text: text.to_string(),
            })
            .await
    }
}
