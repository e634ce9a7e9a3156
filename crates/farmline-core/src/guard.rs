//! The sequencing guard: per-connection filler and termination state machine.
//!
//! Transitions:
//!
//! ```text
//! Active       ──agent_filler{lookup}──────────▶ FillerIssued
//! FillerIssued ──filler-gated operation────────▶ Active        (filler consumed)
//! Active       ──filler-gated operation────────▶ rejected      (phase unchanged)
//! any          ──end_call──▶ Closing ──farewell sent──▶ Closed
//! ```
//!
//! `check_precondition` never mutates. The router mutates only through
//! `begin_closing` and `complete`, after the corresponding step succeeded.

use std::collections::HashSet;

use farmline_catalog::Catalog;
use farmline_contracts::{
    call::{FillerKind, OperationCall},
    error::DispatchError,
    operation::OperationName,
    session::SessionPhase,
    settings::PreconditionMode,
};

/// Result of a precondition check that did not reject the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    Satisfied,
    /// An advisory precondition is unmet. The call may proceed; the router
    /// logs `reason`.
    AdvisoryUnmet { reason: String },
}

/// State machine owned exclusively by one `Connection`.
#[derive(Debug, Clone)]
pub struct SequenceGuard {
    phase: SessionPhase,
    gated: HashSet<OperationName>,
    register_precondition: PreconditionMode,
    /// National ID of the last successful `find_farmer`.
    last_lookup: Option<String>,
}

impl SequenceGuard {
    /// Build a guard in `Active`, gating every operation the catalog tags.
    pub fn for_catalog(catalog: &Catalog, register_precondition: PreconditionMode) -> Self {
        Self {
            phase: SessionPhase::Active,
            gated: OperationName::ALL
                .into_iter()
                .filter(|op| catalog.requires_preceding_filler(*op))
                .collect(),
            register_precondition,
            last_lookup: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn last_lookup(&self) -> Option<&str> {
        self.last_lookup.as_deref()
    }

    /// Refuse any call by wire name once the session is ending.
    ///
    /// Runs before validation, so a malformed or unknown request on a closed
    /// session is still reported as `SessionClosed`.
    pub fn check_open(&self, name: &str) -> Result<(), DispatchError> {
        let closed = match self.phase {
            SessionPhase::Closed => true,
            // A farewell that failed may be retried; nothing else may run.
            SessionPhase::Closing => name != OperationName::EndCall.as_str(),
            _ => false,
        };
        if closed {
            return Err(DispatchError::SessionClosed {
                operation: name.to_string(),
            });
        }
        Ok(())
    }

    /// Decide whether `call` may be dispatched in the current phase.
    pub fn check_precondition(&self, call: &OperationCall) -> Result<Precondition, DispatchError> {
        let operation = call.operation();
        self.check_open(operation.as_str())?;

        if self.gated.contains(&operation) && self.phase != SessionPhase::FillerIssued {
            return Err(DispatchError::SequenceViolation {
                operation: operation.to_string(),
                reason: "a lookup filler must be spoken before this lookup".to_string(),
            });
        }

        if let OperationCall::CreateFarmer(registration) = call {
            if self.last_lookup.as_deref() != Some(registration.national_id.as_str()) {
                let reason = format!(
                    "national ID '{}' was not looked up with find_farmer before registering",
                    registration.national_id
                );
                return match self.register_precondition {
                    PreconditionMode::Advisory => Ok(Precondition::AdvisoryUnmet { reason }),
                    PreconditionMode::Enforced => Err(DispatchError::SequenceViolation {
                        operation: operation.to_string(),
                        reason,
                    }),
                };
            }
        }

        Ok(Precondition::Satisfied)
    }

    /// Enter `Closing` ahead of the farewell.
    pub fn begin_closing(&mut self) {
        self.phase = SessionPhase::Closing;
    }

    /// Apply the transition for a call whose handler succeeded.
    pub fn complete(&mut self, call: &OperationCall) {
        let operation = call.operation();

        match call {
            OperationCall::AgentFiller {
                message_type: FillerKind::Lookup,
            } => {
                if self.phase == SessionPhase::Active {
                    self.phase = SessionPhase::FillerIssued;
                }
            }
            OperationCall::EndCall { .. } => {
                self.phase = SessionPhase::Closed;
            }
            OperationCall::FindFarmer {
                national_id: Some(national_id),
            } => {
                self.last_lookup = Some(national_id.clone());
            }
            _ => {}
        }

        if self.gated.contains(&operation) && self.phase == SessionPhase::FillerIssued {
            self.phase = SessionPhase::Active;
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use farmline_contracts::call::{FarewellKind, Registration, ServiceKind};

    use super::*;

    fn guard(mode: PreconditionMode) -> SequenceGuard {
        SequenceGuard::for_catalog(Catalog::standard(), mode)
    }

    fn lookup_filler() -> OperationCall {
        OperationCall::AgentFiller {
            message_type: FillerKind::Lookup,
        }
    }

    fn find(id: &str) -> OperationCall {
        OperationCall::FindFarmer {
            national_id: Some(id.to_string()),
        }
    }

    fn register(id: &str) -> OperationCall {
        OperationCall::CreateFarmer(Registration {
            national_id: id.to_string(),
            name: "Abhishek".to_string(),
            state: "Kerala".to_string(),
            crop: "Rubber".to_string(),
            yield_qty: 1000,
            service: ServiceKind::Register,
        })
    }

    fn end_call() -> OperationCall {
        OperationCall::EndCall {
            farewell_type: FarewellKind::Thanks,
        }
    }

    #[test]
    fn starts_active() {
        assert_eq!(guard(PreconditionMode::Advisory).phase(), SessionPhase::Active);
    }

    #[test]
    fn lookup_without_filler_is_rejected_and_phase_unchanged() {
        let g = guard(PreconditionMode::Advisory);
        match g.check_precondition(&find("N000123")) {
            Err(DispatchError::SequenceViolation { operation, .. }) => {
                assert_eq!(operation, "find_farmer");
            }
            other => panic!("expected SequenceViolation, got {:?}", other),
        }
        assert_eq!(g.phase(), SessionPhase::Active);
    }

    #[test]
    fn filler_is_consumed_by_one_lookup() {
        let mut g = guard(PreconditionMode::Advisory);

        g.complete(&lookup_filler());
        assert_eq!(g.phase(), SessionPhase::FillerIssued);

        assert_eq!(g.check_precondition(&find("N000123")).unwrap(), Precondition::Satisfied);
        g.complete(&find("N000123"));
        assert_eq!(g.phase(), SessionPhase::Active);

        // The next lookup needs its own filler.
        assert!(g.check_precondition(&find("N000456")).is_err());
    }

    #[test]
    fn general_filler_does_not_unlock_a_lookup() {
        let mut g = guard(PreconditionMode::Advisory);
        g.complete(&OperationCall::AgentFiller {
            message_type: FillerKind::General,
        });
        assert_eq!(g.phase(), SessionPhase::Active);
        assert!(g.check_precondition(&find("N000123")).is_err());
    }

    #[test]
    fn registration_is_not_filler_gated() {
        let g = guard(PreconditionMode::Advisory);
        assert!(g.check_precondition(&register("N000123")).is_ok());
    }

    #[test]
    fn register_precondition_is_advisory_by_default() {
        let g = guard(PreconditionMode::Advisory);
        match g.check_precondition(&register("N000123")).unwrap() {
            Precondition::AdvisoryUnmet { reason } => assert!(reason.contains("N000123")),
            other => panic!("expected AdvisoryUnmet, got {:?}", other),
        }
    }

    #[test]
    fn enforced_register_precondition_requires_matching_lookup() {
        let mut g = guard(PreconditionMode::Enforced);
        assert!(matches!(
            g.check_precondition(&register("N000123")),
            Err(DispatchError::SequenceViolation { .. })
        ));

        g.complete(&lookup_filler());
        g.complete(&find("N000123"));
        assert_eq!(g.last_lookup(), Some("N000123"));
        assert_eq!(
            g.check_precondition(&register("N000123")).unwrap(),
            Precondition::Satisfied
        );
        assert!(g.check_precondition(&register("N000999")).is_err());
    }

    #[test]
    fn closing_only_admits_end_call() {
        let mut g = guard(PreconditionMode::Advisory);
        g.begin_closing();
        assert_eq!(g.phase(), SessionPhase::Closing);

        assert!(matches!(
            g.check_precondition(&lookup_filler()),
            Err(DispatchError::SessionClosed { .. })
        ));
        assert!(g.check_precondition(&end_call()).is_ok());
    }

    #[test]
    fn check_open_refuses_by_name_while_ending() {
        let mut g = guard(PreconditionMode::Advisory);
        assert!(g.check_open("delete_farmer").is_ok());

        g.begin_closing();
        assert!(g.check_open("end_call").is_ok());
        assert!(matches!(
            g.check_open("delete_farmer"),
            Err(DispatchError::SessionClosed { operation }) if operation == "delete_farmer"
        ));

        g.complete(&end_call());
        assert!(g.check_open("end_call").is_err());
    }

    #[test]
    fn closed_rejects_everything() {
        let mut g = guard(PreconditionMode::Advisory);
        g.begin_closing();
        g.complete(&end_call());
        assert_eq!(g.phase(), SessionPhase::Closed);

        for call in [lookup_filler(), find("N000123"), register("N000123"), end_call()] {
            assert!(matches!(
                g.check_precondition(&call),
                Err(DispatchError::SessionClosed { .. })
            ));
        }
    }
}
