//! Scenario 3: Sequencing Violations
//!
//! Shows each way the guard and validator refuse a call before any
//! collaborator runs, and the farewell-before-teardown rule.
//!
//! Sub-case A: find_farmer with no filler       → SequenceViolation
//! Sub-case B: unknown operation                → UnknownOperation
//! Sub-case C: enforced register-after-lookup   → SequenceViolation
//! Sub-case D: farewell fails, then retried     → Closing, then Closed
//! Sub-case E: anything after Closed            → SessionClosed

use serde_json::json;

use farmline_contracts::{
    error::FarmlineResult,
    settings::{DispatchSettings, PreconditionMode},
};

use super::{farmer_registration::abhishek_registration, Bench};
use crate::{directory::InMemoryFarmerDirectory, session::RecordingSession};

pub async fn run_scenario() -> FarmlineResult<()> {
    println!("=== Scenario 3: Sequencing Violations ===");
    println!();

    // ── Sub-cases A and B ─────────────────────────────────────────────────────

    {
        println!("  Sub-case A/B: lookup without filler, unknown operation");
        let mut bench = Bench::standard()?;

        bench.call("find_farmer", json!({ "national_id": "N123432" })).await;
        bench.call("delete_farmer", json!({ "national_id": "N123432" })).await;

        println!("    directory calls made: {}", bench.directory.call_count());
        println!();
    }

    // ── Sub-case C ────────────────────────────────────────────────────────────

    {
        println!("  Sub-case C: register-after-lookup enforced");
        let settings = DispatchSettings {
            register_precondition: PreconditionMode::Enforced,
            ..DispatchSettings::default()
        };
        let mut bench = Bench::with(
            InMemoryFarmerDirectory::seeded(),
            RecordingSession::new(),
            settings,
        );

        bench.call("create_farmer", abhishek_registration()).await;
        bench.call("agent_filler", json!({ "message_type": "lookup" })).await;
        bench.call("find_farmer", json!({ "national_id": "N000123" })).await;
        bench.call("create_farmer", abhishek_registration()).await;
        println!();
    }

    // ── Sub-cases D and E ─────────────────────────────────────────────────────

    {
        println!("  Sub-case D/E: farewell must be sent before teardown");
        let mut bench = Bench::with(
            InMemoryFarmerDirectory::seeded(),
            RecordingSession::failing(),
            DispatchSettings::default(),
        );

        bench.call("end_call", json!({ "farewell_type": "general" })).await;
        bench.call("agent_filler", json!({ "message_type": "general" })).await;

        bench.session.set_failing(false);
        bench.call("end_call", json!({ "farewell_type": "general" })).await;
        println!("    close() calls: {}", bench.session.close_count());

        bench.call("end_call", json!({ "farewell_type": "thanks" })).await;
        bench.call("agent_filler", json!({ "message_type": "lookup" })).await;

        bench.print_audit();
        println!();
    }

    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}
