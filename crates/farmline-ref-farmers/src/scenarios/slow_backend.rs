//! Scenario 4: Slow Backend
//!
//! The directory takes longer than the handler timeout. The router cancels
//! the lookup, reports `HandlerTimeout`, and the session stays usable: the
//! filler is not consumed, so the planner may retry the lookup directly.

use std::time::Duration;

use serde_json::json;

use farmline_contracts::{error::FarmlineResult, settings::DispatchSettings};

use super::Bench;
use crate::{directory::InMemoryFarmerDirectory, session::RecordingSession};

pub const BACKEND_LATENCY: Duration = Duration::from_secs(3);
pub const HANDLER_TIMEOUT: Duration = Duration::from_millis(400);

pub async fn run_scenario() -> FarmlineResult<()> {
    println!("=== Scenario 4: Slow Backend ===");
    println!();
    println!(
        "  Backend latency: {} ms, handler timeout: {} ms",
        BACKEND_LATENCY.as_millis(),
        HANDLER_TIMEOUT.as_millis()
    );

    let settings = DispatchSettings {
        handler_timeout: HANDLER_TIMEOUT,
        ..DispatchSettings::default()
    };
    let mut bench = Bench::with(
        InMemoryFarmerDirectory::seeded().with_latency(BACKEND_LATENCY),
        RecordingSession::new(),
        settings,
    );

    bench.call("agent_filler", json!({ "message_type": "lookup" })).await;
    bench.call("find_farmer", json!({ "national_id": "N678906" })).await;

    bench.call("agent_filler", json!({ "message_type": "general" })).await;
    bench.call("end_call", json!({ "farewell_type": "general" })).await;

    println!();
    bench.print_audit();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}
