//! Scenario 1: Farmer Lookup
//!
//! The planner speaks a lookup filler before every `find_farmer`, finds one
//! registered farmer, misses another, and ends the call.
//!
//!   1. agent_filler{lookup} → FillerIssued
//!   2. find_farmer{N123432} → found, back to Active
//!   3. agent_filler{lookup} → FillerIssued
//!   4. find_farmer{N999999} → not found (still a successful call)
//!   5. end_call{thanks}     → farewell sent, Closed

use serde_json::json;

use farmline_contracts::error::FarmlineResult;

use super::Bench;

pub async fn run_scenario() -> FarmlineResult<()> {
    println!("=== Scenario 1: Farmer Lookup ===");
    println!();

    let mut bench = Bench::standard()?;

    bench.call("agent_filler", json!({ "message_type": "lookup" })).await;
    let found = bench.call("find_farmer", json!({ "national_id": "N123432" })).await;
    if let Some(payload) = &found.payload {
        println!(
            "    farmer: {} ({}, {})",
            payload["farmer"]["name"], payload["farmer"]["crop"], payload["farmer"]["state"]
        );
    }

    bench.call("agent_filler", json!({ "message_type": "lookup" })).await;
    bench.call("find_farmer", json!({ "national_id": "N999999" })).await;

    bench.call("end_call", json!({ "farewell_type": "thanks" })).await;

    println!();
    for message in bench.session.messages() {
        println!("  spoke ({:?}): \"{}\"", message.kind, message.text);
    }
    println!("  Session closed:         {}", bench.session.is_closed());
    bench.print_audit();
    let shipped = bench.log.drain_finalized();
    println!(
        "  Finalized logs drained: {} (sessions still held: {})",
        shipped.len(),
        bench.log.sessions().len()
    );
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
