//! Scenario 2: Farmer Registration
//!
//! A new caller is looked up, not found, and registered. The planner then
//! retries the registration and finally sends a malformed service value.
//!
//!   1. agent_filler{lookup}, find_farmer{N000123} → not found
//!   2. create_farmer{N000123, Abhishek, Kerala, Rubber, 1000, Register} → registered
//!   3. create_farmer again                        → already registered (Ok payload)
//!   4. create_farmer{service: "Invalid"}          → InvalidEnumValue, no handler runs
//!   5. end_call{help}

use serde_json::{json, Value};

use farmline_contracts::error::FarmlineResult;

use super::Bench;

/// The registration the planner sends for the new caller.
pub fn abhishek_registration() -> Value {
    json!({
        "national_id": "N000123",
        "name": "Abhishek",
        "state": "Kerala",
        "crop": "Rubber",
        "yield_qty": 1000,
        "service": "Register"
    })
}

pub async fn run_scenario() -> FarmlineResult<()> {
    println!("=== Scenario 2: Farmer Registration ===");
    println!();

    let mut bench = Bench::standard()?;
    let before = bench.directory.len();

    bench.call("agent_filler", json!({ "message_type": "lookup" })).await;
    bench.call("find_farmer", json!({ "national_id": "N000123" })).await;

    let registered = bench.call("create_farmer", abhishek_registration()).await;
    if let Some(message) = registered.payload.as_ref().and_then(|p| p["message"].as_str()) {
        println!("    {}", message);
    }

    bench.call("create_farmer", abhishek_registration()).await;

    let mut invalid = abhishek_registration();
    invalid["service"] = json!("Invalid");
    bench.call("create_farmer", invalid).await;

    bench.call("end_call", json!({ "farewell_type": "help" })).await;

    println!();
    println!(
        "  Directory size:         {} → {} farmer(s)",
        before,
        bench.directory.len()
    );
    bench.print_audit();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
