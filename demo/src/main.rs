//! Farmer Helpline Voice Agent: Demo CLI
//!
//! Runs the reference scenarios, prints the operation catalog the planner is
//! configured with, and dispatches single raw calls through the real router.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- lookup
//!   cargo run -p demo -- catalog --check
//!   cargo run -p demo -- dispatch --name find_farmer --params '{"national_id":"N123432"}' --with-filler

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use farmline_catalog::{Catalog, ConformanceChecker};
use farmline_contracts::{
    error::{FarmlineError, FarmlineResult},
    settings::DispatchSettings,
};
use farmline_policy::DispatchPolicy;
use farmline_ref_farmers::{
    scenarios::{farmer_lookup, farmer_registration, sequencing_violations, slow_backend, Bench},
    InMemoryFarmerDirectory, RecordingSession,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Farmline: tool-calling bridge for the farmer helpline voice agent.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Farmer helpline voice-agent bridge demo",
    long_about = "Runs farmline scenarios showing catalog validation, filler-before-lookup\n\
                  sequencing, farewell-before-teardown, handler timeouts, and the\n\
                  hash-chained dispatch log."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four scenarios in sequence.
    RunAll,
    /// Scenario 1: Farmer Lookup (filler-gated lookups).
    Lookup,
    /// Scenario 2: Farmer Registration (new caller flow).
    Register,
    /// Scenario 3: Sequencing Violations (guard and validator refusals).
    Violations,
    /// Scenario 4: Slow Backend (handler timeout).
    Timeout,
    /// Print the operation definitions handed to the planner.
    Catalog {
        /// Check the definitions against the in-process validator.
        #[arg(long)]
        check: bool,
        /// Check this definitions file instead of the catalog's own export.
        #[arg(long, requires = "check")]
        against: Option<PathBuf>,
    },
    /// Dispatch one raw call on a fresh connection.
    Dispatch {
        /// Operation name, e.g. `find_farmer`.
        #[arg(long)]
        name: String,
        /// Parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
        /// Speak a lookup filler first.
        #[arg(long)]
        with_filler: bool,
        /// Dispatch policy TOML. Defaults apply when omitted.
        #[arg(long)]
        policy: Option<PathBuf>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => {
            print_banner();
            run_all().await
        }
        Command::Lookup => {
            print_banner();
            farmer_lookup::run_scenario().await
        }
        Command::Register => {
            print_banner();
            farmer_registration::run_scenario().await
        }
        Command::Violations => {
            print_banner();
            sequencing_violations::run_scenario().await
        }
        Command::Timeout => {
            print_banner();
            slow_backend::run_scenario().await
        }
        Command::Catalog { check, against } => print_catalog(check, against.as_deref()),
        Command::Dispatch {
            name,
            params,
            with_filler,
            policy,
        } => dispatch_one(policy.as_deref(), &name, &params, with_filler).await,
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

async fn run_all() -> FarmlineResult<()> {
    farmer_lookup::run_scenario().await?;
    farmer_registration::run_scenario().await?;
    sequencing_violations::run_scenario().await?;
    slow_backend::run_scenario().await?;
    println!("All scenarios completed successfully.");
    Ok(())
}

// ── Catalog ───────────────────────────────────────────────────────────────────

fn print_catalog(check: bool, against: Option<&Path>) -> FarmlineResult<()> {
    let catalog = Catalog::standard();

    let definitions = match against {
        Some(path) => read_definitions(path)?,
        None => catalog.export(),
    };

    if !check {
        let rendered = serde_json::to_string_pretty(&definitions).map_err(|e| {
            FarmlineError::Catalog {
                reason: format!("failed to render definitions: {}", e),
            }
        })?;
        println!("{}", rendered);
        return Ok(());
    }

    let report = ConformanceChecker::new().check_against(&definitions, catalog);
    println!(
        "Conformance: {} ({} probe(s), {} failure(s))",
        if report.passed { "PASS" } else { "FAIL" },
        report.probes_run,
        report.failures.len()
    );
    for failure in &report.failures {
        println!("  {} [{}]: {}", failure.operation, failure.probe, failure.message);
    }

    if report.passed {
        Ok(())
    } else {
        Err(FarmlineError::Catalog {
            reason: "definitions disagree with the in-process validator".to_string(),
        })
    }
}

fn read_definitions(path: &Path) -> FarmlineResult<Vec<Value>> {
    let contents = std::fs::read_to_string(path).map_err(|e| FarmlineError::Catalog {
        reason: format!("failed to read definitions '{}': {}", path.display(), e),
    })?;
    serde_json::from_str(&contents).map_err(|e| FarmlineError::Catalog {
        reason: format!("definitions '{}' are not a JSON array: {}", path.display(), e),
    })
}

// ── Single dispatch ───────────────────────────────────────────────────────────

async fn dispatch_one(
    policy: Option<&Path>,
    name: &str,
    params: &str,
    with_filler: bool,
) -> FarmlineResult<()> {
    let settings = match policy {
        Some(path) => DispatchPolicy::from_file(path)?.into_settings(),
        None => DispatchSettings::default(),
    };
    debug!(settings = ?settings, "dispatch settings");

    let parameters: Value = serde_json::from_str(params).map_err(|e| FarmlineError::Config {
        reason: format!("--params is not valid JSON: {}", e),
    })?;

    let mut bench = Bench::with(
        InMemoryFarmerDirectory::seeded(),
        RecordingSession::new(),
        settings,
    );

    if with_filler {
        bench
            .call("agent_filler", serde_json::json!({ "message_type": "lookup" }))
            .await;
    }
    let envelope = bench.call(name, parameters).await;

    let rendered = serde_json::to_string_pretty(&envelope).map_err(|e| FarmlineError::Catalog {
        reason: format!("failed to render envelope: {}", e),
    })?;
    println!();
    println!("{}", rendered);
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Farmline: Farmer Helpline Voice Agent Bridge");
    println!("Reference Demo");
    println!("=============================================");
    println!();
    println!("Dispatch pipeline per planner call:");
    println!("  [1] Validator checks the call against the operation catalog");
    println!("  [2] Sequencing guard: lookup needs a filler, closed sessions refuse calls");
    println!("  [3] Handler runs under a timeout, ONLY after steps 1 & 2 pass");
    println!("  [4] Phase transition; end_call closes the session after the farewell");
    println!("  [5] Result normalized to an envelope; record appended to the SHA-256 chain");
    println!();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn policy_belongs_to_dispatch() {
        let cli = Cli::try_parse_from([
            "demo",
            "dispatch",
            "--name",
            "end_call",
            "--policy",
            "policies/dispatch.toml",
        ])
        .unwrap();
        match cli.command {
            Command::Dispatch { policy, params, .. } => {
                assert_eq!(policy.unwrap().to_str(), Some("policies/dispatch.toml"));
                assert_eq!(params, "{}");
            }
            _ => panic!("expected dispatch"),
        }
    }

    #[test]
    fn scenarios_refuse_a_policy_they_would_ignore() {
        assert!(Cli::try_parse_from(["demo", "lookup", "--policy", "p.toml"]).is_err());
        assert!(Cli::try_parse_from(["demo", "--policy", "p.toml", "run-all"]).is_err());
    }

    #[test]
    fn against_requires_check() {
        assert!(Cli::try_parse_from(["demo", "catalog", "--against", "defs.json"]).is_err());
        assert!(Cli::try_parse_from(["demo", "catalog", "--check", "--against", "defs.json"]).is_ok());
    }
}
