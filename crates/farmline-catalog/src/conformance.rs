//! Drift check between the exported protocol schema and the validator.
//!
//! For every operation, the exported `parameters` document is compiled with
//! the `jsonschema` crate and a set of probe payloads derived from the
//! in-process schema is run through both it and the `Validator`. Any probe
//! on which the two disagree is reported as a `ConformanceFailure`.
//!
//! Probes cover a minimal valid payload, a full valid payload, each required
//! parameter omitted or set to `null`, each allowed enum value, each enum
//! given an unlisted value, and each parameter given a value of the wrong
//! JSON type.
//!
//! Two validator extensions are lenient where the exported schema is strict,
//! and are not probed:
//! - numeric strings for integer fields are coerced;
//! - `null` for an optional parameter counts as absent.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use farmline_contracts::operation::{OperationSpec, ParamSpec, ParamType};

use crate::{catalog::Catalog, validate::Validator};

/// One probe on which the exported schema and the validator disagreed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceFailure {
    pub operation: String,
    pub probe: String,
    pub message: String,
}

/// Result of checking a whole catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// True only if every probe agreed.
    pub passed: bool,
    pub probes_run: usize,
    pub failures: Vec<ConformanceFailure>,
}

struct Probe {
    label: String,
    payload: Value,
}

/// Runs probe payloads through both validation paths.
#[derive(Debug, Default)]
pub struct ConformanceChecker;

impl ConformanceChecker {
    pub fn new() -> Self {
        Self
    }

    /// Check the catalog's own export against its validator.
    pub fn check(&self, catalog: &Catalog) -> ConformanceReport {
        self.check_against(&catalog.export(), catalog)
    }

    /// Check an externally held set of function definitions (for example a
    /// file deployed to the planner side) against the in-process validator.
    pub fn check_against(&self, exported: &[Value], catalog: &Catalog) -> ConformanceReport {
        let validator = Validator::new(catalog);
        let mut failures = Vec::new();
        let mut probes_run = 0;

        for spec in catalog.iter() {
            let name = spec.name.as_str();
            let definition = exported
                .iter()
                .find(|entry| entry.get("name").and_then(Value::as_str) == Some(name));

            let Some(schema) = definition.and_then(|entry| entry.get("parameters")) else {
                let message = "no exported definition with parameters".to_string();
                warn!(operation = %name, %message, "conformance failure");
                failures.push(ConformanceFailure {
                    operation: name.to_string(),
                    probe: "definition".to_string(),
                    message,
                });
                continue;
            };

            let compiled = match jsonschema::validator_for(schema) {
                Ok(compiled) => compiled,
                Err(e) => {
                    let message = format!("exported schema does not compile: {e}");
                    warn!(operation = %name, %message, "conformance failure");
                    failures.push(ConformanceFailure {
                        operation: name.to_string(),
                        probe: "compile".to_string(),
                        message,
                    });
                    continue;
                }
            };

            for probe in probes_for(spec) {
                probes_run += 1;
                let schema_accepts = compiled.is_valid(&probe.payload);
                let validator_verdict = validator.normalize(name, &probe.payload);

                if schema_accepts != validator_verdict.is_ok() {
                    let message = match validator_verdict {
                        Ok(_) => "validator accepted a payload the exported schema rejects".to_string(),
                        Err(e) => format!("exported schema accepted a payload the validator rejects: {e}"),
                    };
                    warn!(operation = %name, probe = %probe.label, %message, "conformance failure");
                    failures.push(ConformanceFailure {
                        operation: name.to_string(),
                        probe: probe.label,
                        message,
                    });
                }
            }
        }

        let passed = failures.is_empty();
        debug!(probes_run, passed, failure_count = failures.len(), "conformance check complete");

        ConformanceReport {
            passed,
            probes_run,
            failures,
        }
    }
}

fn sample_value(param: &ParamSpec) -> Value {
    match param.param_type {
        ParamType::String => json!(format!("sample-{}", param.name)),
        ParamType::Integer => json!(42),
        ParamType::Enum => json!(param.allowed_values.first().cloned().unwrap_or_default()),
    }
}

fn wrong_type_value(param: &ParamSpec) -> Value {
    match param.param_type {
        ParamType::String | ParamType::Enum => json!(7),
        ParamType::Integer => json!(true),
    }
}

fn payload_with(spec: &OperationSpec, include: impl Fn(&ParamSpec) -> bool) -> Map<String, Value> {
    spec.parameters
        .params
        .iter()
        .filter(|p| include(p))
        .map(|p| (p.name.clone(), sample_value(p)))
        .collect()
}

fn probes_for(spec: &OperationSpec) -> Vec<Probe> {
    let minimal = payload_with(spec, |p| p.required);
    let full = payload_with(spec, |_| true);

    let mut probes = vec![
        Probe {
            label: "minimal-valid".to_string(),
            payload: Value::Object(minimal.clone()),
        },
        Probe {
            label: "full-valid".to_string(),
            payload: Value::Object(full.clone()),
        },
    ];

    for param in &spec.parameters.params {
        if param.required {
            let mut payload = minimal.clone();
            payload.remove(&param.name);
            probes.push(Probe {
                label: format!("omit-{}", param.name),
                payload: Value::Object(payload),
            });

            let mut payload = minimal.clone();
            payload.insert(param.name.clone(), Value::Null);
            probes.push(Probe {
                label: format!("null-{}", param.name),
                payload: Value::Object(payload),
            });
        }

        if param.param_type == ParamType::Enum {
            for allowed in &param.allowed_values {
                let mut payload = full.clone();
                payload.insert(param.name.clone(), json!(allowed));
                probes.push(Probe {
                    label: format!("enum-{}-{}", param.name, allowed),
                    payload: Value::Object(payload),
                });
            }

            let mut payload = full.clone();
            payload.insert(param.name.clone(), json!("__not_allowed__"));
            probes.push(Probe {
                label: format!("bad-enum-{}", param.name),
                payload: Value::Object(payload),
            });
        }

        let mut payload = full.clone();
        payload.insert(param.name.clone(), wrong_type_value(param));
        probes.push(Probe {
            label: format!("wrong-type-{}", param.name),
            payload: Value::Object(payload),
        });
    }

    probes
}
