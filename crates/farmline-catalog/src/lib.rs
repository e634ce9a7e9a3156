//! # farmline-catalog
//!
//! The operation catalog for the farmer voice agent, its protocol export,
//! and the validator that checks incoming calls against it.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use farmline_catalog::{Catalog, Validator};
//!
//! let catalog = Catalog::standard();
//! let definitions = catalog.export(); // hand to the planner
//! let call = Validator::new(catalog).validate("end_call", &json!({ "farewell_type": "thanks" }))?;
//! ```

pub mod catalog;
pub mod conformance;
pub mod export;
pub mod validate;

pub use catalog::Catalog;
pub use conformance::{ConformanceChecker, ConformanceFailure, ConformanceReport};
pub use export::{export_operation, export_parameters, parse_operation, parse_parameters};
pub use validate::Validator;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use farmline_contracts::{
        call::{FarewellKind, FillerKind, OperationCall, ServiceKind},
        error::ValidationError,
        operation::OperationName,
    };

    use super::*;

    // ── Catalog ───────────────────────────────────────────────────────────────

    #[test]
    fn standard_catalog_declares_four_operations_in_order() {
        let names: Vec<&str> = Catalog::standard().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["agent_filler", "find_farmer", "create_farmer", "end_call"]);
    }

    #[test]
    fn only_find_farmer_requires_a_filler() {
        let catalog = Catalog::standard();
        assert!(catalog.requires_preceding_filler(OperationName::FindFarmer));
        assert!(!catalog.requires_preceding_filler(OperationName::AgentFiller));
        assert!(!catalog.requires_preceding_filler(OperationName::CreateFarmer));
        assert!(!catalog.requires_preceding_filler(OperationName::EndCall));
    }

    #[test]
    fn lookup_reports_operations_missing_from_a_custom_catalog() {
        let catalog = Catalog::from_specs(vec![]);
        match catalog.lookup("end_call") {
            Err(ValidationError::UnknownOperation { name }) => assert_eq!(name, "end_call"),
            other => panic!("expected UnknownOperation, got {:?}", other),
        }
    }

    // ── Export ────────────────────────────────────────────────────────────────

    #[test]
    fn export_matches_protocol_shape() {
        let exported = Catalog::standard().export();
        assert_eq!(exported.len(), 4);

        let end_call = &exported[3];
        assert_eq!(end_call["name"], json!("end_call"));
        assert_eq!(end_call["parameters"]["type"], json!("object"));
        assert_eq!(
            end_call["parameters"]["properties"]["farewell_type"]["enum"],
            json!(["thanks", "general", "help"])
        );
        assert_eq!(
            end_call["parameters"]["properties"]["farewell_type"]["type"],
            json!("string")
        );
        assert_eq!(end_call["parameters"]["required"], json!(["farewell_type"]));
    }

    #[test]
    fn export_omits_required_when_nothing_is_required() {
        let exported = Catalog::standard().export();
        let find_farmer = &exported[1];
        assert_eq!(find_farmer["name"], json!("find_farmer"));
        assert!(find_farmer["parameters"].get("required").is_none());
    }

    #[test]
    fn export_preserves_parameter_declaration_order() {
        let exported = Catalog::standard().export();
        let keys: Vec<&String> = exported[2]["parameters"]["properties"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(
            keys,
            vec!["national_id", "name", "state", "crop", "yield_qty", "service"]
        );
        assert_eq!(
            exported[2]["parameters"]["properties"]["yield_qty"]["type"],
            json!("integer")
        );
    }

    /// Exporting and re-parsing yields exactly the constraints the validator
    /// enforces in-process.
    #[test]
    fn export_round_trips_to_identical_schemas() {
        let catalog = Catalog::standard();
        for entry in catalog.export() {
            let (operation, schema) = parse_operation(&entry).unwrap();
            let original = catalog.get(operation).unwrap();
            assert_eq!(schema, original.parameters, "schema drift for {operation}");
        }
    }

    #[test]
    fn parse_rejects_unsupported_property_type() {
        let entry = json!({
            "name": "find_farmer",
            "description": "x",
            "parameters": {
                "type": "object",
                "properties": { "national_id": { "type": "boolean" } }
            }
        });
        assert!(parse_operation(&entry).is_err());
    }

    #[test]
    fn parse_rejects_required_without_property() {
        let parameters = json!({
            "type": "object",
            "properties": {},
            "required": ["farewell_type"]
        });
        assert!(parse_parameters(&parameters).is_err());
    }

    // ── Validator ─────────────────────────────────────────────────────────────

    fn validator() -> Validator<'static> {
        Validator::new(Catalog::standard())
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let err = validator().validate("delete_farmer", &json!({})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownOperation {
                name: "delete_farmer".to_string()
            }
        );
    }

    #[test]
    fn missing_required_parameter_names_the_field() {
        let err = validator()
            .validate(
                "create_farmer",
                &json!({
                    "national_id": "N000123",
                    "name": "Abhishek",
                    "state": "Kerala",
                    "yield_qty": 1000,
                    "service": "Register"
                }),
            )
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredParameter {
                name: "crop".to_string()
            }
        );
    }

    #[test]
    fn invalid_service_lists_allowed_values() {
        let err = validator()
            .validate(
                "create_farmer",
                &json!({
                    "national_id": "N000123",
                    "name": "Abhishek",
                    "state": "Kerala",
                    "crop": "Rubber",
                    "yield_qty": 1000,
                    "service": "Invalid"
                }),
            )
            .unwrap_err();
        match err {
            ValidationError::InvalidEnumValue { name, value, allowed } => {
                assert_eq!(name, "service");
                assert_eq!(value, "Invalid");
                assert_eq!(allowed, vec!["Register".to_string(), "Create".to_string()]);
            }
            other => panic!("expected InvalidEnumValue, got {:?}", other),
        }
    }

    #[test]
    fn yield_qty_accepts_numeric_strings_and_integral_floats() {
        for raw in [json!("1000"), json!(" 1000 "), json!(1000.0), json!(1000)] {
            let call = validator()
                .validate(
                    "create_farmer",
                    &json!({
                        "national_id": "N000123",
                        "name": "Abhishek",
                        "state": "Kerala",
                        "crop": "Rubber",
                        "yield_qty": raw,
                        "service": "Create"
                    }),
                )
                .unwrap();
            match call {
                OperationCall::CreateFarmer(reg) => {
                    assert_eq!(reg.yield_qty, 1000);
                    assert_eq!(reg.service, ServiceKind::Create);
                }
                other => panic!("expected CreateFarmer, got {:?}", other),
            }
        }
    }

    #[test]
    fn yield_qty_rejects_non_numeric_values() {
        for raw in [json!("lots"), json!(12.5), json!(true)] {
            let err = validator()
                .validate(
                    "create_farmer",
                    &json!({
                        "national_id": "N000123",
                        "name": "Abhishek",
                        "state": "Kerala",
                        "crop": "Rubber",
                        "yield_qty": raw,
                        "service": "Create"
                    }),
                )
                .unwrap_err();
            assert_eq!(
                err,
                ValidationError::InvalidParameterType {
                    name: "yield_qty".to_string(),
                    expected: "integer".to_string()
                }
            );
        }
    }

    #[test]
    fn national_id_passes_through_unchanged() {
        // Format hints are for the planner; the validator does not rewrite IDs.
        let call = validator()
            .validate("find_farmer", &json!({ "national_id": "123432" }))
            .unwrap();
        assert_eq!(
            call,
            OperationCall::FindFarmer {
                national_id: Some("123432".to_string())
            }
        );
    }

    #[test]
    fn null_and_non_object_params_count_as_absent() {
        let call = validator().validate("find_farmer", &json!({ "national_id": null })).unwrap();
        assert_eq!(call, OperationCall::FindFarmer { national_id: None });

        let err = validator().validate("end_call", &serde_json::Value::Null).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredParameter {
                name: "farewell_type".to_string()
            }
        );
    }

    #[test]
    fn undeclared_parameters_are_dropped() {
        let (_, params) = validator()
            .normalize(
                "agent_filler",
                &json!({ "message_type": "lookup", "tone": "cheerful" }),
            )
            .unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.text("message_type"), Some("lookup"));
    }

    #[test]
    fn filler_and_farewell_build_typed_calls() {
        assert_eq!(
            validator()
                .validate("agent_filler", &json!({ "message_type": "general" }))
                .unwrap(),
            OperationCall::AgentFiller {
                message_type: FillerKind::General
            }
        );
        assert_eq!(
            validator()
                .validate("end_call", &json!({ "farewell_type": "help" }))
                .unwrap(),
            OperationCall::EndCall {
                farewell_type: FarewellKind::Help
            }
        );
    }

    // ── Conformance ───────────────────────────────────────────────────────────

    #[test]
    fn standard_catalog_conforms_to_its_export() {
        let report = ConformanceChecker::new().check(Catalog::standard());
        assert!(report.passed, "unexpected drift: {:?}", report.failures);
        assert!(report.probes_run > 0);
    }

    #[test]
    fn conformance_detects_a_stale_definition_file() {
        let catalog = Catalog::standard();
        let mut exported = catalog.export();

        // A planner-side copy that lost a farewell option and the
        // create_farmer required list.
        exported[3]["parameters"]["properties"]["farewell_type"]["enum"] =
            json!(["thanks", "general"]);
        exported[2]["parameters"]
            .as_object_mut()
            .unwrap()
            .remove("required");

        let report = ConformanceChecker::new().check_against(&exported, catalog);
        assert!(!report.passed);

        let probes: Vec<&str> = report.failures.iter().map(|f| f.probe.as_str()).collect();
        assert!(probes.contains(&"enum-farewell_type-help"), "failures: {:?}", probes);
        assert!(probes.contains(&"omit-crop"), "failures: {:?}", probes);
    }

    #[test]
    fn required_null_is_rejected_by_both_sides() {
        let catalog = Catalog::standard();
        let exported = catalog.export();
        let schema = jsonschema::validator_for(&exported[3]["parameters"]).unwrap();
        let payload = json!({ "farewell_type": null });

        assert!(!schema.is_valid(&payload));
        assert!(matches!(
            Validator::new(catalog).normalize("end_call", &payload),
            Err(ValidationError::MissingRequiredParameter { .. })
        ));

        let report = ConformanceChecker::new().check(catalog);
        assert!(report.passed);
    }

    #[test]
    fn optional_null_is_a_validator_only_extension() {
        let catalog = Catalog::standard();
        let exported = catalog.export();
        let schema = jsonschema::validator_for(&exported[1]["parameters"]).unwrap();
        let payload = json!({ "national_id": null });

        // The planner is told to omit the field; the validator forgives a null.
        assert!(!schema.is_valid(&payload));
        let (_, params) = Validator::new(catalog).normalize("find_farmer", &payload).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn conformance_reports_missing_definitions() {
        let catalog = Catalog::standard();
        let exported: Vec<serde_json::Value> = catalog.export().into_iter().take(3).collect();

        let report = ConformanceChecker::new().check_against(&exported, catalog);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].operation, "end_call");
        assert_eq!(report.failures[0].probe, "definition");
    }
}
