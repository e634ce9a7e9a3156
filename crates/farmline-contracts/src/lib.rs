//! # farmline-contracts
//!
//! Shared types, schemas, and error contracts for the farmline tool-calling
//! bridge.
//!
//! All crates in the workspace import from here. No dispatch logic lives in
//! this crate: only data definitions, conversions, and error types.

pub mod call;
pub mod error;
pub mod farmer;
pub mod operation;
pub mod record;
pub mod result;
pub mod session;
pub mod settings;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use call::{FarewellKind, FillerKind, NormalizedParams, OperationCall, ParamValue, ServiceKind};
    use error::{DispatchError, ValidationError};
    use operation::OperationName;
    use result::{CallResult, ErrorKind};
    use session::SessionId;

    // ── OperationName ────────────────────────────────────────────────────────

    #[test]
    fn operation_name_parses_every_wire_name() {
        for op in OperationName::ALL {
            assert_eq!(OperationName::parse(op.as_str()).unwrap(), op);
        }
    }

    #[test]
    fn operation_name_rejects_unknown() {
        let err = OperationName::parse("delete_farmer").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownOperation {
                name: "delete_farmer".to_string()
            }
        );
    }


    // ── Wire enums ───────────────────────────────────────────────────────────

    #[test]
    fn service_kind_is_case_sensitive() {
        assert_eq!(ServiceKind::parse("service", "Register").unwrap(), ServiceKind::Register);
        match ServiceKind::parse("service", "register") {
            Err(ValidationError::InvalidEnumValue { allowed, .. }) => {
                assert_eq!(allowed, vec!["Register", "Create"]);
            }
            other => panic!("expected InvalidEnumValue, got {:?}", other),
        }
    }

    #[test]
    fn wire_enums_serialize_with_their_wire_spelling() {
        assert_eq!(serde_json::to_value(FillerKind::Lookup).unwrap(), json!("lookup"));
        assert_eq!(serde_json::to_value(FarewellKind::Help).unwrap(), json!("help"));
        assert_eq!(serde_json::to_value(ServiceKind::Create).unwrap(), json!("Create"));
    }

    // ── OperationCall ────────────────────────────────────────────────────────

    #[test]
    fn create_farmer_call_from_normalized_params() {
        let mut params = NormalizedParams::default();
        params.insert("national_id", ParamValue::Text("N000123".to_string()));
        params.insert("name", ParamValue::Text("Abhishek".to_string()));
        params.insert("state", ParamValue::Text("Kerala".to_string()));
        params.insert("crop", ParamValue::Text("Rubber".to_string()));
        params.insert("yield_qty", ParamValue::Integer(1000));
        params.insert("service", ParamValue::Text("Register".to_string()));

        let call = OperationCall::from_normalized(OperationName::CreateFarmer, &params).unwrap();
        match call {
            OperationCall::CreateFarmer(reg) => {
                assert_eq!(reg.national_id, "N000123");
                assert_eq!(reg.yield_qty, 1000);
                assert_eq!(reg.service, ServiceKind::Register);
            }
            other => panic!("expected CreateFarmer, got {:?}", other),
        }
    }

    #[test]
    fn find_farmer_call_allows_absent_id() {
        let call =
            OperationCall::from_normalized(OperationName::FindFarmer, &NormalizedParams::default())
                .unwrap();
        assert_eq!(call, OperationCall::FindFarmer { national_id: None });
        assert_eq!(call.operation(), OperationName::FindFarmer);
    }

    #[test]
    fn end_call_without_farewell_is_missing_parameter() {
        let err =
            OperationCall::from_normalized(OperationName::EndCall, &NormalizedParams::default())
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredParameter);
    }

    // ── Errors and results ───────────────────────────────────────────────────

    #[test]
    fn invalid_enum_display_lists_allowed_values() {
        let err = ValidationError::InvalidEnumValue {
            name: "service".to_string(),
            value: "Invalid".to_string(),
            allowed: vec!["Register".to_string(), "Create".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid"));
        assert!(msg.contains("Register, Create"));
    }

    #[test]
    fn dispatch_error_converts_to_call_result() {
        let result: CallResult = DispatchError::SessionClosed {
            operation: "find_farmer".to_string(),
        }
        .into();
        assert_eq!(result.error_kind(), Some(ErrorKind::SessionClosed));
        assert!(!result.is_ok());
    }

    #[test]
    fn every_error_kind_has_a_distinct_spoken_hint() {
        let kinds = [
            ErrorKind::UnknownOperation,
            ErrorKind::MissingRequiredParameter,
            ErrorKind::InvalidEnumValue,
            ErrorKind::InvalidParameterType,
            ErrorKind::SequenceViolation,
            ErrorKind::SessionClosed,
            ErrorKind::HandlerFailure,
            ErrorKind::HandlerTimeout,
            ErrorKind::Cancelled,
        ];
        let hints: std::collections::HashSet<&str> =
            kinds.iter().map(|k| k.spoken_hint()).collect();
        assert_eq!(hints.len(), kinds.len());

        for kind in kinds {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
    }

    #[test]
    fn validation_kinds_are_the_pre_handler_input_errors() {
        assert!(ErrorKind::UnknownOperation.is_validation());
        assert!(ErrorKind::MissingRequiredParameter.is_validation());
        assert!(ErrorKind::InvalidEnumValue.is_validation());
        assert!(ErrorKind::InvalidParameterType.is_validation());

        assert!(!ErrorKind::SequenceViolation.is_validation());
        assert!(!ErrorKind::SessionClosed.is_validation());
        assert!(!ErrorKind::HandlerTimeout.is_validation());
    }

    #[test]
    fn session_id_new_produces_unique_values() {
        let unique: std::collections::HashSet<String> =
            (0..100).map(|_| SessionId::new().to_string()).collect();
        assert_eq!(unique.len(), 100);
    }
}
