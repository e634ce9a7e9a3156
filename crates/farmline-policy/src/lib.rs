//! # farmline-policy
//!
//! TOML-driven dispatch settings for the farmline call router.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use farmline_policy::DispatchPolicy;
//!
//! let settings = DispatchPolicy::from_file(Path::new("policies/dispatch.toml"))?.into_settings();
//! // Pass `settings` to `CallRouter::with_settings(...)`.
//! ```
//!
//! An empty document is valid and yields the router defaults.

pub mod file;
pub mod loader;

pub use file::PolicyFile;
pub use loader::DispatchPolicy;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use farmline_contracts::{
        error::FarmlineError,
        settings::{DispatchSettings, PreconditionMode, DEFAULT_HANDLER_TIMEOUT},
    };

    use crate::DispatchPolicy;

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn empty_document_yields_defaults() {
        let policy = DispatchPolicy::from_toml_str("").unwrap();
        assert_eq!(policy.settings(), &DispatchSettings::default());
        assert_eq!(policy.settings().handler_timeout, DEFAULT_HANDLER_TIMEOUT);
        assert_eq!(
            policy.settings().register_precondition,
            PreconditionMode::Advisory
        );
    }

    // ── Overrides ─────────────────────────────────────────────────────────────

    #[test]
    fn overrides_are_applied() {
        let toml = r#"
            handler_timeout_ms = 8000
            register_precondition = "enforced"
        "#;

        let settings = DispatchPolicy::from_toml_str(toml).unwrap().into_settings();
        assert_eq!(settings.handler_timeout, Duration::from_millis(8000));
        assert_eq!(settings.register_precondition, PreconditionMode::Enforced);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let settings = DispatchPolicy::from_toml_str("handler_timeout_ms = 250")
            .unwrap()
            .into_settings();
        assert_eq!(settings.handler_timeout, Duration::from_millis(250));
        assert_eq!(settings.register_precondition, PreconditionMode::Advisory);
    }

    // ── Rejections ────────────────────────────────────────────────────────────

    #[test]
    fn zero_timeout_is_a_config_error() {
        match DispatchPolicy::from_toml_str("handler_timeout_ms = 0") {
            Err(FarmlineError::Config { reason }) => {
                assert!(reason.contains("greater than zero"), "got: {reason}");
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_precondition_mode_is_rejected() {
        let result = DispatchPolicy::from_toml_str(r#"register_precondition = "strict""#);
        assert!(matches!(result, Err(FarmlineError::Config { .. })));
    }

    #[test]
    fn misspelled_key_is_rejected() {
        let result = DispatchPolicy::from_toml_str("handler_timeout = 500");
        assert!(matches!(result, Err(FarmlineError::Config { .. })));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        match DispatchPolicy::from_toml_str("this is not valid toml ][[[") {
            Err(FarmlineError::Config { reason }) => {
                assert!(
                    reason.contains("failed to parse dispatch policy TOML"),
                    "got: {reason}"
                );
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = DispatchPolicy::from_file(std::path::Path::new("/nonexistent/dispatch.toml"));
        match result {
            Err(FarmlineError::Config { reason }) => {
                assert!(reason.contains("failed to read policy file"), "got: {reason}");
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }
}
