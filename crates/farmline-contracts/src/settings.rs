//! Dispatch settings shared by the router and the configuration loader.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Handler timeout used when no configuration overrides it.
pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(10);

/// How strictly `create_farmer` requires a prior `find_farmer` for the same ID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreconditionMode {
    /// Log a warning and dispatch anyway.
    #[default]
    Advisory,
    /// Reject the call as a sequence violation.
    Enforced,
}

/// Runtime knobs for the call router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Upper bound on a single handler invocation.
    pub handler_timeout: Duration,
    /// Strictness of the register-after-lookup precondition.
    pub register_precondition: PreconditionMode,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            handler_timeout: DEFAULT_HANDLER_TIMEOUT,
            register_precondition: PreconditionMode::Advisory,
        }
    }
}
