//! Loads `DispatchSettings` from a TOML policy document.

use std::{path::Path, time::Duration};

use tracing::debug;

use farmline_contracts::{
    error::{FarmlineError, FarmlineResult},
    settings::DispatchSettings,
};

use crate::file::PolicyFile;

/// Dispatch settings resolved from a policy file.
///
/// ```rust,ignore
/// use farmline_policy::DispatchPolicy;
///
/// let policy = DispatchPolicy::from_file(Path::new("policies/dispatch.toml"))?;
/// let router = CallRouter::new(directory, announcer).with_settings(policy.into_settings());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchPolicy {
    settings: DispatchSettings,
}

impl DispatchPolicy {
    /// Parse `s` as a TOML policy document.
    ///
    /// Returns `FarmlineError::Config` if the TOML is malformed, names an
    /// unknown key, or sets a zero handler timeout.
    pub fn from_toml_str(s: &str) -> FarmlineResult<Self> {
        let file: PolicyFile = toml::from_str(s).map_err(|e| FarmlineError::Config {
            reason: format!("failed to parse dispatch policy TOML: {}", e),
        })?;
        Self::from_policy_file(file)
    }

    /// Read the file at `path` and parse it as a dispatch policy.
    pub fn from_file(path: &Path) -> FarmlineResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| FarmlineError::Config {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Resolve a parsed document against the defaults.
    pub fn from_policy_file(file: PolicyFile) -> FarmlineResult<Self> {
        let mut settings = DispatchSettings::default();

        if let Some(ms) = file.handler_timeout_ms {
            if ms == 0 {
                return Err(FarmlineError::Config {
                    reason: "handler_timeout_ms must be greater than zero".to_string(),
                });
            }
            settings.handler_timeout = Duration::from_millis(ms);
        }

        if let Some(mode) = file.register_precondition {
            settings.register_precondition = mode;
        }

        debug!(
            handler_timeout_ms = settings.handler_timeout.as_millis() as u64,
            register_precondition = ?settings.register_precondition,
            "dispatch policy loaded"
        );

        Ok(Self { settings })
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub fn into_settings(self) -> DispatchSettings {
        self.settings
    }
}

