//! On-disk schema for dispatch policy files.
//!
//! Every key is optional; a missing key falls back to the router default.
//!
//! ```toml
//! handler_timeout_ms = 8000
//! register_precondition = "advisory"   # or "enforced"
//! ```

use serde::{Deserialize, Serialize};

use farmline_contracts::settings::PreconditionMode;

/// A dispatch policy document as written in TOML.
///
/// Unknown keys are rejected so a misspelled setting cannot silently fall
/// back to its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyFile {
    /// Upper bound on a single handler invocation, in milliseconds. Must be
    /// greater than zero.
    #[serde(default)]
    pub handler_timeout_ms: Option<u64>,

    /// Whether `create_farmer` for an ID not previously looked up is logged
    /// (`advisory`) or rejected (`enforced`).
    #[serde(default)]
    pub register_precondition: Option<PreconditionMode>,
}
