//! Farmer records and the business outcomes backend collaborators report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::call::ServiceKind;

/// A registered farmer as the backend stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmerRecord {
    pub national_id: String,
    pub name: String,
    pub state: String,
    pub crop: String,
    /// Yield in tons.
    pub yield_qty: i64,
    pub service: ServiceKind,
    pub registered_at: DateTime<Utc>,
}

/// Result of a farmer lookup. `NotFound` is a normal answer, not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FarmerLookup {
    Found(FarmerRecord),
    NotFound { national_id: String },
}

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered(FarmerRecord),
    AlreadyExists { national_id: String },
}
