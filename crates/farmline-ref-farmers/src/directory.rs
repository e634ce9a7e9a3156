//! In-memory `FarmerDirectory` seeded with the mock farmers.
//!
//! An optional artificial latency stands in for a slow backend. The delay
//! observes the call's cancellation token, so a timed-out lookup stops
//! promptly and never mutates the directory.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use farmline_contracts::{
    call::Registration,
    error::CollaboratorError,
    farmer::{FarmerLookup, FarmerRecord, RegistrationOutcome},
};
use farmline_core::traits::{CallContext, FarmerDirectory};

use crate::mock_data::seed_farmers;

pub struct InMemoryFarmerDirectory {
    farmers: Mutex<HashMap<String, FarmerRecord>>,
    latency: Option<Duration>,
    calls: AtomicU32,
}

impl InMemoryFarmerDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self {
            farmers: Mutex::new(HashMap::new()),
            latency: None,
            calls: AtomicU32::new(0),
        }
    }

    /// A directory holding the fictional seed farmers.
    pub fn seeded() -> Self {
        let dir = Self::new();
        if let Ok(mut farmers) = dir.farmers.lock() {
            for farmer in seed_farmers() {
                farmers.insert(farmer.national_id.clone(), farmer);
            }
        }
        dir
    }

    /// Delay every backend call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of backend calls that reached the directory.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.farmers.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn simulate_latency(&self, ctx: &CallContext) -> Result<(), CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::select! {
                _ = tokio::time::sleep(latency) => {}
                _ = ctx.cancel.cancelled() => {
                    debug!(session_id = %ctx.session_id, "directory call abandoned");
                    return Err(CollaboratorError::Cancelled);
                }
            }
        }
        Ok(())
    }

    fn backend_error(reason: impl std::fmt::Display) -> CollaboratorError {
        CollaboratorError::Backend {
            reason: format!("farmer store unavailable: {}", reason),
        }
    }
}

impl Default for InMemoryFarmerDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FarmerDirectory for InMemoryFarmerDirectory {
    async fn lookup(
        &self,
        ctx: &CallContext,
        national_id: &str,
    ) -> Result<FarmerLookup, CollaboratorError> {
        self.simulate_latency(ctx).await?;

        let farmers = self.farmers.lock().map_err(Self::backend_error)?;
        let outcome = match farmers.get(national_id) {
            Some(farmer) => FarmerLookup::Found(farmer.clone()),
            None => FarmerLookup::NotFound {
                national_id: national_id.to_string(),
            },
        };

        debug!(
            session_id = %ctx.session_id,
            national_id = %national_id,
            found = matches!(outcome, FarmerLookup::Found(_)),
            "directory lookup"
        );
        Ok(outcome)
    }

    async fn register(
        &self,
        ctx: &CallContext,
        registration: &Registration,
    ) -> Result<RegistrationOutcome, CollaboratorError> {
        self.simulate_latency(ctx).await?;

        let mut farmers = self.farmers.lock().map_err(Self::backend_error)?;
        if farmers.contains_key(&registration.national_id) {
            return Ok(RegistrationOutcome::AlreadyExists {
                national_id: registration.national_id.clone(),
            });
        }

        let record = FarmerRecord {
            national_id: registration.national_id.clone(),
            name: registration.name.clone(),
            state: registration.state.clone(),
            crop: registration.crop.clone(),
            yield_qty: registration.yield_qty,
            service: registration.service,
            registered_at: Utc::now(),
        };
        farmers.insert(record.national_id.clone(), record.clone());

        debug!(
            session_id = %ctx.session_id,
            national_id = %record.national_id,
            "farmer registered"
        );
        Ok(RegistrationOutcome::Registered(record))
    }
}
