//! # farmline-core
//!
//! The dispatch runtime for the farmer voice agent.
//!
//! This crate provides:
//! - The collaborator traits (`Session`, `FarmerDirectory`, `Announcer`, `DispatchRecorder`)
//! - The `SequenceGuard` enforcing filler-before-lookup and farewell-before-teardown
//! - The `CallRouter` that wires validation, sequencing and handlers together
//! - `normalize`, turning a `CallResult` into the outbound envelope
//!
//! ## Usage
//!
//! ```rust,ignore
//! use farmline_core::{CallRouter, traits::{Session, FarmerDirectory, Announcer}};
//!
//! let router = CallRouter::new(directory, announcer);
//! let mut conn = router.open(session);
//! let envelope = router.handle(&mut conn, &request).await;
//! ```

pub mod guard;
mod handlers;
pub mod normalize;
pub mod router;
pub mod traits;

pub use guard::{Precondition, SequenceGuard};
pub use normalize::normalize;
pub use router::{CallRouter, Connection};
