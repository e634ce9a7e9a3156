//! # farmline-audit
//!
//! Append-only, SHA-256 hash-chained record of every dispatch the call
//! router resolves, one chain per session.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use farmline_audit::InMemoryDispatchLog;
//!
//! let log = InMemoryDispatchLog::new();
//! let router = CallRouter::new(directory, announcer).with_recorder(Arc::new(log.clone()));
//! // ... dispatch ...
//! assert!(log.verify_integrity());
//! let session_log = log.export_log(&conn.id().to_string());
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{hash_event, verify_chain};
pub use event::{DispatchEvent, DispatchLog};
pub use memory::InMemoryDispatchLog;

// ── Tests ─────────────────────────────────────────────────────────────────────
