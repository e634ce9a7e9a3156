//! # farmline-ref-farmers
//!
//! Reference runtime for the farmer-helpline voice agent.
//!
//! Provides in-process stand-ins for every external collaborator:
//!
//! - [`InMemoryFarmerDirectory`]: farmer lookup and registration over mock data
//! - [`ScriptedAnnouncer`]: filler and farewell lines from fixed phrase tables
//! - [`RecordingSession`]: a voice transport that records instead of speaking
//!
//! and four runnable scenarios:
//!
//! 1. **Farmer Lookup**: filler-gated lookups, found and not found.
//! 2. **Farmer Registration**: the new-caller registration flow.
//! 3. **Sequencing Violations**: guard and validator refusals.
//! 4. **Slow Backend**: handler timeout and cancellation.
//!
//! All data is hardcoded and fictional. No external API calls are made.

pub mod announcer;
pub mod directory;
pub mod mock_data;
pub mod scenarios;
pub mod session;

pub use announcer::ScriptedAnnouncer;
pub use directory::InMemoryFarmerDirectory;
pub use session::RecordingSession;

// ── Tests ─────────────────────────────────────────────────────────────────────
