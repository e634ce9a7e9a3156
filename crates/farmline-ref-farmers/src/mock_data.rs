//! Simulated farmer registry data and spoken phrase tables.
//!
//! All data in this module is hardcoded and fictional. No external systems are
//! contacted.

use chrono::{TimeZone, Utc};

use farmline_contracts::{call::ServiceKind, farmer::FarmerRecord};

// ── Seed farmers (mock) ───────────────────────────────────────────────────────

/// Farmers already present in the reference directory.
///
/// Known IDs: N123432, N678906, N000451.
pub fn seed_farmers() -> Vec<FarmerRecord> {
    let registered_at = Utc
        .with_ymd_and_hms(2026, 3, 2, 9, 30, 0)
        .single()
        .unwrap_or_else(Utc::now);

    vec![
        FarmerRecord {
            national_id: "N123432".to_string(),
            name: "Meera Nair".to_string(),
            state: "Kerala".to_string(),
            crop: "Rubber".to_string(),
            yield_qty: 120,
            service: ServiceKind::Register,
            registered_at,
        },
        FarmerRecord {
            national_id: "N678906".to_string(),
            name: "Harjit Singh".to_string(),
            state: "Punjab".to_string(),
            crop: "Wheat".to_string(),
            yield_qty: 950,
            service: ServiceKind::Create,
            registered_at,
        },
        FarmerRecord {
            national_id: "N000451".to_string(),
            name: "Lakshmi Reddy".to_string(),
            state: "Andhra Pradesh".to_string(),
            crop: "Chilli".to_string(),
            yield_qty: 60,
            service: ServiceKind::Register,
            registered_at,
        },
    ]
}

// ── Phrase tables (mock) ──────────────────────────────────────────────────────

/// Spoken while a lookup is in flight.
pub const LOOKUP_FILLERS: &[&str] = &[
    "Let me look that up for you.",
    "One moment while I check our records.",
    "Give me a second, I'm pulling up the registry.",
    "Let me check that national ID for you.",
];

/// Spoken to keep the turn while the agent works on something else.
pub const GENERAL_FILLERS: &[&str] = &[
    "Just a moment.",
    "Bear with me for a second.",
    "Let me work on that.",
];

pub const THANKS_FAREWELLS: &[&str] = &[
    "Thank you for calling the farmer helpline. Have a good harvest!",
    "Thanks for reaching out. Goodbye and take care!",
];

pub const GENERAL_FAREWELLS: &[&str] = &[
    "Goodbye, and have a great day!",
    "Take care. Goodbye!",
];

pub const HELP_FAREWELLS: &[&str] = &[
    "If you need anything else, just call again. Goodbye!",
    "We're always here to help your farm. Goodbye for now!",
];
