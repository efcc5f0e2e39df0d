//! Daily Pulse Ledger for Aimo Pulse.
//!
//! Holds the per-couple, per-day Today Card: each partner's latest mood, intensity,
//! message and doodle, append-only galleries of everything written that day, and reactions.

#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod keys;
pub mod ledger;
pub mod models;
pub mod routes;

pub use handlers::TodayState;
pub use ledger::{date_key, PulseLedger};
pub use models::{GalleryEntry, PulseUpdate, Reaction, SlotState, TodayCard};
pub use routes::routes;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::TodayApiDoc;
}
