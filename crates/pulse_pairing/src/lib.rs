//! Identity and pairing for Aimo Pulse.
//!
//! Users register with a username and password, one partner issues a short-lived 6-digit
//! code and the other redeems it to form a couple. The issuer always becomes `user1`,
//! the redeemer `user2`; every per-partner field elsewhere is keyed by that slot.
//!
//! [`CoupleDirectory`] is the membership lookup the other feature crates build on.

#[cfg(feature = "openapi")]
pub mod doc;
pub mod couples;
pub mod handlers;
pub mod identity;
pub mod keys;
pub mod models;
pub mod pairing;
pub mod routes;

pub use couples::CoupleDirectory;
pub use handlers::PairingState;
pub use identity::IdentityService;
pub use models::{CodeStatus, Couple, CoupleView, PairingCode, PublicUser, Slot, User};
pub use pairing::PairingService;
pub use routes::routes;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::PairingApiDoc;
}
