//! Challenge scheduling for Aimo Pulse.
//!
//! A couple shares one weekly challenge and one daily question drawn from a fixed
//! library. Each partner completes independently; the record is archived the moment
//! both have, and history feeds the streak and points stats.

pub mod calendar;
pub mod daily;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod keys;
pub mod library;
pub mod models;
pub mod routes;
pub mod weekly;

mod logic_proptest;

pub use daily::DailyScheduler;
pub use handlers::ChallengeState;
pub use models::{ChallengeStats, Completion, DailyChallenge, DailyStats, WeeklyChallenge};
pub use routes::routes;
pub use weekly::WeeklyScheduler;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::ChallengeApiDoc;
}
