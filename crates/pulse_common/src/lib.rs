// Shared building blocks for the Pulse crates: the error taxonomy and its HTTP mapping,
// logging setup, the clock abstraction, id generation and the push service seam.

pub mod clock;
pub mod error;
pub mod http;
pub mod ids;
pub mod logging;
pub mod routes;
pub mod services;

pub use routes::routes;

pub use error::{
    auth_error, conflict, external_service_error, forbidden, internal_error, invalid_code,
    not_found, validation_error, HttpStatusCode, PulseError,
};

pub use http::{IntoHttpResponse, SuccessResponse};

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};

pub use ids::new_id;

pub use logging::{init, init_with_config, init_with_level, log_result};
