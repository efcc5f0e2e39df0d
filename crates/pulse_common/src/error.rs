use std::fmt;
use thiserror::Error;

/// The error type shared by every Pulse crate.
///
/// User-facing variants carry their message verbatim. Lower layers (`StoreError`, `PushError`)
/// convert into this type with `From` so `?` works across crates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PulseError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness or state precondition violated
    #[error("{0}")]
    Conflict(String),

    /// Pairing code absent, expired or no longer active
    #[error("{0}")]
    InvalidCode(String),

    /// Issuer tried to redeem their own pairing code
    #[error("{0}")]
    SelfJoin(String),

    /// Bad credentials
    #[error("{0}")]
    Auth(String),

    /// The caller is not allowed to perform this action
    #[error("{0}")]
    Forbidden(String),

    /// The key-value store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored or supplied data could not be parsed
    #[error("Failed to parse data: {0}")]
    Parse(String),

    /// A call to an external service failed
    #[error("External service error: {service_name} - {message}")]
    ExternalService {
        service_name: String,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for PulseError {
    fn status_code(&self) -> u16 {
        match self {
            PulseError::Validation(_) => 400,
            PulseError::InvalidCode(_) => 400,
            PulseError::SelfJoin(_) => 400,
            PulseError::Parse(_) => 400,
            PulseError::Auth(_) => 401,
            PulseError::Forbidden(_) => 403,
            PulseError::NotFound(_) => 404,
            PulseError::Conflict(_) => 409,
            PulseError::ExternalService { .. } => 502,
            PulseError::Storage(_) => 500,
            PulseError::Config(_) => 500,
            PulseError::Internal(_) => 500,
        }
    }
}

impl PulseError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PulseError::Validation(_) => "validation",
            PulseError::NotFound(_) => "not_found",
            PulseError::Conflict(_) => "conflict",
            PulseError::InvalidCode(_) => "invalid_code",
            PulseError::SelfJoin(_) => "self_join",
            PulseError::Auth(_) => "auth",
            PulseError::Forbidden(_) => "forbidden",
            PulseError::Storage(_) => "storage",
            PulseError::Config(_) => "config",
            PulseError::Parse(_) => "parse",
            PulseError::ExternalService { .. } => "external_service",
            PulseError::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for PulseError {
    fn from(err: serde_json::Error) -> Self {
        PulseError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for PulseError {
    fn from(err: std::io::Error) -> Self {
        PulseError::Internal(err.to_string())
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> PulseError {
    PulseError::Validation(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> PulseError {
    PulseError::NotFound(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> PulseError {
    PulseError::Conflict(message.to_string())
}

pub fn invalid_code<T: fmt::Display>(message: T) -> PulseError {
    PulseError::InvalidCode(message.to_string())
}

pub fn auth_error<T: fmt::Display>(message: T) -> PulseError {
    PulseError::Auth(message.to_string())
}

pub fn forbidden<T: fmt::Display>(message: T) -> PulseError {
    PulseError::Forbidden(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> PulseError {
    PulseError::ExternalService {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> PulseError {
    PulseError::Internal(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages_are_verbatim() {
        assert_eq!(
            conflict("Username already taken").to_string(),
            "Username already taken"
        );
        assert_eq!(
            invalid_code("Code has expired").to_string(),
            "Code has expired"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(validation_error("x").status_code(), 400);
        assert_eq!(invalid_code("x").status_code(), 400);
        assert_eq!(PulseError::SelfJoin("x".into()).status_code(), 400);
        assert_eq!(auth_error("x").status_code(), 401);
        assert_eq!(forbidden("x").status_code(), 403);
        assert_eq!(not_found("x").status_code(), 404);
        assert_eq!(conflict("x").status_code(), 409);
        assert_eq!(external_service_error("fcm", "down").status_code(), 502);
        assert_eq!(PulseError::Storage("x".into()).status_code(), 500);
        assert_eq!(internal_error("x").status_code(), 500);
    }

    #[test]
    fn test_serde_error_becomes_parse() {
        let err: PulseError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.kind(), "parse");
    }
}
