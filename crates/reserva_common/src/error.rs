// --- File: crates/reserva_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// Errors raised outside the booking flow itself: startup, configuration, wiring.
#[derive(Error, Debug)]
pub enum ReservaError {
    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

/// Machine readable code carried in the `error.code` field of API responses.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

impl HttpStatusCode for ReservaError {
    fn status_code(&self) -> u16 {
        match self {
            ReservaError::ConfigError(_) => 500,
            ReservaError::ExternalServiceError { .. } => 502,
            ReservaError::InternalError(_) => 500,
        }
    }
}

impl ErrorCode for ReservaError {
    fn error_code(&self) -> &'static str {
        match self {
            ReservaError::ConfigError(_) => "CONFIG_ERROR",
            ReservaError::ExternalServiceError { .. } => "UPSTREAM_ERROR",
            ReservaError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for ReservaError {
    fn from(err: config::ConfigError) -> Self {
        ReservaError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for ReservaError {
    fn from(err: std::io::Error) -> Self {
        ReservaError::InternalError(err.to_string())
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> ReservaError {
    ReservaError::ConfigError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> ReservaError {
    ReservaError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
