// --- File: crates/reserva_booking/src/error.rs ---
use reserva_common::error::{ErrorCode, HttpStatusCode};
use thiserror::Error;

pub const SLOT_TAKEN_MESSAGE: &str =
    "This time slot was just booked by someone else. Please select another time.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Required fields absent or blank. Raised before any calendar call.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The commit-time re-check found the slot occupied.
    #[error("{}", SLOT_TAKEN_MESSAGE)]
    Conflict,

    /// The calendar call failed. The message is passed through as is.
    #[error("{0}")]
    Upstream(String),

    /// Anything else. The detail is logged, never shown to the caller.
    #[error("Something went wrong while processing the booking")]
    Unknown(String),
}

impl BookingError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        BookingError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

impl HttpStatusCode for BookingError {
    fn status_code(&self) -> u16 {
        match self {
            BookingError::MissingFields(_) | BookingError::InvalidField { .. } => 400,
            BookingError::Conflict => 409,
            BookingError::Upstream(_) | BookingError::Unknown(_) => 500,
        }
    }
}

impl ErrorCode for BookingError {
    fn error_code(&self) -> &'static str {
        match self {
            BookingError::MissingFields(_) => "MISSING_FIELDS",
            BookingError::InvalidField { .. } => "INVALID_FIELDS",
            BookingError::Conflict => "SLOT_NO_LONGER_AVAILABLE",
            BookingError::Upstream(_) | BookingError::Unknown(_) => "BOOKING_ERROR",
        }
    }
}
