// --- File: crates/reserva_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // JSON envelope and error responses
pub mod logging; // Logging utilities
pub mod services; // Calendar service abstraction


pub use error::{config_error, external_service_error, ErrorCode, HttpStatusCode, ReservaError};

pub use http::{ApiErrorBody, ApiFailure, ApiResponse, ApiResult};

pub use services::{
    BoxFuture, BoxedCalendarService, BoxedError, BusyInterval, CalendarEvent,
    CalendarEventResult, CalendarService, SharedCalendarService,
};
