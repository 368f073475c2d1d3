// --- File: crates/reserva_gcal/src/lib.rs ---
pub mod auth;
pub mod service;

pub use auth::{calendar_id, create_calendar_hub, HubType};
pub use service::{GcalServiceError, GoogleCalendarService};
