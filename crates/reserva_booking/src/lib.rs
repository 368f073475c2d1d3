// --- File: crates/reserva_booking/src/lib.rs ---
pub mod availability;
#[cfg(test)]
mod availability_test;
pub mod catalog;
pub mod doc;
pub mod error;
pub mod flow;
pub mod handlers;
pub mod models;
pub mod reservation;
pub mod routes;
pub mod settings;
pub mod slots;
#[cfg(test)]
mod slots_proptest;
#[cfg(test)]
mod slots_test;

pub use availability::{AvailabilityResolver, DayAvailability, SlotAvailability};
pub use error::BookingError;
pub use flow::{BookingFlow, BookingStep, CommitSignal};
pub use reservation::{BookingConfirmation, ReservationCoordinator, ReservationOutcome};
pub use settings::BookingSettings;
pub use slots::{generate_slots, CandidateSlot};
