// --- File: crates/reserva_booking/src/routes.rs ---

use crate::handlers::{
    create_booking_handler, get_availability_handler, list_services_handler, BookingState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all routes for the booking feature, relative to `/api`.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/booking/availability", get(get_availability_handler))
        .route("/booking/create", post(create_booking_handler))
        .route("/booking/services", get(list_services_handler))
        .with_state(state)
}
