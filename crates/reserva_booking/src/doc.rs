// File: crates/reserva_booking/src/doc.rs
#![cfg(feature = "openapi")]

use utoipa::OpenApi;

use crate::models::{
    AvailabilityData, AvailabilityQuery, BookingCreatedData, BusyTimeView, CreateBookingRequest,
    ServiceView, SlotView,
};
use reserva_common::http::ApiErrorBody;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_availability_handler,
        crate::handlers::create_booking_handler,
        crate::handlers::list_services_handler,
    ),
    components(
        schemas(
            AvailabilityQuery,
            AvailabilityData,
            BusyTimeView,
            SlotView,
            CreateBookingRequest,
            BookingCreatedData,
            ServiceView,
            ApiErrorBody,
        )
    ),
    tags(
        (name = "Booking", description = "Slot availability and conflict-checked reservations")
    )
)]
pub struct BookingApiDoc;
