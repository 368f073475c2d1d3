// File: crates/reserva_booking/src/handlers.rs
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{Duration, NaiveDate, Utc};
use reserva_common::http::{ApiFailure, ApiResponse, ApiResult};
use reserva_common::services::SharedCalendarService;
use reserva_config::AppConfig;
use std::sync::Arc;
use tracing::info;

use crate::availability::{AvailabilityResolver, DayAvailability};
use crate::catalog::ServiceCatalog;
use crate::error::BookingError;
use crate::models::{
    AvailabilityData, AvailabilityQuery, BookingCreatedData, BusyTimeView, CreateBookingRequest,
    ServiceView, SlotView,
};
use crate::reservation::{BookingConfirmation, ReservationCoordinator, ReservationOutcome};
use crate::settings::{BookingSettings, SettingsError};

pub const BOOKING_CREATED_MESSAGE: &str = "Booking created successfully";

// Shared state needed by the booking handlers
pub struct BookingState {
    pub settings: BookingSettings,
    pub catalog: ServiceCatalog,
    pub calendar: SharedCalendarService,
    pub calendar_id: String,
}

impl BookingState {
    pub fn from_config(
        config: &AppConfig,
        calendar: SharedCalendarService,
        calendar_id: impl Into<String>,
    ) -> Result<Self, SettingsError> {
        Ok(BookingState {
            settings: BookingSettings::try_from(&config.booking)?,
            catalog: ServiceCatalog::from_config(config),
            calendar,
            calendar_id: calendar_id.into(),
        })
    }
}

fn availability_failure(err: BookingError) -> ApiFailure {
    match err {
        BookingError::MissingFields(_) | BookingError::InvalidField { .. } => {
            ApiFailure::from_error(&err)
        }
        other => ApiFailure::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "AVAILABILITY_ERROR",
            other.to_string(),
        ),
    }
}

fn availability_view(day: DayAvailability) -> AvailabilityData {
    AvailabilityData {
        date: day.date.format("%Y-%m-%d").to_string(),
        busy_times: day
            .busy
            .iter()
            .map(|b| BusyTimeView {
                start: b.start.to_rfc3339(),
                end: b.end.to_rfc3339(),
            })
            .collect(),
        slots: day
            .slots
            .iter()
            .map(|s| SlotView {
                time: s.slot.start.format("%H:%M").to_string(),
                start: s.slot.start.to_rfc3339(),
                end: s.slot.end.to_rfc3339(),
                available: s.available,
            })
            .collect(),
    }
}

fn confirmation_view(confirmation: BookingConfirmation) -> BookingCreatedData {
    BookingCreatedData {
        booking_id: confirmation.booking_id,
        event_id: confirmation.event_id,
        message: BOOKING_CREATED_MESSAGE.to_string(),
        service_id: confirmation.service_id,
        service: confirmation.service_title,
        date_time: confirmation.start.to_rfc3339(),
        end_time: confirmation.end.to_rfc3339(),
        location: confirmation.location,
        customer_email: confirmation.customer_email,
        customer_name: confirmation.customer_name,
        customer_phone: confirmation.customer_phone,
        total_price: confirmation.total_price,
        currency: confirmation.currency,
    }
}

/// Slots for one day, annotated against the calendar's busy intervals.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/booking/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Busy times and annotated slots for the day", body = AvailabilityData),
        (status = 400, description = "Missing or malformed date/serviceId", body = reserva_common::http::ApiErrorBody),
        (status = 500, description = "Calendar query failed", body = reserva_common::http::ApiErrorBody)
    ),
    tag = "Booking"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<AvailabilityData> {
    let date = query
        .date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| availability_failure(BookingError::MissingFields(vec!["date"])))?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| availability_failure(BookingError::invalid("date", "expected YYYY-MM-DD")))?;

    let duration = match query.service_id.as_deref().filter(|id| !id.is_empty()) {
        Some(service_id) => {
            let service = state.catalog.get(service_id).ok_or_else(|| {
                availability_failure(BookingError::invalid(
                    "serviceId",
                    format!("unknown service {}", service_id),
                ))
            })?;
            Duration::minutes(service.duration_minutes)
        }
        None => state.settings.slot_interval,
    };

    let resolver =
        AvailabilityResolver::new(state.calendar.as_ref(), &state.calendar_id, &state.settings);
    let day = resolver
        .resolve(date, duration, Utc::now())
        .await
        .map_err(availability_failure)?;

    Ok(Json(ApiResponse::ok(availability_view(day))))
}

/// Re-checks the chosen slot and, if still free, books it.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/create",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created", body = BookingCreatedData),
        (status = 400, description = "MISSING_FIELDS or INVALID_FIELDS", body = reserva_common::http::ApiErrorBody),
        (status = 409, description = "SLOT_NO_LONGER_AVAILABLE", body = reserva_common::http::ApiErrorBody),
        (status = 500, description = "BOOKING_ERROR", body = reserva_common::http::ApiErrorBody)
    ),
    tag = "Booking"
))]
pub async fn create_booking_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> ApiResult<BookingCreatedData> {
    let Json(submission) = payload.map_err(|rejection| {
        info!("Rejected booking body: {}", rejection);
        ApiFailure::from_error(&BookingError::invalid("body", rejection.body_text()))
    })?;

    let coordinator =
        ReservationCoordinator::new(state.calendar.as_ref(), &state.calendar_id, &state.settings);

    match coordinator.submit(&submission, &state.catalog, Utc::now()).await {
        Ok(ReservationOutcome::Confirmed(confirmation)) => {
            Ok(Json(ApiResponse::ok(confirmation_view(confirmation))))
        }
        Ok(ReservationOutcome::Conflict { overlapping }) => {
            info!("Booking rejected, {} overlapping busy intervals", overlapping.len());
            Err(ApiFailure::from_error(&BookingError::Conflict))
        }
        Err(err) => {
            info!("Booking failed: {}", err);
            Err(ApiFailure::from_error(&err))
        }
    }
}

/// The static service catalog.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/booking/services",
    responses(
        (status = 200, description = "Bookable services", body = [ServiceView])
    ),
    tag = "Booking"
))]
pub async fn list_services_handler(
    State(state): State<Arc<BookingState>>,
) -> ApiResult<Vec<ServiceView>> {
    let services = state
        .catalog
        .services()
        .iter()
        .map(|service| ServiceView::from_config(service, &state.settings.currency))
        .collect();
    Ok(Json(ApiResponse::ok(services)))
}
