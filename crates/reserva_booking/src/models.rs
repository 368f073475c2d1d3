// --- File: crates/reserva_booking/src/models.rs ---
//! Request and response bodies of the booking endpoints (camelCase on the wire).

use reserva_config::ServiceConfig;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Day to check, YYYY-MM-DD
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-05-05"))]
    pub date: Option<String>,

    /// Service whose duration sizes the slots. Without it slots are one interval long.
    #[cfg_attr(feature = "openapi", schema(example = "gel-manicure"))]
    pub service_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BusyTimeView {
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T08:00:00Z"))]
    pub start: String,
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T08:30:00Z"))]
    pub end: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SlotView {
    /// Local wall-clock start, HH:MM
    #[cfg_attr(feature = "openapi", schema(example = "10:00"))]
    pub time: String,
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T10:00:00+02:00"))]
    pub start: String,
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T11:00:00+02:00"))]
    pub end: String,
    pub available: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailabilityData {
    pub date: String,
    pub busy_times: Vec<BusyTimeView>,
    pub slots: Vec<SlotView>,
}

/// Booking submission. Every field is optional here so that missing ones can be
/// reported together as `MISSING_FIELDS`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateBookingRequest {
    #[cfg_attr(feature = "openapi", schema(example = "gel-manicure"))]
    pub service_id: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "Gel manicure"))]
    pub service_title: Option<String>,
    /// RFC 3339 start of the chosen slot
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T10:00:00+02:00"))]
    pub date_time: Option<String>,
    /// Minutes
    #[cfg_attr(feature = "openapi", schema(example = 60))]
    pub duration: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingCreatedData {
    #[cfg_attr(feature = "openapi", schema(example = "VNY-38211734-4F0A"))]
    pub booking_id: String,
    pub event_id: String,
    pub message: String,
    pub service_id: String,
    pub service: String,
    pub date_time: String,
    pub end_time: String,
    pub location: Option<String>,
    pub customer_email: String,
    pub customer_name: String,
    pub customer_phone: String,
    /// Minor currency units
    pub total_price: Option<i64>,
    pub currency: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ServiceView {
    pub id: String,
    pub category_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
    pub price: i64,
    pub currency: String,
}

impl ServiceView {
    pub fn from_config(service: &ServiceConfig, default_currency: &str) -> Self {
        ServiceView {
            id: service.id.clone(),
            category_id: service.category_id.clone(),
            title: service.title.clone(),
            description: service.description.clone(),
            duration_minutes: service.duration_minutes,
            price: service.price,
            currency: service
                .currency
                .clone()
                .unwrap_or_else(|| default_currency.to_string()),
        }
    }
}
