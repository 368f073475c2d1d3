//! Test fixtures for booking integration tests
//!
//! Builds the application state on top of the in-memory calendar so the full
//! HTTP surface can be exercised without Google credentials.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Europe::Madrid;
use reserva_booking::handlers::BookingState;
use reserva_common::services::{BoxedCalendarService, BusyInterval};
use reserva_config::{parse_config_str, AppConfig, FileFormat};
use reserva_gcal::service::mock::MockCalendarService;
use std::sync::Arc;

pub const CALENDAR_ID: &str = "salon@group.calendar.google.com";

/// A Monday far enough ahead that none of its slots are in the past.
pub const MONDAY: &str = "2099-06-01";
pub const SUNDAY: &str = "2099-06-07";

const CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8086

[booking]
time_zone = "Europe/Madrid"
slot_interval_minutes = 30
currency = "EUR"
default_location_id = "murcia-centro"
open_days = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
booking_id_prefix = "VNY"

[booking.open_hours]
start = "09:00"
end = "18:00"

[[locations]]
id = "murcia-centro"
name = "Murcia Centro"

[[services]]
id = "brow-threading"
title = "Brow threading"
duration_minutes = 30
price = 1200

[[services]]
id = "gel-manicure"
category_id = "nails"
title = "Gel manicure"
duration_minutes = 60
price = 2500
"#;

pub fn create_test_config() -> AppConfig {
    parse_config_str(CONFIG, FileFormat::Toml).expect("test config should parse")
}

/// Booking state over a fresh mock calendar, returned together so tests can inspect it.
pub fn create_test_state() -> (Arc<BookingState>, Arc<MockCalendarService>) {
    let calendar = Arc::new(MockCalendarService::new());
    let shared = BoxedCalendarService::new(calendar.clone()).into_shared();
    let state = BookingState::from_config(&create_test_config(), shared, CALENDAR_ID)
        .expect("test booking settings should be valid");
    (Arc::new(state), calendar)
}

/// `hh:mm` on the test Monday in Madrid time, as UTC.
pub fn monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
    Madrid
        .with_ymd_and_hms(2099, 6, 1, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn busy(start: DateTime<Utc>, minutes: i64) -> BusyInterval {
    BusyInterval::new(start, start + Duration::minutes(minutes))
}

pub fn booking_body(service_id: &str, date_time: &str) -> serde_json::Value {
    serde_json::json!({
        "serviceId": service_id,
        "dateTime": date_time,
        "email": "ana@example.com",
        "phone": "+34 600 000 000",
        "firstName": "Ana",
        "lastName": "Ruiz",
    })
}
