// --- File: crates/reserva_booking/src/reservation.rs ---
//! Committing a booking against the shared calendar.
//!
//! Optimistic concurrency: the chosen slot is re-checked with a free/busy query over
//! exactly `[start, end)` immediately before the event insert. Two submissions racing
//! inside the provider's consistency window can both pass the check; the calendar
//! remains the system of record.

use chrono::{DateTime, Datelike, Duration, Utc};
use chrono_tz::Tz;
use reserva_common::services::{BusyInterval, CalendarEvent, CalendarService};
use tracing::{error, info, warn};

use crate::availability::overlapping;
use crate::catalog::ServiceCatalog;
use crate::error::BookingError;
use crate::models::CreateBookingRequest;
use crate::settings::BookingSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
}

impl ContactDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A validated booking request. Consumed by [`ReservationCoordinator::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub service_id: String,
    pub service_title: String,
    pub start: DateTime<Tz>,
    pub duration: Duration,
    pub contact: ContactDetails,
    pub price: Option<i64>,
    pub currency: String,
    pub location: Option<String>,
}

const MAX_DURATION_MINUTES: i64 = 24 * 60;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Holds a requested interval to the same rules the slot generator applies.
fn check_bookable(
    start: DateTime<Tz>,
    duration: Duration,
    settings: &BookingSettings,
    now: DateTime<Utc>,
) -> Result<(), BookingError> {
    let weekday = start.weekday();
    if settings.is_closed(weekday) {
        return Err(BookingError::invalid("dateTime", format!("closed on {}", weekday)));
    }

    let end = start + duration;
    let open = settings.open_hours;
    if start.time() < open.start || end.date_naive() != start.date_naive() || end.time() > open.end
    {
        return Err(BookingError::invalid(
            "dateTime",
            format!(
                "{} - {} is outside opening hours {} - {}",
                start.format("%H:%M"),
                end.format("%H:%M"),
                open.start.format("%H:%M"),
                open.end.format("%H:%M")
            ),
        ));
    }

    if start.with_timezone(&Utc) < now + settings.min_notice {
        return Err(BookingError::invalid("dateTime", "already past the booking notice"));
    }
    Ok(())
}

impl BookingRequest {
    pub fn end(&self) -> DateTime<Tz> {
        self.start + self.duration
    }

    /// Validates a raw submission. No calendar call is made here.
    ///
    /// Service title falls back to the catalog entry for `serviceId`. A catalog service
    /// always books its own duration. The interval must be bookable at `now`: an open
    /// day, inside opening hours and not before `now + min_notice`.
    pub fn from_submission(
        submission: &CreateBookingRequest,
        catalog: &ServiceCatalog,
        settings: &BookingSettings,
        now: DateTime<Utc>,
    ) -> Result<Self, BookingError> {
        let required = [
            ("serviceId", present(&submission.service_id)),
            ("dateTime", present(&submission.date_time)),
            ("email", present(&submission.email)),
            ("phone", present(&submission.phone)),
            ("firstName", present(&submission.first_name)),
            ("lastName", present(&submission.last_name)),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(BookingError::MissingFields(missing));
        }
        let [service_id, date_time, email, phone, first_name, last_name] =
            required.map(|(_, value)| value.unwrap_or_default());

        let start = DateTime::parse_from_rfc3339(date_time)
            .map_err(|e| BookingError::invalid("dateTime", e.to_string()))?
            .with_timezone(&settings.time_zone);

        if !email.contains('@') {
            return Err(BookingError::invalid("email", "not an email address"));
        }

        let service = catalog.get(service_id);

        let service_title = match (present(&submission.service_title), service) {
            (Some(title), _) => title.to_string(),
            (None, Some(service)) => service.title.clone(),
            (None, None) => return Err(BookingError::MissingFields(vec!["serviceTitle"])),
        };

        let duration_minutes = match (submission.duration, service) {
            (Some(minutes), Some(service)) if minutes != service.duration_minutes => {
                return Err(BookingError::invalid(
                    "duration",
                    format!(
                        "{} takes {} minutes, got {}",
                        service.id, service.duration_minutes, minutes
                    ),
                ))
            }
            (_, Some(service)) => service.duration_minutes,
            (Some(minutes), None) => minutes,
            (None, None) => return Err(BookingError::MissingFields(vec!["duration"])),
        };
        if !(1..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
            return Err(BookingError::invalid(
                "duration",
                format!(
                    "must be between 1 and {} minutes, got {}",
                    MAX_DURATION_MINUTES, duration_minutes
                ),
            ));
        }

        let duration = Duration::minutes(duration_minutes);
        check_bookable(start, duration, settings, now)?;

        let location = settings
            .default_location_id
            .as_deref()
            .and_then(|id| catalog.location(id))
            .map(|location| location.name.clone());

        Ok(BookingRequest {
            service_id: service_id.to_string(),
            service_title,
            start,
            duration,
            contact: ContactDetails {
                email: email.to_string(),
                phone: phone.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            },
            price: service.map(|s| s.price),
            currency: service
                .and_then(|s| s.currency.clone())
                .unwrap_or_else(|| settings.currency.clone()),
            location,
        })
    }

    fn to_calendar_event(&self, time_zone: Tz) -> CalendarEvent {
        let name = self.contact.full_name();
        let description = format!(
            "Email: {}\nPhone: {}\nService: {}\nClient: {}",
            self.contact.email, self.contact.phone, self.service_title, name
        );
        CalendarEvent {
            start_time: self.start.with_timezone(&Utc),
            end_time: self.end().with_timezone(&Utc),
            summary: format!("{} - {}", self.service_title, name),
            description: Some(description),
            time_zone: Some(time_zone.name().to_string()),
            blocking: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub event_id: String,
    pub service_id: String,
    pub service_title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub location: Option<String>,
    pub customer_email: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub total_price: Option<i64>,
    pub currency: String,
}

/// Result of a commit attempt. A taken slot is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationOutcome {
    Confirmed(BookingConfirmation),
    Conflict { overlapping: Vec<BusyInterval> },
}

/// Short human-facing booking reference: `PREFIX-<last 8 ms digits>-<4 hex>`.
///
/// The random suffix keeps two bookings made within the same truncation window apart.
/// The calendar event id stays the authoritative unique key.
pub fn generate_booking_id(prefix: &str, now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().unsigned_abs().to_string();
    let digits = &millis[millis.len().saturating_sub(8)..];
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", prefix, digits, random[..4].to_uppercase())
}

pub struct ReservationCoordinator<'a, C: CalendarService + ?Sized> {
    calendar: &'a C,
    calendar_id: &'a str,
    settings: &'a BookingSettings,
}

impl<'a, C: CalendarService + ?Sized> ReservationCoordinator<'a, C> {
    pub fn new(calendar: &'a C, calendar_id: &'a str, settings: &'a BookingSettings) -> Self {
        Self {
            calendar,
            calendar_id,
            settings,
        }
    }

    /// Validates then commits. Validation failures never reach the calendar.
    pub async fn submit(
        &self,
        submission: &CreateBookingRequest,
        catalog: &ServiceCatalog,
        now: DateTime<Utc>,
    ) -> Result<ReservationOutcome, BookingError> {
        let request = BookingRequest::from_submission(submission, catalog, self.settings, now)?;
        self.commit(request).await
    }

    /// Re-checks `[start, end)` and inserts the event only when nothing overlaps.
    pub async fn commit(&self, request: BookingRequest) -> Result<ReservationOutcome, BookingError> {
        let start = request.start.with_timezone(&Utc);
        let end = request.end().with_timezone(&Utc);

        let busy = self
            .calendar
            .get_busy_times(self.calendar_id, start, end)
            .await
            .map_err(|e| {
                error!("Re-check for {} - {} failed: {}", start, end, e);
                BookingError::Upstream(e.to_string())
            })?;

        // half-open: an interval that only touches start or end is not a conflict
        let overlapping = overlapping(&busy, start, end);
        if !overlapping.is_empty() {
            warn!(
                "Slot {} - {} for {} was taken since it was shown",
                start, end, request.service_id
            );
            return Ok(ReservationOutcome::Conflict { overlapping });
        }

        let created = self
            .calendar
            .create_event(
                self.calendar_id,
                request.to_calendar_event(self.settings.time_zone),
            )
            .await
            .map_err(|e| {
                error!("Event insert for {} - {} failed: {}", start, end, e);
                BookingError::Upstream(e.to_string())
            })?;

        let event_id = created.event_id.ok_or_else(|| {
            error!("Event insert for {} - {} returned no event id", start, end);
            BookingError::Unknown("calendar accepted the event without returning an id".into())
        })?;

        let booking_id = generate_booking_id(&self.settings.booking_id_prefix, Utc::now());
        info!("Booking {} created as event {}", booking_id, event_id);

        let end_local = request.end();
        Ok(ReservationOutcome::Confirmed(BookingConfirmation {
            booking_id,
            event_id,
            customer_name: request.contact.full_name(),
            service_id: request.service_id,
            service_title: request.service_title,
            start: request.start,
            end: end_local,
            location: request.location,
            customer_email: request.contact.email,
            customer_phone: request.contact.phone,
            total_price: request.price,
            currency: request.currency,
        }))
    }
}
