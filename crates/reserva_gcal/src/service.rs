// --- File: crates/reserva_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! This module provides an implementation of the CalendarService trait for Google Calendar.
//! Conflict detection is not done here: callers re-check free/busy before inserting.

use chrono::{DateTime, Utc};
use google_calendar3::api::{Event, EventDateTime, FreeBusyRequest, FreeBusyRequestItem};
use reserva_common::services::{
    BoxFuture, BusyInterval, CalendarEvent, CalendarEventResult, CalendarService,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::HubType;

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Calendar {calendar_id} reported errors: {reasons}")]
    CalendarError { calendar_id: String, reasons: String },
    #[error("Calendar {0} missing from free/busy response")]
    MissingCalendar(String),
    #[error("Invalid time range: {0}")]
    InvalidRange(String),
    #[error("Calendar unavailable: {0}")]
    Unavailable(String),
}

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
}

impl GoogleCalendarService {
    /// Create a new Google Calendar service.
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    /// Queries free/busy for `calendar_id` over `[start_time, end_time]`.
    ///
    /// Busy periods come back sorted by start. A calendar the API could not read is an
    /// error, never an empty (all free) answer.
    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let req = FreeBusyRequest {
                time_min: Some(start_time),
                time_max: Some(end_time),
                time_zone: Some("UTC".to_string()),
                items: Some(vec![FreeBusyRequestItem {
                    id: Some(calendar_id.clone()),
                    ..Default::default()
                }]),
                ..Default::default()
            };

            let (_response, freebusy_response) = calendar_hub.freebusy().query(req).doit().await?;

            let cal_info = freebusy_response
                .calendars
                .and_then(|mut calendars| calendars.remove(&calendar_id))
                .ok_or_else(|| GcalServiceError::MissingCalendar(calendar_id.clone()))?;

            if let Some(errors) = cal_info.errors.filter(|errors| !errors.is_empty()) {
                let reasons = errors
                    .iter()
                    .map(|e| e.reason.as_deref().unwrap_or("unknown"))
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(GcalServiceError::CalendarError {
                    calendar_id,
                    reasons,
                });
            }

            let mut busy_periods: Vec<BusyInterval> = Vec::new();
            for period in cal_info.busy.unwrap_or_default() {
                match (period.start, period.end) {
                    (Some(start), Some(end)) => busy_periods.push(BusyInterval::new(start, end)),
                    _ => warn!("Skipping busy period with missing start/end: {:?}", period),
                }
            }
            busy_periods.sort_by_key(|b| b.start);
            debug!(
                "{} busy periods on {} between {} and {}",
                busy_periods.len(),
                calendar_id,
                start_time,
                end_time
            );
            Ok(busy_periods)
        })
    }

    /// Inserts the event. Blocking events are written as opaque so they show up in
    /// later free/busy queries.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            if event.end_time <= event.start_time {
                return Err(GcalServiceError::InvalidRange(
                    "End time must be after start time".to_string(),
                ));
            }

            let time_zone = event.time_zone.clone().unwrap_or_else(|| "UTC".to_string());
            let new_event = Event {
                summary: Some(event.summary),
                description: event.description,
                start: Some(EventDateTime {
                    date_time: Some(event.start_time),
                    time_zone: Some(time_zone.clone()),
                    ..Default::default()
                }),
                end: Some(EventDateTime {
                    date_time: Some(event.end_time),
                    time_zone: Some(time_zone),
                    ..Default::default()
                }),
                transparency: Some(
                    if event.blocking { "opaque" } else { "transparent" }.to_string(),
                ),
                ..Default::default()
            };

            let (_response, created_event) = calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .doit()
                .await?;

            Ok(CalendarEventResult {
                event_id: created_event.id,
                status: created_event
                    .status
                    .unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }
}

/// In-memory calendar for tests.
///
/// Busy times are the union of injected busy intervals and the blocking events created
/// through it. Inserts never check for conflicts, same as the real API.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockCalendarService {
        events: Mutex<HashMap<String, Vec<(String, CalendarEvent)>>>,
        busy: Mutex<HashMap<String, Vec<BusyInterval>>>,
        fail_busy_queries: AtomicBool,
        fail_inserts: AtomicBool,
        busy_queries: AtomicUsize,
    }

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    impl MockCalendarService {
        pub fn new() -> Self {
            Self::default()
        }

        /// Marks an interval busy without creating an event (someone else's booking).
        pub fn add_busy(&self, calendar_id: &str, interval: BusyInterval) {
            lock(&self.busy)
                .entry(calendar_id.to_string())
                .or_default()
                .push(interval);
        }

        pub fn with_busy(self, calendar_id: &str, interval: BusyInterval) -> Self {
            self.add_busy(calendar_id, interval);
            self
        }

        pub fn fail_busy_queries(&self, fail: bool) {
            self.fail_busy_queries.store(fail, Ordering::SeqCst);
        }

        pub fn fail_inserts(&self, fail: bool) {
            self.fail_inserts.store(fail, Ordering::SeqCst);
        }

        /// Events created on `calendar_id`, with their ids, in insertion order.
        pub fn events(&self, calendar_id: &str) -> Vec<(String, CalendarEvent)> {
            lock(&self.events)
                .get(calendar_id)
                .cloned()
                .unwrap_or_default()
        }

        pub fn event_count(&self, calendar_id: &str) -> usize {
            lock(&self.events).get(calendar_id).map_or(0, Vec::len)
        }

        pub fn busy_query_count(&self) -> usize {
            self.busy_queries.load(Ordering::SeqCst)
        }
    }

    impl CalendarService for MockCalendarService {
        type Error = GcalServiceError;

        fn get_busy_times(
            &self,
            calendar_id: &str,
            start_time: DateTime<Utc>,
            end_time: DateTime<Utc>,
        ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error> {
            let calendar_id = calendar_id.to_string();

            Box::pin(async move {
                self.busy_queries.fetch_add(1, Ordering::SeqCst);
                if self.fail_busy_queries.load(Ordering::SeqCst) {
                    return Err(GcalServiceError::Unavailable(
                        "free/busy query failed".to_string(),
                    ));
                }

                let mut busy_times: Vec<BusyInterval> = lock(&self.busy)
                    .get(&calendar_id)
                    .cloned()
                    .unwrap_or_default();
                busy_times.extend(
                    lock(&self.events)
                        .get(&calendar_id)
                        .into_iter()
                        .flatten()
                        .filter(|(_, event)| event.blocking)
                        .map(|(_, event)| BusyInterval::new(event.start_time, event.end_time)),
                );

                busy_times.retain(|b| b.start < end_time && b.end > start_time);
                busy_times.sort_by_key(|b| b.start);
                Ok(busy_times)
            })
        }

        fn create_event(
            &self,
            calendar_id: &str,
            event: CalendarEvent,
        ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
            let calendar_id = calendar_id.to_string();

            Box::pin(async move {
                if self.fail_inserts.load(Ordering::SeqCst) {
                    return Err(GcalServiceError::Unavailable("insert failed".to_string()));
                }
                if event.end_time <= event.start_time {
                    return Err(GcalServiceError::InvalidRange(
                        "End time must be after start time".to_string(),
                    ));
                }

                let event_id = format!("mock-{}", uuid::Uuid::new_v4().simple());
                lock(&self.events)
                    .entry(calendar_id)
                    .or_default()
                    .push((event_id.clone(), event));

                Ok(CalendarEventResult {
                    event_id: Some(event_id),
                    status: "confirmed".to_string(),
                })
            })
        }
    }
}
