// --- File: crates/reserva_common/src/services.rs ---
//! Service abstractions for the external calendar.
//!
//! The booking core consumes exactly two calendar operations: a free/busy query and an
//! event insert. Keeping them behind a trait lets the Google implementation and the
//! in-memory mock be swapped without touching slot or reservation logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A half-open `[start, end)` range already occupied on the shared calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// A trait for the calendar operations the booking core depends on.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Busy intervals of `calendar_id` intersecting `[start_time, end_time)`, sorted by start.
    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error>;

    /// Insert one event. The provider's single-insert atomicity is the only guarantee relied on.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;
}

impl<S: CalendarService + ?Sized> CalendarService for Arc<S> {
    type Error = S::Error;

    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error> {
        (**self).get_busy_times(calendar_id, start_time, end_time)
    }

    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        (**self).create_event(calendar_id, event)
    }
}

/// Calendar service with its error erased, as shared through application state.
pub type SharedCalendarService = Arc<dyn CalendarService<Error = BoxedError>>;

/// Adapts any [`CalendarService`] to one returning [`BoxedError`].
pub struct BoxedCalendarService<S> {
    inner: S,
}

impl<S> BoxedCalendarService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_shared(self) -> SharedCalendarService
    where
        S: CalendarService + 'static,
    {
        Arc::new(self)
    }
}

impl<S: CalendarService> CalendarService for BoxedCalendarService<S> {
    type Error = BoxedError;

    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        Box::pin(async move {
            self.inner
                .get_busy_times(&calendar_id, start_time, end_time)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        Box::pin(async move {
            self.inner
                .create_event(&calendar_id, event)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

/// An event to be written to the shared calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// The summary or title of the event.
    pub summary: String,
    pub description: Option<String>,
    /// IANA zone the event is displayed in.
    pub time_zone: Option<String>,
    /// Opaque events block the interval in free/busy queries.
    pub blocking: bool,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventResult {
    /// The ID of the event.
    pub event_id: Option<String>,
    /// The status of the event.
    pub status: String,
}
