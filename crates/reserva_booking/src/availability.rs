// --- File: crates/reserva_booking/src/availability.rs ---
//! Availability resolution: candidate slots annotated against the calendar's busy intervals.
//!
//! The annotation is a snapshot. A slot shown as available can still be taken before it
//! is booked; the reservation coordinator re-checks at commit time.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use reserva_common::services::{BusyInterval, CalendarService};
use tracing::{debug, error};

use crate::error::BookingError;
use crate::settings::BookingSettings;
use crate::slots::{generate_slots, CandidateSlot};

/// Half-open interval overlap. Touching endpoints do not overlap.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAvailability {
    pub slot: CandidateSlot,
    pub available: bool,
}

/// Tags each slot available or occupied, keeping the input order.
pub fn annotate_slots<I>(slots: I, busy: &[BusyInterval]) -> Vec<SlotAvailability>
where
    I: IntoIterator<Item = CandidateSlot>,
{
    slots
        .into_iter()
        .map(|slot| {
            let (start, end) = (slot.start_utc(), slot.end_utc());
            let occupied = busy.iter().any(|b| overlaps(start, end, b.start, b.end));
            SlotAvailability {
                slot,
                available: !occupied,
            }
        })
        .collect()
}

/// The busy intervals among `busy` that intersect `[start, end)`.
pub fn overlapping(
    busy: &[BusyInterval],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<BusyInterval> {
    busy.iter()
        .copied()
        .filter(|b| overlaps(start, end, b.start, b.end))
        .collect()
}

fn resolve_local(time_zone: Tz, date: NaiveDate, time: NaiveTime, earliest: bool) -> DateTime<Utc> {
    let naive = date.and_time(time);
    let local = time_zone.from_local_datetime(&naive);
    let picked = if earliest {
        local.earliest()
    } else {
        local.latest()
    };
    picked
        // wall-clock time skipped by a DST jump
        .or_else(|| {
            time_zone
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// `[00:00, 23:59:59]` of `date` in the business time zone, as UTC instants.
pub fn day_window(date: NaiveDate, time_zone: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = resolve_local(time_zone, date, NaiveTime::MIN, true);
    let end = resolve_local(
        time_zone,
        date,
        NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
        false,
    );
    (start, end)
}

/// One day's answer: the raw busy intervals and the annotated slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub busy: Vec<BusyInterval>,
    pub slots: Vec<SlotAvailability>,
}

pub struct AvailabilityResolver<'a, C: CalendarService + ?Sized> {
    calendar: &'a C,
    calendar_id: &'a str,
    settings: &'a BookingSettings,
}

impl<'a, C: CalendarService + ?Sized> AvailabilityResolver<'a, C> {
    pub fn new(calendar: &'a C, calendar_id: &'a str, settings: &'a BookingSettings) -> Self {
        Self {
            calendar,
            calendar_id,
            settings,
        }
    }

    /// Fetches the day's busy intervals and annotates the slots for `duration`.
    ///
    /// A failed fetch is reported as [`BookingError::Upstream`]; slots are never
    /// assumed free.
    pub async fn resolve(
        &self,
        date: NaiveDate,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<DayAvailability, BookingError> {
        let (day_start, day_end) = day_window(date, self.settings.time_zone);

        let busy = self
            .calendar
            .get_busy_times(self.calendar_id, day_start, day_end)
            .await
            .map_err(|e| {
                error!("Free/busy query for {} failed: {}", date, e);
                BookingError::Upstream(e.to_string())
            })?;

        let slots = annotate_slots(generate_slots(date, self.settings, duration, now), &busy);
        debug!(
            "{}: {} busy intervals, {} of {} slots available",
            date,
            busy.len(),
            slots.iter().filter(|s| s.available).count(),
            slots.len()
        );

        Ok(DayAvailability { date, busy, slots })
    }
}
