// --- File: crates/reserva_booking/src/slots.rs ---
//! Candidate slot generation.
//!
//! Slots are laid out on a fixed grid starting at the day's opening time and stepping
//! by the configured interval. A slot is produced only when the whole appointment
//! `[start, start + duration)` fits before closing time. All wall-clock arithmetic is
//! done in the business time zone; the returned instants carry that zone.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::iter::FusedIterator;

use crate::settings::BookingSettings;

/// One bookable start time with its appointment end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSlot {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl CandidateSlot {
    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }
}

/// Lazy, single-pass sequence of candidate slots for one date.
#[derive(Debug, Clone)]
pub struct SlotIter {
    time_zone: Tz,
    next_start: NaiveDateTime,
    close: NaiveDateTime,
    interval: Duration,
    duration: Duration,
    earliest: DateTime<Utc>,
    done: bool,
}

impl SlotIter {
    fn empty(time_zone: Tz, at: NaiveDateTime) -> Self {
        SlotIter {
            time_zone,
            next_start: at,
            close: at,
            interval: Duration::zero(),
            duration: Duration::zero(),
            earliest: DateTime::<Utc>::MIN_UTC,
            done: true,
        }
    }

    fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
        match self.time_zone.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt),
            // repeated hour when clocks go back: first occurrence
            LocalResult::Ambiguous(first, _) => Some(first),
            // skipped hour when clocks go forward
            LocalResult::None => None,
        }
    }
}

impl Iterator for SlotIter {
    type Item = CandidateSlot;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let naive_start = self.next_start;
            if naive_start + self.duration > self.close {
                self.done = true;
                break;
            }
            self.next_start = naive_start + self.interval;

            let Some(start) = self.localize(naive_start) else {
                continue;
            };
            if start.with_timezone(&Utc) < self.earliest {
                continue;
            }
            return Some(CandidateSlot {
                start,
                end: start + self.duration,
            });
        }
        None
    }
}

impl FusedIterator for SlotIter {}

/// Produces the candidate slots for `date` and a service of `duration`.
///
/// Closed weekdays yield nothing. Starts earlier than `now` plus the configured minimum
/// notice are skipped, so a past date is always empty and today only lists the future.
/// A non-positive interval or duration yields nothing.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
/// use reserva_booking::settings::{BookingSettings, OpenHours};
/// use reserva_booking::slots::generate_slots;
///
/// let settings = BookingSettings {
///     time_zone: chrono_tz::Europe::Madrid,
///     open_hours: OpenHours::new(
///         NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///         NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
///     ),
///     slot_interval: Duration::minutes(30),
///     closed_days: vec![Weekday::Sun],
///     min_notice: Duration::zero(),
///     currency: "EUR".to_string(),
///     booking_id_prefix: "BK".to_string(),
///     default_location_id: None,
/// };
/// let monday = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
/// let now = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
///
/// let slots: Vec<_> = generate_slots(monday, &settings, Duration::minutes(60), now).collect();
/// assert_eq!(slots.len(), 17);
/// assert_eq!(slots[0].start.format("%H:%M").to_string(), "09:00");
/// assert_eq!(slots[16].start.format("%H:%M").to_string(), "17:00");
/// ```
pub fn generate_slots(
    date: NaiveDate,
    settings: &BookingSettings,
    duration: Duration,
    now: DateTime<Utc>,
) -> SlotIter {
    let open = date.and_time(settings.open_hours.start);
    let close = date.and_time(settings.open_hours.end);

    if settings.is_closed(date.weekday())
        || settings.slot_interval <= Duration::zero()
        || duration <= Duration::zero()
    {
        return SlotIter::empty(settings.time_zone, open);
    }

    SlotIter {
        time_zone: settings.time_zone,
        next_start: open,
        close,
        interval: settings.slot_interval,
        duration,
        earliest: now + settings.min_notice,
        done: false,
    }
}
