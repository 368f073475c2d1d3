#[cfg(test)]
mod tests {
    use crate::availability::{annotate_slots, overlaps};
    use crate::settings::{BookingSettings, OpenHours};
    use crate::slots::generate_slots;
    use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
    use chrono_tz::Europe::Madrid;
    use proptest::prelude::*;
    use reserva_common::services::BusyInterval;

    fn settings(start_hour: u32, end_hour: u32, interval: i64, closed: Vec<Weekday>) -> BookingSettings {
        BookingSettings {
            time_zone: Madrid,
            open_hours: OpenHours::new(
                NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(end_hour, 0, 0).unwrap(),
            ),
            slot_interval: Duration::minutes(interval),
            closed_days: closed,
            min_notice: Duration::zero(),
            currency: "EUR".to_string(),
            booking_id_prefix: "VNY".to_string(),
            default_location_id: None,
        }
    }

    const WEEK: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap()
    }

    proptest! {
        #[test]
        fn test_slots_fit_open_hours(
            day_offset in 0..60i64,
            start_hour in 6..12u32,
            end_hour in 13..22u32,
            interval in prop::sample::select(vec![10i64, 15, 20, 30, 45, 60]),
            duration in 5..240i64,
            closed_index in 0..7usize,
        ) {
            let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap() + Duration::days(day_offset);
            let closed = WEEK[closed_index];
            let settings = settings(start_hour, end_hour, interval, vec![closed]);
            let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
            let open = settings.open_hours.start;
            let close = settings.open_hours.end;

            let slots: Vec<_> = generate_slots(date, &settings, Duration::minutes(duration), now).collect();

            if date.weekday() == closed {
                prop_assert!(slots.is_empty());
            }
            for slot in &slots {
                let local_start = slot.start.naive_local();
                prop_assert_eq!(local_start.date(), date);
                prop_assert!(local_start.time() >= open);
                prop_assert!(local_start + Duration::minutes(duration) <= date.and_time(close));
                let offset = (local_start.time() - open).num_minutes();
                prop_assert_eq!(offset % interval, 0);
                prop_assert_eq!(slot.end - slot.start, Duration::minutes(duration));
            }
            for pair in slots.windows(2) {
                prop_assert!(pair[0].start < pair[1].start);
            }
        }

        #[test]
        fn test_overlap_is_symmetric(
            a in 0..1000i64, a_len in 1..200i64,
            b in 0..1000i64, b_len in 1..200i64,
        ) {
            let (a_start, a_end) = (base() + Duration::minutes(a), base() + Duration::minutes(a + a_len));
            let (b_start, b_end) = (base() + Duration::minutes(b), base() + Duration::minutes(b + b_len));
            prop_assert_eq!(
                overlaps(a_start, a_end, b_start, b_end),
                overlaps(b_start, b_end, a_start, a_end)
            );
        }

        #[test]
        fn test_adjacent_intervals_do_not_overlap(a in 0..1000i64, len in 1..200i64, next_len in 1..200i64) {
            let start = base() + Duration::minutes(a);
            let mid = start + Duration::minutes(len);
            let end = mid + Duration::minutes(next_len);
            prop_assert!(!overlaps(start, mid, mid, end));
            prop_assert!(!overlaps(mid, end, start, mid));
        }

        #[test]
        fn test_annotation_is_idempotent(
            busy_specs in prop::collection::vec((0..24i64 * 60, 5..180i64), 0..8),
            duration in 15..120i64,
        ) {
            let settings = settings(9, 18, 30, vec![]);
            let date = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
            let busy: Vec<BusyInterval> = busy_specs
                .iter()
                .map(|(offset, len)| {
                    let start = base() + Duration::minutes(*offset);
                    BusyInterval::new(start, start + Duration::minutes(*len))
                })
                .collect();
            let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

            let first = annotate_slots(generate_slots(date, &settings, Duration::minutes(duration), now), &busy);
            let second = annotate_slots(generate_slots(date, &settings, Duration::minutes(duration), now), &busy);
            prop_assert_eq!(&first, &second);

            for annotated in &first {
                let clashes = busy.iter().any(|b| {
                    annotated.slot.start_utc() < b.end && b.start < annotated.slot.end_utc()
                });
                prop_assert_eq!(annotated.available, !clashes);
            }
        }
    }
}
