#[cfg(test)]
mod tests {
    use crate::availability::{annotate_slots, day_window, overlaps, AvailabilityResolver};
    use crate::error::BookingError;
    use crate::settings::{BookingSettings, OpenHours};
    use crate::slots::generate_slots;
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
    use chrono_tz::Europe::Madrid;
    use reserva_common::services::{BoxedCalendarService, BusyInterval};
    use reserva_gcal::service::mock::MockCalendarService;

    const CALENDAR: &str = "salon";

    fn settings() -> BookingSettings {
        BookingSettings {
            time_zone: Madrid,
            open_hours: OpenHours::new(
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            ),
            slot_interval: Duration::minutes(30),
            closed_days: vec![Weekday::Sun],
            min_notice: Duration::zero(),
            currency: "EUR".to_string(),
            booking_id_prefix: "VNY".to_string(),
            default_location_id: None,
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
    }

    fn local(h: u32, m: u32) -> DateTime<Utc> {
        Madrid
            .with_ymd_and_hms(2025, 5, 5, h, m, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn long_ago() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_touching_endpoints_do_not_overlap() {
        assert!(!overlaps(local(10, 0), local(10, 30), local(10, 30), local(11, 0)));
        assert!(overlaps(local(10, 0), local(10, 31), local(10, 30), local(11, 0)));
        assert!(overlaps(local(10, 0), local(12, 0), local(10, 30), local(11, 0)));
    }

    #[test]
    fn test_busy_half_hour_marks_only_its_slot() {
        let busy = vec![BusyInterval::new(local(10, 0), local(10, 30))];
        let annotated = annotate_slots(
            generate_slots(monday(), &settings(), Duration::minutes(30), long_ago()),
            &busy,
        );

        let at = |h: u32, m: u32| {
            annotated
                .iter()
                .find(|s| s.slot.start_utc() == local(h, m))
                .unwrap()
                .available
        };
        assert!(at(9, 30));
        assert!(!at(10, 0));
        assert!(at(10, 30));
        assert_eq!(annotated.iter().filter(|s| !s.available).count(), 1);
    }

    #[test]
    fn test_longer_service_blocked_by_later_busy() {
        let busy = vec![BusyInterval::new(local(10, 0), local(10, 30))];
        let annotated = annotate_slots(
            generate_slots(monday(), &settings(), Duration::minutes(60), long_ago()),
            &busy,
        );
        let occupied: Vec<_> = annotated
            .iter()
            .filter(|s| !s.available)
            .map(|s| s.slot.start.format("%H:%M").to_string())
            .collect();
        assert_eq!(occupied, vec!["09:30", "10:00"]);
    }

    #[test]
    fn test_day_window_is_local_midnight_to_end_of_day() {
        let (start, end) = day_window(monday(), Madrid);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 5, 4, 22, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 5, 5, 21, 59, 59).unwrap());
    }

    #[tokio::test]
    async fn test_resolver_annotates_with_calendar_busy_times() {
        let calendar = MockCalendarService::new()
            .with_busy(CALENDAR, BusyInterval::new(local(10, 0), local(10, 30)))
            // previous day, outside the window
            .with_busy(
                CALENDAR,
                BusyInterval::new(local(10, 0) - Duration::days(1), local(11, 0) - Duration::days(1)),
            );
        let settings = settings();
        let resolver = AvailabilityResolver::new(&calendar, CALENDAR, &settings);

        let day = resolver
            .resolve(monday(), Duration::minutes(30), long_ago())
            .await
            .unwrap();

        assert_eq!(day.busy, vec![BusyInterval::new(local(10, 0), local(10, 30))]);
        assert_eq!(day.slots.len(), 18);
        assert_eq!(day.slots.iter().filter(|s| !s.available).count(), 1);
        assert_eq!(calendar.busy_query_count(), 1);
    }

    #[tokio::test]
    async fn test_resolver_is_a_stable_read() {
        let calendar = MockCalendarService::new()
            .with_busy(CALENDAR, BusyInterval::new(local(12, 0), local(13, 0)));
        let settings = settings();
        let resolver = AvailabilityResolver::new(&calendar, CALENDAR, &settings);

        let first = resolver
            .resolve(monday(), Duration::minutes(45), long_ago())
            .await
            .unwrap();
        let second = resolver
            .resolve(monday(), Duration::minutes(45), long_ago())
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_resolver_reports_upstream_failure() {
        let calendar = MockCalendarService::new();
        calendar.fail_busy_queries(true);
        let shared = BoxedCalendarService::new(calendar).into_shared();
        let settings = settings();
        let resolver = AvailabilityResolver::new(shared.as_ref(), CALENDAR, &settings);

        let err = resolver
            .resolve(monday(), Duration::minutes(30), long_ago())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BookingError::Upstream("Calendar unavailable: free/busy query failed".to_string())
        );
    }
}
