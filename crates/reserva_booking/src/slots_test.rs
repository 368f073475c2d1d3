#[cfg(test)]
mod tests {
    use crate::settings::{BookingSettings, OpenHours};
    use crate::slots::generate_slots;
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
    use chrono_tz::Europe::Madrid;
    use chrono_tz::Tz;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn settings() -> BookingSettings {
        BookingSettings {
            time_zone: Madrid,
            open_hours: OpenHours::new(time(9, 0), time(18, 0)),
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

    fn local(date: NaiveDate, h: u32, m: u32) -> DateTime<Utc> {
        Madrid
            .from_local_datetime(&date.and_time(time(h, m)))
            .unwrap()
            .with_timezone(&Utc)
    }

    fn long_ago() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn hhmm(start: &DateTime<Tz>) -> String {
        start.format("%H:%M").to_string()
    }

    #[test]
    fn test_monday_full_day_for_one_hour_service() {
        let slots: Vec<_> =
            generate_slots(monday(), &settings(), Duration::minutes(60), long_ago()).collect();

        assert_eq!(slots.len(), 17);
        assert_eq!(hhmm(&slots[0].start), "09:00");
        assert_eq!(hhmm(&slots[16].start), "17:00");
        assert_eq!(hhmm(&slots[16].end), "18:00");
        for pair in slots.windows(2) {
            assert_eq!(pair[1].start - pair[0].start, Duration::minutes(30));
        }
    }

    #[test]
    fn test_slot_must_fit_before_closing() {
        let slots: Vec<_> =
            generate_slots(monday(), &settings(), Duration::minutes(90), long_ago()).collect();
        // 16:30 + 90 = 18:00 is the last fit
        assert_eq!(hhmm(&slots.last().unwrap().start), "16:30");
    }

    #[test]
    fn test_closed_weekday_is_empty() {
        let sunday = NaiveDate::from_ymd_opt(2025, 5, 4).unwrap();
        assert_eq!(
            generate_slots(sunday, &settings(), Duration::minutes(30), long_ago()).count(),
            0
        );
    }

    #[test]
    fn test_today_skips_started_slots() {
        let now = local(monday(), 12, 10);
        let slots: Vec<_> =
            generate_slots(monday(), &settings(), Duration::minutes(30), now).collect();
        assert_eq!(hhmm(&slots[0].start), "12:30");
    }

    #[test]
    fn test_slot_starting_now_is_kept() {
        let now = local(monday(), 12, 30);
        let first = generate_slots(monday(), &settings(), Duration::minutes(30), now)
            .next()
            .unwrap();
        assert_eq!(hhmm(&first.start), "12:30");
    }

    #[test]
    fn test_min_notice_pushes_first_slot() {
        let settings = BookingSettings {
            min_notice: Duration::minutes(120),
            ..settings()
        };
        let now = local(monday(), 8, 0);
        let first = generate_slots(monday(), &settings, Duration::minutes(30), now)
            .next()
            .unwrap();
        assert_eq!(hhmm(&first.start), "10:00");
    }

    #[test]
    fn test_past_date_is_empty() {
        let now = local(monday(), 8, 0);
        let last_week = NaiveDate::from_ymd_opt(2025, 4, 28).unwrap();
        assert_eq!(
            generate_slots(last_week, &settings(), Duration::minutes(30), now).count(),
            0
        );
    }

    #[test]
    fn test_non_positive_inputs_are_empty() {
        assert_eq!(
            generate_slots(monday(), &settings(), Duration::zero(), long_ago()).count(),
            0
        );
        let no_interval = BookingSettings {
            slot_interval: Duration::zero(),
            ..settings()
        };
        assert_eq!(
            generate_slots(monday(), &no_interval, Duration::minutes(30), long_ago()).count(),
            0
        );
    }

    #[test]
    fn test_service_longer_than_day_is_empty() {
        assert_eq!(
            generate_slots(monday(), &settings(), Duration::hours(10), long_ago()).count(),
            0
        );
    }

    #[test]
    fn test_iterator_is_fused() {
        let mut slots = generate_slots(monday(), &settings(), Duration::hours(9), long_ago());
        assert!(slots.next().is_some());
        assert!(slots.next().is_none());
        assert!(slots.next().is_none());
    }

    #[test]
    fn test_dst_gap_is_skipped() {
        // 2025-03-30: Madrid jumps from 02:00 to 03:00
        let transition = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        let settings = BookingSettings {
            open_hours: OpenHours::new(time(1, 0), time(5, 0)),
            closed_days: vec![],
            ..settings()
        };
        let starts: Vec<String> =
            generate_slots(transition, &settings, Duration::minutes(30), long_ago())
                .map(|s| hhmm(&s.start))
                .collect();
        assert_eq!(starts, vec!["01:00", "01:30", "03:00", "03:30", "04:00", "04:30"]);
    }

    #[test]
    fn test_same_inputs_same_output() {
        let a: Vec<_> =
            generate_slots(monday(), &settings(), Duration::minutes(45), long_ago()).collect();
        let b: Vec<_> =
            generate_slots(monday(), &settings(), Duration::minutes(45), long_ago()).collect();
        assert_eq!(a, b);
    }
}
