// --- File: crates/reserva_booking/src/settings.rs ---
//! Typed booking settings, parsed once from `BookingConfig` at startup.

use chrono::{Duration, NaiveTime, Weekday};
use chrono_tz::Tz;
use reserva_config::BookingConfig;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
    #[error("Invalid open hour {0:?}, expected HH:MM")]
    InvalidOpenHour(String),
    #[error("Opening hours must end after they start ({start} - {end})")]
    EmptyOpenHours { start: NaiveTime, end: NaiveTime },
    #[error("Unknown weekday: {0}")]
    UnknownWeekday(String),
    #[error("Slot interval must be positive, got {0} minutes")]
    InvalidInterval(i64),
    #[error("Minimum notice cannot be negative, got {0} minutes")]
    NegativeNotice(i64),
}

/// Daily window in business-local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl OpenHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone)]
pub struct BookingSettings {
    pub time_zone: Tz,
    pub open_hours: OpenHours,
    pub slot_interval: Duration,
    pub closed_days: Vec<Weekday>,
    pub min_notice: Duration,
    pub currency: String,
    pub booking_id_prefix: String,
    pub default_location_id: Option<String>,
}

impl BookingSettings {
    pub fn is_closed(&self, weekday: Weekday) -> bool {
        self.closed_days.contains(&weekday)
    }
}

const ALL_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn parse_open_hour(value: &str) -> Result<NaiveTime, SettingsError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| SettingsError::InvalidOpenHour(value.to_string()))
}

impl TryFrom<&BookingConfig> for BookingSettings {
    type Error = SettingsError;

    fn try_from(config: &BookingConfig) -> Result<Self, Self::Error> {
        let time_zone = Tz::from_str(&config.time_zone)
            .map_err(|_| SettingsError::UnknownTimeZone(config.time_zone.clone()))?;

        let start = parse_open_hour(&config.open_hours.start)?;
        let end = parse_open_hour(&config.open_hours.end)?;
        if end <= start {
            return Err(SettingsError::EmptyOpenHours { start, end });
        }

        if config.slot_interval_minutes <= 0 {
            return Err(SettingsError::InvalidInterval(config.slot_interval_minutes));
        }
        if config.min_notice_minutes < 0 {
            return Err(SettingsError::NegativeNotice(config.min_notice_minutes));
        }

        let open_days = config
            .open_days
            .iter()
            .map(|day| {
                Weekday::from_str(day.trim()).map_err(|_| SettingsError::UnknownWeekday(day.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let closed_days = ALL_DAYS
            .iter()
            .copied()
            .filter(|day| !open_days.contains(day))
            .collect();

        Ok(BookingSettings {
            time_zone,
            open_hours: OpenHours::new(start, end),
            slot_interval: Duration::minutes(config.slot_interval_minutes),
            closed_days,
            min_notice: Duration::minutes(config.min_notice_minutes),
            currency: config.currency.clone(),
            booking_id_prefix: config.booking_id_prefix.clone(),
            default_location_id: config.default_location_id.clone(),
        })
    }
}
