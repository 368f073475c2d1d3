// --- File: crates/reserva_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Google Calendar Config ---
// Either `key_path` (service account JSON file) or the email/private key pair is required.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    #[serde(default)]
    pub key_path: Option<String>,
    /// The shared calendar every booking is checked against and written to.
    #[serde(default)]
    pub calendar_id: Option<String>,
    #[serde(default)]
    pub service_account_email: Option<String>, // usually "secret_from_env"
    #[serde(default)]
    pub private_key: Option<String>, // usually "secret_from_env"
}

/// Opening hours as `HH:MM` strings in the business time zone.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OpenHoursConfig {
    pub start: String,
    pub end: String,
}

// --- Booking Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    /// IANA zone name, e.g. "Europe/Madrid".
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_slot_interval")]
    pub slot_interval_minutes: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub default_location_id: Option<String>,
    /// Three letter weekday names ("Mon".."Sun"). Days not listed are closed.
    #[serde(default = "default_open_days")]
    pub open_days: Vec<String>,
    pub open_hours: OpenHoursConfig,
    /// Slots starting earlier than now + notice are not offered.
    #[serde(default)]
    pub min_notice_minutes: i64,
    #[serde(default = "default_booking_id_prefix")]
    pub booking_id_prefix: String,
}

fn default_time_zone() -> String {
    "Europe/Madrid".to_string()
}

fn default_slot_interval() -> i64 {
    30
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_open_days() -> Vec<String> {
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

fn default_booking_id_prefix() -> String {
    "BK".to_string()
}

// --- Service Catalog ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    pub id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: i64,
    /// Price in the smallest currency unit (e.g., cents).
    pub price: i64,
    /// Falls back to `booking.currency`.
    #[serde(default)]
    pub currency: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LocationConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,

    #[serde(default)]
    pub gcal: Option<GcalConfig>,

    pub booking: BookingConfig,
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
    #[serde(default)]
    pub locations: Vec<LocationConfig>,
}
