// --- File: crates/services/reserva_backend/src/service_factory.rs ---
//! Builds the calendar collaborator the booking routes run against.

use reserva_common::error::ReservaError;
use reserva_common::services::SharedCalendarService;
use reserva_config::AppConfig;
use tracing::warn;

#[cfg(feature = "gcal")]
use {
    reserva_common::error::{config_error, external_service_error},
    reserva_common::services::BoxedCalendarService,
    reserva_gcal::{auth, GoogleCalendarService},
    std::sync::Arc,
    tracing::info,
};

/// The shared calendar and the id of the calendar bookings go to.
pub struct CalendarBinding {
    pub service: SharedCalendarService,
    pub calendar_id: String,
}

/// `Ok(None)` when calendar access is switched off; booking routes are then not mounted.
#[cfg(feature = "gcal")]
pub async fn calendar_service(config: &AppConfig) -> Result<Option<CalendarBinding>, ReservaError> {
    if !config.use_gcal {
        warn!("use_gcal is false, booking routes disabled");
        return Ok(None);
    }

    let gcal_config = config
        .gcal
        .as_ref()
        .ok_or_else(|| config_error("use_gcal is set but the [gcal] section is missing"))?;
    let calendar_id = auth::calendar_id(gcal_config).map_err(config_error)?;

    let hub = auth::create_calendar_hub(gcal_config)
        .await
        .map_err(|e| external_service_error("Google Calendar", e))?;
    info!("Google Calendar client ready for {}", calendar_id);

    Ok(Some(CalendarBinding {
        service: BoxedCalendarService::new(GoogleCalendarService::new(Arc::new(hub)))
            .into_shared(),
        calendar_id,
    }))
}

#[cfg(not(feature = "gcal"))]
pub async fn calendar_service(config: &AppConfig) -> Result<Option<CalendarBinding>, ReservaError> {
    if config.use_gcal {
        warn!("use_gcal is set but the binary was built without the gcal feature");
    }
    Ok(None)
}
