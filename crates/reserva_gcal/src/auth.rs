// File: crates/reserva_gcal/src/auth.rs
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{
        parse_service_account_key, read_service_account_key, ServiceAccountAuthenticator,
        ServiceAccountKey,
    },
    CalendarHub,
};
use reserva_config::{GcalConfig, SECRET_MARKER};
use std::{error::Error, path::Path};
use tracing::info;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

pub async fn create_calendar_hub(
    config: &GcalConfig,
) -> Result<HubType, Box<dyn Error + Send + Sync>> {
    let sa_key = load_service_account_key(config).await?;

    let auth = ServiceAccountAuthenticator::builder(sa_key).build().await?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(CalendarHub::new(client, auth))
}

/// The calendar every booking is checked against.
pub fn calendar_id(config: &GcalConfig) -> Result<String, Box<dyn Error + Send + Sync>> {
    configured(&config.calendar_id)
        .map(str::to_string)
        .ok_or_else(|| "Missing calendar_id in GcalConfig".into())
}

/// A key file wins; otherwise the key is assembled from the email/private key pair.
async fn load_service_account_key(
    config: &GcalConfig,
) -> Result<ServiceAccountKey, Box<dyn Error + Send + Sync>> {
    if let Some(key_path) = configured(&config.key_path) {
        info!("Reading service account key from {}", key_path);
        return Ok(read_service_account_key(Path::new(key_path)).await?);
    }

    let email = configured(&config.service_account_email)
        .ok_or("Missing key_path or service_account_email in GcalConfig")?;
    let private_key = configured(&config.private_key)
        .ok_or("Missing private_key in GcalConfig")?
        // env vars usually carry the PEM with escaped newlines
        .replace("\\n", "\n");

    let key_json = serde_json::json!({
        "type": "service_account",
        "client_email": email,
        "private_key": private_key,
        "token_uri": TOKEN_URI,
    });
    Ok(parse_service_account_key(key_json.to_string())?)
}

fn configured(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != SECRET_MARKER)
}
