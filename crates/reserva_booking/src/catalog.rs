// --- File: crates/reserva_booking/src/catalog.rs ---
use reserva_config::{AppConfig, LocationConfig, ServiceConfig};

/// Services and locations offered, loaded once from configuration and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    services: Vec<ServiceConfig>,
    locations: Vec<LocationConfig>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<ServiceConfig>, locations: Vec<LocationConfig>) -> Self {
        Self {
            services,
            locations,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.services.clone(), config.locations.clone())
    }

    pub fn get(&self, service_id: &str) -> Option<&ServiceConfig> {
        self.services.iter().find(|s| s.id == service_id)
    }

    pub fn services(&self) -> &[ServiceConfig] {
        &self.services
    }

    pub fn location(&self, location_id: &str) -> Option<&LocationConfig> {
        self.locations.iter().find(|l| l.id == location_id)
    }
}
