pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use tinta_core::Module;

pub use service::{CityService, ImportStats, RegistryData, resource_specs};

/// Cities module — geographic reference data and autocomplete.
pub struct CitiesModule {
    service: Arc<CityService>,
}

impl CitiesModule {
    pub fn new(service: CityService) -> Self {
        Self { service: Arc::new(service) }
    }

    pub fn service(&self) -> Arc<CityService> {
        self.service.clone()
    }
}

impl Module for CitiesModule {
    fn name(&self) -> &str {
        "cities"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
