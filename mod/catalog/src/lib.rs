pub mod api;
pub mod model;
pub mod service;
pub mod views;

use std::sync::Arc;

use axum::Router;

use tinta_core::Module;

pub use model::CatalogItem;
pub use service::CatalogService;
pub use views::resource_specs;

/// Catalog module — materials, services, rooms, and auxiliary tables.
pub struct CatalogModule {
    service: Arc<CatalogService>,
}

impl CatalogModule {
    pub fn new(service: CatalogService) -> Self {
        Self { service: Arc::new(service) }
    }

    pub fn service(&self) -> Arc<CatalogService> {
        self.service.clone()
    }
}

impl Module for CatalogModule {
    fn name(&self) -> &str {
        "catalog"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
