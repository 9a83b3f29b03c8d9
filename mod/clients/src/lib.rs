pub mod api;
pub mod model;
pub mod normalize;
pub mod service;
pub mod views;

use std::sync::Arc;

use axum::Router;

use tinta_core::Module;

pub use model::{Client, ClientAddress, ClientContact, PersonType};
pub use service::ClientService;
pub use views::resource_specs;

/// Clients module — client master data with nested addresses and contacts.
pub struct ClientsModule {
    service: Arc<ClientService>,
}

impl ClientsModule {
    pub fn new(service: ClientService) -> Self {
        Self { service: Arc::new(service) }
    }

    pub fn service(&self) -> Arc<ClientService> {
        self.service.clone()
    }
}

impl Module for ClientsModule {
    fn name(&self) -> &str {
        "clients"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
