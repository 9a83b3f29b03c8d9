pub mod api;
pub mod hooks;
pub mod model;
pub mod service;
pub mod views;

use std::sync::Arc;

use axum::Router;

use tinta_core::Module;

pub use model::{Order, OrderMaterial, OrderService};
pub use service::OrdersService;
pub use views::resource_specs;

/// Orders module — quotes/orders with material and service lines.
pub struct OrdersModule {
    service: Arc<OrdersService>,
}

impl OrdersModule {
    pub fn new(service: OrdersService) -> Self {
        Self { service: Arc::new(service) }
    }

    pub fn service(&self) -> Arc<OrdersService> {
        self.service.clone()
    }
}

impl Module for OrdersModule {
    fn name(&self) -> &str {
        "orders"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
