//! `tintad` — the tinta server binary.
//!
//! Usage:
//!   tintad --data-dir <dir> [--listen <addr>] [--seed-cities <file>]
//!
//! Composition root: every module hands its resource specs to one
//! explicit registry here; nothing is auto-discovered.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use tinta_catalog::{CatalogModule, CatalogService};
use tinta_cities::{CitiesModule, CityService, RegistryData};
use tinta_clients::{ClientService, ClientsModule};
use tinta_core::Module;
use tinta_orders::{OrdersModule, OrdersService};
use tinta_store::{EntityStore, Registry, schema::init_schema};

/// tinta server.
#[derive(Parser, Debug)]
#[command(name = "tintad", about = "tinta business management server")]
struct Cli {
    /// Directory holding all persistent data.
    #[arg(long = "data-dir", default_value = "./data")]
    data_dir: PathBuf,

    /// SQLite database path (defaults to {data-dir}/data.sqlite).
    #[arg(long = "sqlite")]
    sqlite: Option<PathBuf>,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,

    /// JSON file with UF/city registry data to import at startup
    /// (idempotent; safe to pass on every boot).
    #[arg(long = "seed-cities")]
    seed_cities: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = tinta_core::ServiceConfig {
        data_dir: Some(cli.data_dir.clone()),
        sqlite_path: cli.sqlite.clone(),
        listen: cli.listen.clone(),
    };
    std::fs::create_dir_all(&cli.data_dir)?;

    let sql: Arc<dyn tinta_sql::SQLStore> = Arc::new(
        tinta_sql::SqliteStore::open(&config.resolve_sqlite_path())
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {e}"))?,
    );

    // Explicit registry composition: every resource of every module.
    let mut registry = Registry::new();
    for spec in tinta_cities::resource_specs() {
        registry.register(spec);
    }
    for spec in tinta_catalog::resource_specs() {
        registry.register(spec);
    }
    for spec in tinta_clients::resource_specs() {
        registry.register(spec);
    }
    for spec in tinta_orders::resource_specs() {
        registry.register(spec);
    }
    let registry = Arc::new(registry);

    init_schema(sql.as_ref(), &registry)
        .map_err(|e| anyhow::anyhow!("schema init failed: {e}"))?;
    let store = Arc::new(EntityStore::new(sql, registry));

    // ── Modules ──

    let cities_service = CityService::new(store.clone());
    if let Some(path) = &cli.seed_cities {
        info!("Importing city registry from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        let data: RegistryData = serde_json::from_str(&raw)?;
        let stats = cities_service
            .import_registry(&data)
            .map_err(|e| anyhow::anyhow!("city import failed: {e}"))?;
        info!(ufs = stats.ufs, cities = stats.cities, skipped = stats.skipped, "city import done");
    }
    let cities_module = CitiesModule::new(cities_service);

    let catalog_module = CatalogModule::new(CatalogService::new(store.clone()));
    let clients_module = ClientsModule::new(ClientService::new(store.clone()));
    let orders_module = OrdersModule::new(
        OrdersService::new(store.clone())
            .map_err(|e| anyhow::anyhow!("orders module init failed: {e}"))?,
    );

    let modules: Vec<Box<dyn Module>> = vec![
        Box::new(cities_module),
        Box::new(clients_module),
        Box::new(orders_module),
        Box::new(catalog_module),
    ];

    let mut app = axum::Router::new();
    for module in &modules {
        info!("{} module initialized", module.name());
        app = app.merge(module.routes());
    }

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("tinta server listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
