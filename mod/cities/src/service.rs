use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use tinta_core::ServiceError;
use tinta_store::{ColumnSpec, EntityStore, ResourceSpec};
use tinta_view::{Choice, search_candidates};

use crate::model::{City, Uf};

const UF_COLS: &[ColumnSpec] = &[
    ColumnSpec::text("name"),
    ColumnSpec::unique_text("abbreviation"),
    ColumnSpec::boolean("idle"),
];

const CITY_COLS: &[ColumnSpec] = &[
    ColumnSpec::text("name"),
    ColumnSpec::text("uf_id"),
    ColumnSpec::boolean("idle"),
];

fn display_uf(doc: &serde_json::Value) -> String {
    doc["abbreviation"].as_str().unwrap_or_default().to_string()
}

fn display_city(doc: &serde_json::Value) -> String {
    let name = doc["name"].as_str().unwrap_or_default();
    match doc["uf_abbreviation"].as_str() {
        Some(uf) if !uf.is_empty() => format!("{name} - {uf}"),
        _ => name.to_string(),
    }
}

/// Resource specs contributed to the registry at startup.
pub fn resource_specs() -> Vec<ResourceSpec> {
    vec![
        ResourceSpec {
            name: "ufs",
            table: "ufs",
            columns: UF_COLS,
            references: &[],
            default_order: "name",
            default_desc: false,
            display: display_uf,
        },
        ResourceSpec {
            name: "cities",
            table: "cities",
            columns: CITY_COLS,
            references: &[],
            default_order: "name",
            default_desc: false,
            display: display_city,
        },
    ]
}

// ── Registry import ─────────────────────────────────────────────────

/// One UF entry from the external geographic registry.
#[derive(Debug, Clone, Deserialize)]
pub struct UfImport {
    pub id: u64,
    pub name: String,
    pub abbreviation: String,
}

/// One city entry from the external geographic registry.
#[derive(Debug, Clone, Deserialize)]
pub struct CityImport {
    pub id: u64,
    pub name: String,
    pub uf_id: u64,
}

/// Full import payload, as read from a seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryData {
    pub ufs: Vec<UfImport>,
    pub cities: Vec<CityImport>,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct ImportStats {
    pub ufs: usize,
    pub cities: usize,
    pub skipped: usize,
}

/// Cities service: autocomplete search plus the one-time reference import.
pub struct CityService {
    store: Arc<EntityStore>,
}

impl CityService {
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    pub fn get_city(&self, id: &str) -> Result<City, ServiceError> {
        let doc = self.store.get("cities", id)?;
        serde_json::from_value(doc).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// Autocomplete candidates for a typed term. Short terms return
    /// nothing; results are capped and matched case-insensitively.
    pub fn autocomplete(&self, term: &str) -> Result<Vec<Choice>, ServiceError> {
        search_candidates(&self.store, "cities", "name", term)
    }

    /// Idempotent bulk import from the external registry. Records keep
    /// their registry ids, so re-running upserts in place. Cities whose UF
    /// is not part of the payload or the store are skipped, not fatal.
    pub fn import_registry(&self, data: &RegistryData) -> Result<ImportStats, ServiceError> {
        let mut stats = ImportStats::default();

        for uf in &data.ufs {
            let record = Uf {
                id: uf.id.to_string(),
                name: uf.name.clone(),
                abbreviation: uf.abbreviation.clone(),
                idle: false,
                notes: None,
            };
            self.store.save("ufs", json!(record))?;
            stats.ufs += 1;
        }

        for city in &data.cities {
            let uf_id = city.uf_id.to_string();
            let Some(uf_doc) = self.store.try_get("ufs", &uf_id)? else {
                tracing::warn!(city = %city.name, uf = %uf_id, "city import skipped, unknown UF");
                stats.skipped += 1;
                continue;
            };
            let record = City {
                id: city.id.to_string(),
                name: city.name.clone(),
                uf_id,
                uf_abbreviation: uf_doc["abbreviation"].as_str().unwrap_or_default().to_string(),
                idle: false,
                notes: None,
            };
            self.store.save("cities", json!(record))?;
            stats.cities += 1;
        }

        tracing::info!(ufs = stats.ufs, cities = stats.cities, skipped = stats.skipped, "registry import done");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinta_sql::{SQLStore, SqliteStore};
    use tinta_store::{Registry, schema::init_schema};

    fn service() -> CityService {
        let mut registry = Registry::new();
        for spec in resource_specs() {
            registry.register(spec);
        }
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let registry = Arc::new(registry);
        init_schema(sql.as_ref(), &registry).unwrap();
        CityService::new(Arc::new(EntityStore::new(sql, registry)))
    }

    fn sample() -> RegistryData {
        RegistryData {
            ufs: vec![UfImport { id: 31, name: "Minas Gerais".into(), abbreviation: "MG".into() }],
            cities: vec![
                CityImport { id: 3106200, name: "Belo Horizonte".into(), uf_id: 31 },
                CityImport { id: 3118601, name: "Contagem".into(), uf_id: 31 },
                CityImport { id: 9999999, name: "Atlantis".into(), uf_id: 99 },
            ],
        }
    }

    #[test]
    fn import_is_idempotent() {
        let svc = service();
        let stats = svc.import_registry(&sample()).unwrap();
        assert_eq!(stats, ImportStats { ufs: 1, cities: 2, skipped: 1 });

        // Re-running changes nothing but still succeeds.
        svc.import_registry(&sample()).unwrap();
        let city = svc.get_city("3106200").unwrap();
        assert_eq!(city.name, "Belo Horizonte");
        assert_eq!(city.uf_abbreviation, "MG");
    }

    #[test]
    fn autocomplete_matches_substring() {
        let svc = service();
        svc.import_registry(&sample()).unwrap();

        let hits = svc.autocomplete("horizon").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "3106200");
        assert_eq!(hits[0].text, "Belo Horizonte - MG");

        // Too short: no scan.
        assert!(svc.autocomplete("ho").unwrap().is_empty());
    }
}
