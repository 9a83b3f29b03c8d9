//! Dynamic choice resolution for foreign-key fields.
//!
//! Reference tables (cities especially) are far too large to enumerate
//! into a rendered option list, so a foreign-key field only ever
//! materializes the single candidate it needs: the submitted value, or the
//! stored value of the record being edited, or nothing. Browsing the full
//! set happens through the out-of-band autocomplete search instead.

use serde::Serialize;

use tinta_core::ServiceError;
use tinta_store::{EntityStore, Predicate};

/// Autocomplete only triggers for terms longer than this.
pub const SEARCH_MIN_CHARS: usize = 2;

/// Autocomplete never returns more matches than this.
pub const SEARCH_LIMIT: usize = 20;

/// A selectable candidate: record id plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
}

/// Resolve the minimal candidate set for a foreign-key field.
///
/// Priority: the submitted raw value (a write attempt) wins over the value
/// stored on the instance being edited; a new untouched field resolves to
/// nothing. An id that does not exist resolves to the empty set — the
/// field then fails required-value validation downstream instead of
/// erroring here. The result never holds more than one candidate.
pub fn resolve_candidates(
    store: &EntityStore,
    resource: &str,
    submitted: Option<&str>,
    instance: Option<&str>,
) -> Result<Vec<Choice>, ServiceError> {
    let id = match (nonempty(submitted), nonempty(instance)) {
        (Some(id), _) => id,
        (None, Some(id)) => id,
        (None, None) => return Ok(Vec::new()),
    };

    match store.try_get(resource, id)? {
        Some(doc) => Ok(vec![Choice {
            id: id.to_string(),
            text: store.registry().display(resource, &doc),
        }]),
        None => Ok(Vec::new()),
    }
}

/// Out-of-band candidate search backing the autocomplete endpoint:
/// case-insensitive containment on the given column, capped result set.
/// Short terms return nothing rather than scanning the table.
pub fn search_candidates(
    store: &EntityStore,
    resource: &str,
    column: &str,
    term: &str,
) -> Result<Vec<Choice>, ServiceError> {
    let term = term.trim();
    if term.chars().count() <= SEARCH_MIN_CHARS {
        return Ok(Vec::new());
    }

    let (records, _total) = store.find(
        resource,
        &[Predicate::contains(column, term)],
        None,
        0,
        SEARCH_LIMIT,
    )?;

    Ok(records
        .iter()
        .map(|doc| Choice {
            id: doc["id"].as_str().unwrap_or_default().to_string(),
            text: store.registry().display(resource, doc),
        })
        .collect())
}

fn nonempty(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;
    use tinta_sql::{SQLStore, SqliteStore};
    use tinta_store::{ColumnSpec, Registry, ResourceSpec, schema::init_schema};

    static CITY_SPEC: ResourceSpec = ResourceSpec {
        name: "cities",
        table: "cities",
        columns: &[ColumnSpec::text("name")],
        references: &[],
        default_order: "name",
        default_desc: false,
        display: |doc| doc["name"].as_str().unwrap_or_default().to_string(),
    };

    fn store() -> EntityStore {
        let mut registry = Registry::new();
        registry.register(CITY_SPEC);
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let registry = Arc::new(registry);
        init_schema(sql.as_ref(), &registry).unwrap();
        EntityStore::new(sql, registry)
    }

    #[test]
    fn unbound_field_resolves_to_nothing() {
        let store = store();
        let c = resolve_candidates(&store, "cities", None, None).unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn instance_value_resolves_to_exactly_itself() {
        let store = store();
        let city = store.save("cities", json!({"name": "Belo Horizonte"})).unwrap();
        let id = city["id"].as_str().unwrap();

        let c = resolve_candidates(&store, "cities", None, Some(id)).unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].id, id);
        assert_eq!(c[0].text, "Belo Horizonte");
    }

    #[test]
    fn submitted_value_wins_over_instance_value() {
        let store = store();
        let stored = store.save("cities", json!({"name": "Belo Horizonte"})).unwrap();
        let submitted = store.save("cities", json!({"name": "Contagem"})).unwrap();

        let c = resolve_candidates(
            &store,
            "cities",
            submitted["id"].as_str(),
            stored["id"].as_str(),
        )
        .unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].text, "Contagem");
    }

    #[test]
    fn unknown_submitted_id_resolves_empty() {
        let store = store();
        store.save("cities", json!({"name": "Belo Horizonte"})).unwrap();
        let c = resolve_candidates(&store, "cities", Some("bogus"), None).unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn search_requires_three_chars() {
        let store = store();
        store.save("cities", json!({"name": "Belo Horizonte"})).unwrap();

        assert!(search_candidates(&store, "cities", "name", "be").unwrap().is_empty());
        let hits = search_candidates(&store, "cities", "name", "belo").unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn search_is_capped() {
        let store = store();
        for i in 0..30 {
            store.save("cities", json!({"name": format!("Cidade {i:02}")})).unwrap();
        }
        let hits = search_candidates(&store, "cities", "name", "cidade").unwrap();
        assert_eq!(hits.len(), SEARCH_LIMIT);
    }
}
