//! List presenter: composes the filter engine with the entity store to
//! produce a page of mapped rows plus the redrawn search form state.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as Json;

use tinta_core::ServiceError;
use tinta_store::EntityStore;

use crate::filter::{FilterDescriptor, ListQuery, build_query};

/// A table column.
#[derive(Debug, Clone, Serialize)]
pub struct Header {
    pub field: &'static str,
    pub label: &'static str,
}

/// Maps one record to its ordered row cells.
pub type RowMapper = fn(&Json) -> Vec<String>;

/// Declarative configuration of one list view.
pub struct ListView {
    pub title: &'static str,
    pub resource: &'static str,
    pub filters: Vec<FilterDescriptor>,
    pub headers: Vec<Header>,
    pub row_mapper: RowMapper,
}

/// Redrawn state of one search field, so the form re-renders pre-filled.
#[derive(Debug, Clone, Serialize)]
pub struct SearchFieldState {
    pub name: &'static str,
    pub id: String,
    pub label: &'static str,
    pub kind: crate::filter::FilterKind,
    pub value: String,
    pub options: Vec<SearchOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOption {
    pub value: String,
    pub label: String,
}

/// Full list page payload.
#[derive(Debug, Serialize)]
pub struct Page {
    pub title: &'static str,
    pub headers: Vec<Header>,
    pub rows: Vec<Vec<String>>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub search_fields: Vec<SearchFieldState>,
}

/// Reduced payload for incremental (AJAX) refresh.
#[derive(Debug, Serialize)]
pub struct Fragment {
    pub headers: Vec<Header>,
    pub rows: Vec<Vec<String>>,
    pub total: usize,
    pub page: usize,
}

fn fetch(
    view: &ListView,
    store: &EntityStore,
    raw: &BTreeMap<String, String>,
) -> Result<(Vec<Vec<String>>, usize, ListQuery), ServiceError> {
    let query = build_query(&view.filters, raw);
    let (records, total) = store.find(
        view.resource,
        &query.predicates,
        query.order.as_ref(),
        query.offset(),
        query.page_size,
    )?;
    let rows = records.iter().map(view.row_mapper).collect();
    Ok((rows, total, query))
}

/// Render the full page: rows plus search-form state.
pub fn render_list(
    view: &ListView,
    store: &EntityStore,
    raw: &BTreeMap<String, String>,
) -> Result<Page, ServiceError> {
    let (rows, total, query) = fetch(view, store, raw)?;

    let search_fields = view
        .filters
        .iter()
        .map(|f| SearchFieldState {
            name: f.field,
            id: format!("search-{}", f.field),
            label: f.label,
            kind: f.kind,
            value: raw.get(f.field).cloned().unwrap_or_default(),
            options: f
                .options
                .iter()
                .map(|(value, label)| SearchOption { value: value.clone(), label: label.clone() })
                .collect(),
        })
        .collect();

    Ok(Page {
        title: view.title,
        headers: view.headers.clone(),
        rows,
        total,
        page: query.page,
        page_size: query.page_size,
        search_fields,
    })
}

/// Render the reduced fragment. Skips all search-field state work.
pub fn render_fragment(
    view: &ListView,
    store: &EntityStore,
    raw: &BTreeMap<String, String>,
) -> Result<Fragment, ServiceError> {
    let (rows, total, query) = fetch(view, store, raw)?;
    Ok(Fragment { headers: view.headers.clone(), rows, total, page: query.page })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;
    use tinta_sql::{SQLStore, SqliteStore};
    use tinta_store::{ColumnSpec, Registry, ResourceSpec, schema::init_schema};

    static PEOPLE_SPEC: ResourceSpec = ResourceSpec {
        name: "people",
        table: "people",
        columns: &[ColumnSpec::text("name"), ColumnSpec::boolean("idle")],
        references: &[],
        default_order: "name",
        default_desc: false,
        display: |doc| doc["name"].as_str().unwrap_or_default().to_string(),
    };

    fn store() -> EntityStore {
        let mut registry = Registry::new();
        registry.register(PEOPLE_SPEC);
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let registry = Arc::new(registry);
        init_schema(sql.as_ref(), &registry).unwrap();
        EntityStore::new(sql, registry)
    }

    fn view() -> ListView {
        ListView {
            title: "People",
            resource: "people",
            filters: vec![
                FilterDescriptor::text("name", "Nome"),
                FilterDescriptor::boolean("idle", "Inativo?"),
            ],
            headers: vec![
                Header { field: "name", label: "Nome" },
                Header { field: "idle", label: "Status" },
            ],
            row_mapper: |doc| {
                vec![
                    doc["name"].as_str().unwrap_or_default().to_string(),
                    if doc["idle"].as_bool().unwrap_or(false) { "Sim" } else { "Não" }.to_string(),
                ]
            },
        }
    }

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn search_matches_substring_case_insensitively() {
        let store = store();
        store.save("people", json!({"name": "Ana Silva", "idle": false})).unwrap();
        store.save("people", json!({"name": "Carlos", "idle": false})).unwrap();

        let page = render_list(&view(), &store, &raw(&[("name", "ana")])).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows, vec![vec!["Ana Silva".to_string(), "Não".to_string()]]);
    }

    #[test]
    fn search_state_echoes_submitted_values() {
        let store = store();
        let page = render_list(&view(), &store, &raw(&[("name", "ana")])).unwrap();
        let name_field = page.search_fields.iter().find(|f| f.name == "name").unwrap();
        assert_eq!(name_field.value, "ana");
        assert_eq!(name_field.id, "search-name");

        let idle_field = page.search_fields.iter().find(|f| f.name == "idle").unwrap();
        assert_eq!(idle_field.value, "");
        assert_eq!(idle_field.options.len(), 2);
    }

    #[test]
    fn empty_result_is_a_valid_page() {
        let store = store();
        let page = render_list(&view(), &store, &raw(&[])).unwrap();
        assert_eq!(page.total, 0);
        assert!(page.rows.is_empty());
        assert_eq!(page.headers.len(), 2);
    }

    #[test]
    fn page_past_the_end_keeps_total() {
        let store = store();
        for i in 0..3 {
            store.save("people", json!({"name": format!("P{i}"), "idle": false})).unwrap();
        }
        let page =
            render_list(&view(), &store, &raw(&[("page", "9"), ("records_per_page", "2")])).unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 9);
    }

    #[test]
    fn fragment_has_rows_but_no_search_state() {
        let store = store();
        store.save("people", json!({"name": "Ana", "idle": false})).unwrap();

        let frag = render_fragment(&view(), &store, &raw(&[])).unwrap();
        assert_eq!(frag.total, 1);
        assert_eq!(frag.rows.len(), 1);
        let body = serde_json::to_value(&frag).unwrap();
        assert!(body.get("search_fields").is_none());
        assert!(body.get("title").is_none());
    }
}
