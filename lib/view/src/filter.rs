//! Filter/query engine: declarative filter descriptors + raw request
//! parameters in, validated predicates and ordering out.

use std::collections::BTreeMap;

use serde::Serialize;

use tinta_sql::Value;
use tinta_store::{OrderBy, Predicate};

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Upper bound for a per-request `records_per_page` override.
pub const MAX_PAGE_SIZE: usize = 100;

/// Kind of a declared search field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Text,
    Select,
    Boolean,
}

/// One searchable field of a list view. Declared once per view and
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct FilterDescriptor {
    pub field: &'static str,
    pub kind: FilterKind,
    pub label: &'static str,
    /// `(value, label)` pairs for select fields.
    pub options: Vec<(String, String)>,
}

impl FilterDescriptor {
    pub fn text(field: &'static str, label: &'static str) -> Self {
        Self { field, kind: FilterKind::Text, label, options: Vec::new() }
    }

    pub fn boolean(field: &'static str, label: &'static str) -> Self {
        Self {
            field,
            kind: FilterKind::Boolean,
            label,
            options: vec![("True".into(), "Sim".into()), ("False".into(), "Não".into())],
        }
    }

    pub fn select(field: &'static str, label: &'static str, options: Vec<(String, String)>) -> Self {
        Self { field, kind: FilterKind::Select, label, options }
    }
}

/// A validated per-request list query.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub predicates: Vec<Predicate>,
    pub order: Option<OrderBy>,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl ListQuery {
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }
}

/// Build a [`ListQuery`] from raw request parameters.
///
/// Only fields present in `descriptors` may produce predicates — anything
/// else in `raw` is ignored, never an error. Malformed boolean or numeric
/// input likewise degrades to "no filter on that field".
pub fn build_query(descriptors: &[FilterDescriptor], raw: &BTreeMap<String, String>) -> ListQuery {
    let mut predicates = Vec::new();

    for desc in descriptors {
        let Some(value) = raw.get(desc.field).map(|v| v.trim()).filter(|v| !v.is_empty())
        else {
            continue;
        };
        match desc.kind {
            FilterKind::Text => {
                predicates.push(Predicate::contains(desc.field, value));
            }
            FilterKind::Select | FilterKind::Boolean => match coerce_exact(desc.kind, value) {
                Some(v) => predicates.push(Predicate::Eq { column: desc.field.into(), value: v }),
                None => tracing::debug!(field = desc.field, value, "unusable filter value, skipped"),
            },
        }
    }

    let order = raw
        .get("order_by")
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|column| OrderBy {
            column: column.to_string(),
            descending: raw.get("descending").is_some_and(|d| d == "True"),
        });

    let page = raw
        .get("page")
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1);

    let page_size = raw
        .get("records_per_page")
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);

    ListQuery { predicates, order, page, page_size }
}

/// Coerce a select/boolean filter value to its storage representation:
/// `"True"`/`"False"` become booleans, other select values match as text.
/// Non-boolean junk on a boolean field yields no filter at all.
fn coerce_exact(kind: FilterKind, value: &str) -> Option<Value> {
    match (kind, value) {
        (_, "True") => Some(Value::from(true)),
        (_, "False") => Some(Value::from(false)),
        (FilterKind::Boolean, _) => None,
        (_, other) => Some(Value::from(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn descriptors() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::text("name", "Nome"),
            FilterDescriptor::text("cpf_cnpj", "Documento"),
            FilterDescriptor::boolean("idle", "Inativo?"),
        ]
    }

    #[test]
    fn text_filter_becomes_contains() {
        let q = build_query(&descriptors(), &raw(&[("name", "ana")]));
        assert_eq!(q.predicates.len(), 1);
        assert!(matches!(
            &q.predicates[0],
            Predicate::Contains { column, needle } if column == "name" && needle == "ana"
        ));
    }

    #[test]
    fn boolean_filter_coerces_true_false() {
        let q = build_query(&descriptors(), &raw(&[("idle", "True")]));
        assert!(matches!(
            &q.predicates[0],
            Predicate::Eq { column, value } if column == "idle" && *value == Value::Integer(1)
        ));

        let q = build_query(&descriptors(), &raw(&[("idle", "False")]));
        assert!(matches!(
            &q.predicates[0],
            Predicate::Eq { value, .. } if *value == Value::Integer(0)
        ));
    }

    #[test]
    fn boolean_junk_degrades_to_no_filter() {
        let q = build_query(&descriptors(), &raw(&[("idle", "maybe")]));
        assert!(q.predicates.is_empty());
    }

    #[test]
    fn undeclared_field_is_ignored() {
        let q = build_query(&descriptors(), &raw(&[("secret_column", "x")]));
        assert!(q.predicates.is_empty());
    }

    #[test]
    fn empty_value_is_no_filter() {
        let q = build_query(&descriptors(), &raw(&[("name", "  ")]));
        assert!(q.predicates.is_empty());
    }

    #[test]
    fn ordering_and_direction() {
        let q = build_query(&descriptors(), &raw(&[("order_by", "name"), ("descending", "True")]));
        let order = q.order.unwrap();
        assert_eq!(order.column, "name");
        assert!(order.descending);

        let q = build_query(&descriptors(), &raw(&[("order_by", "name")]));
        assert!(!q.order.unwrap().descending);

        let q = build_query(&descriptors(), &raw(&[]));
        assert!(q.order.is_none());
    }

    #[test]
    fn pagination_defaults_and_bounds() {
        let q = build_query(&descriptors(), &raw(&[]));
        assert_eq!((q.page, q.page_size), (1, DEFAULT_PAGE_SIZE));

        let q = build_query(&descriptors(), &raw(&[("page", "3"), ("records_per_page", "5")]));
        assert_eq!((q.page, q.page_size), (3, 5));
        assert_eq!(q.offset(), 10);

        // Malformed input degrades to defaults; oversize is clamped.
        let q = build_query(&descriptors(), &raw(&[("page", "abc"), ("records_per_page", "9999")]));
        assert_eq!((q.page, q.page_size), (1, MAX_PAGE_SIZE));

        let q = build_query(&descriptors(), &raw(&[("page", "0")]));
        assert_eq!(q.page, 1);
    }
}
