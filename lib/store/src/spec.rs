use std::collections::BTreeMap;

use serde_json::Value as Json;

/// SQL type of an indexed column extracted from the record document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Boolean,
    Real,
}

/// An indexed column. The name doubles as the JSON field it is extracted
/// from; only declared columns can be filtered or sorted on.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub unique: bool,
}

impl ColumnSpec {
    pub const fn text(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Text, unique: false }
    }

    pub const fn unique_text(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Text, unique: true }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Integer, unique: false }
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Boolean, unique: false }
    }

    pub const fn real(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Real, unique: false }
    }
}

/// Referential rule applied when the *referenced* record is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Block deletion of the referenced record while this row exists.
    Protect,
    /// Delete this row together with the referenced record.
    Cascade,
}

/// A foreign-key column on this resource pointing at another resource.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceSpec {
    pub column: &'static str,
    pub resource: &'static str,
    pub on_delete: OnDelete,
}

/// Declarative description of one stored resource.
///
/// Records are stored as a JSON document in a `data` column; the declared
/// columns are extracted from the document for filtering, sorting, and
/// uniqueness. `create_at`/`update_at` columns exist on every table and
/// need not be declared.
#[derive(Clone, Copy)]
pub struct ResourceSpec {
    /// Registry key and URL segment, e.g. `"clients"`.
    pub name: &'static str,
    pub table: &'static str,
    pub columns: &'static [ColumnSpec],
    pub references: &'static [ReferenceSpec],
    /// Column for store-default ordering.
    pub default_order: &'static str,
    pub default_desc: bool,
    /// Human-readable label for a record, used by choice candidates and
    /// detail titles.
    pub display: fn(&Json) -> String,
}

impl std::fmt::Debug for ResourceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceSpec")
            .field("name", &self.name)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl ResourceSpec {
    /// Whether `name` is a declared column (or a timestamp column).
    pub fn has_column(&self, name: &str) -> bool {
        name == "create_at"
            || name == "update_at"
            || self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Explicit resource registry, assembled once at startup.
///
/// Every module hands its resource specs to the composition root, which
/// builds one registry and passes it to the stores and presenters. Nothing
/// is discovered by reflection or global state.
#[derive(Debug, Default)]
pub struct Registry {
    resources: BTreeMap<&'static str, ResourceSpec>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource. Panics on duplicate names: registration runs
    /// once at startup and a duplicate is a wiring bug.
    pub fn register(&mut self, spec: ResourceSpec) {
        let prev = self.resources.insert(spec.name, spec);
        assert!(prev.is_none(), "duplicate resource registered: {}", spec.name);
    }

    pub fn get(&self, name: &str) -> Option<&ResourceSpec> {
        self.resources.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceSpec> {
        self.resources.values()
    }

    /// All (resource, reference) pairs whose rows point at `target`.
    pub fn referencing(&self, target: &str) -> Vec<(&ResourceSpec, &ReferenceSpec)> {
        let mut out = Vec::new();
        for spec in self.resources.values() {
            for r in spec.references {
                if r.resource == target {
                    out.push((spec, r));
                }
            }
        }
        out
    }

    /// Render a record's display label via its resource spec.
    pub fn display(&self, resource: &str, doc: &Json) -> String {
        match self.get(resource) {
            Some(spec) => (spec.display)(doc),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &'static str, refs: &'static [ReferenceSpec]) -> ResourceSpec {
        const COLS: &[ColumnSpec] = &[ColumnSpec::text("name")];
        ResourceSpec {
            name,
            table: name,
            columns: COLS,
            references: refs,
            default_order: "name",
            default_desc: false,
            display: |doc| doc["name"].as_str().unwrap_or_default().to_string(),
        }
    }

    #[test]
    fn referencing_finds_reverse_links() {
        let mut reg = Registry::new();
        reg.register(spec("parents", &[]));
        reg.register(spec(
            "children",
            &[ReferenceSpec { column: "parent_id", resource: "parents", on_delete: OnDelete::Cascade }],
        ));

        let refs = reg.referencing("parents");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].0.name, "children");
        assert_eq!(refs[0].1.column, "parent_id");
    }

    #[test]
    #[should_panic(expected = "duplicate resource")]
    fn duplicate_registration_panics() {
        let mut reg = Registry::new();
        reg.register(spec("parents", &[]));
        reg.register(spec("parents", &[]));
    }
}
