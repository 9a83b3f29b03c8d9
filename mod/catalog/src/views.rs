//! Declarative view configuration for every catalog resource.
//!
//! The seven catalog tables share one record shape, so their list, form,
//! and detail views are stamped out by a shared builder — the explicit
//! equivalent of the legacy generic views.

use std::collections::BTreeMap;

use serde_json::Value as Json;

use tinta_store::{ColumnSpec, ResourceSpec};
use tinta_view::{
    DetailView, FieldKind, FieldSpec, FilterDescriptor, FormSpec, Header, ListView,
};

use crate::model::CatalogItem;

const SIMPLE_COLS: &[ColumnSpec] =
    &[ColumnSpec::text("name"), ColumnSpec::boolean("idle")];
const UNIQUE_NAME_COLS: &[ColumnSpec] =
    &[ColumnSpec::unique_text("name"), ColumnSpec::boolean("idle")];
const UNIT_COLS: &[ColumnSpec] = &[
    ColumnSpec::unique_text("code"),
    ColumnSpec::text("name"),
    ColumnSpec::boolean("idle"),
];

fn display_item(doc: &Json) -> String {
    serde_json::from_value::<CatalogItem>(doc.clone())
        .map(|i| i.display())
        .unwrap_or_default()
}

fn simple_row(doc: &Json) -> Vec<String> {
    let item: CatalogItem = serde_json::from_value(doc.clone()).unwrap_or_default();
    let status = if item.idle { "Sim" } else { "Não" };
    vec![item.id.clone(), item.display(), status.to_string()]
}

/// Static description of one catalog resource.
struct CatalogResource {
    key: &'static str,
    table: &'static str,
    title: &'static str,
    name_label: &'static str,
    columns: &'static [ColumnSpec],
    has_code: bool,
}

const RESOURCES: &[CatalogResource] = &[
    CatalogResource {
        key: "materials",
        table: "materials",
        title: "Listagem de Materiais",
        name_label: "Nome do Material",
        columns: SIMPLE_COLS,
        has_code: false,
    },
    CatalogResource {
        key: "services",
        table: "services",
        title: "Listagem de Serviços",
        name_label: "Nome do Serviço",
        columns: SIMPLE_COLS,
        has_code: false,
    },
    CatalogResource {
        key: "rooms",
        table: "rooms",
        title: "Listagem de Cômodos",
        name_label: "Nome do Cômodo",
        columns: SIMPLE_COLS,
        has_code: false,
    },
    CatalogResource {
        key: "room_parts",
        table: "room_parts",
        title: "Listagem de Partes do Cômodo",
        name_label: "Nome da Parte",
        columns: SIMPLE_COLS,
        has_code: false,
    },
    CatalogResource {
        key: "contact_types",
        table: "aux_contact_type",
        title: "Tipos de Contato",
        name_label: "Nome",
        columns: UNIQUE_NAME_COLS,
        has_code: false,
    },
    CatalogResource {
        key: "statuses",
        table: "aux_status",
        title: "Status Auxiliares",
        name_label: "Nome",
        columns: UNIQUE_NAME_COLS,
        has_code: false,
    },
    CatalogResource {
        key: "unit_measures",
        table: "aux_unit_measure",
        title: "Unidades de Medida",
        name_label: "Nome",
        columns: UNIT_COLS,
        has_code: true,
    },
];

/// Resource specs contributed to the registry at startup.
pub fn resource_specs() -> Vec<ResourceSpec> {
    RESOURCES
        .iter()
        .map(|r| ResourceSpec {
            name: r.key,
            table: r.table,
            columns: r.columns,
            references: &[],
            default_order: "name",
            default_desc: false,
            display: display_item,
        })
        .collect()
}

/// The list/form/detail triple of one catalog resource.
pub struct ResourceViews {
    pub list: ListView,
    pub form: FormSpec,
    pub detail: DetailView,
}

fn build_views(r: &CatalogResource) -> ResourceViews {
    let list = ListView {
        title: r.title,
        resource: r.key,
        filters: vec![
            FilterDescriptor::text("name", r.name_label),
            FilterDescriptor::boolean("idle", "Inativo?"),
        ],
        headers: vec![
            Header { field: "id", label: "#" },
            Header { field: "name", label: "Nome" },
            Header { field: "idle", label: "Inativo?" },
        ],
        row_mapper: simple_row,
    };

    let mut fields = Vec::new();
    if r.has_code {
        fields.push(FieldSpec::required("code", "Código (Sigla)", FieldKind::Text));
    }
    fields.push(FieldSpec::required("name", r.name_label, FieldKind::Text));
    fields.push(FieldSpec::optional("idle", "Inativo?", FieldKind::Boolean));
    fields.push(FieldSpec::optional("notes", "Observações", FieldKind::Text));

    let form = FormSpec { resource: r.key, fields, collections: vec![], pre_save: None };

    let mut detail_fields = Vec::new();
    if r.has_code {
        detail_fields.push(("code", "Código (Sigla)"));
    }
    detail_fields.push(("name", r.name_label));
    detail_fields.push(("idle", "Inativo?"));
    detail_fields.push(("notes", "Observações"));

    let detail = DetailView { resource: r.key, fields: detail_fields, display: display_item };

    ResourceViews { list, form, detail }
}

/// All catalog views, keyed by resource.
pub fn resource_views() -> BTreeMap<&'static str, ResourceViews> {
    RESOURCES.iter().map(|r| (r.key, build_views(r))).collect()
}
