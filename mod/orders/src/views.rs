//! Declarative view configuration for the orders module.

use serde_json::Value as Json;

use tinta_store::{ColumnSpec, OnDelete, ReferenceSpec, ResourceSpec};
use tinta_view::{
    CollectionSpec, DetailView, FieldKind, FieldSpec, FilterDescriptor, FormSpec, Header,
    ListView,
};

use crate::hooks;
use crate::model::Order;

const ORDER_COLS: &[ColumnSpec] = &[
    ColumnSpec::text("client_id"),
    ColumnSpec::text("client_name"),
    ColumnSpec::text("status_id"),
    ColumnSpec::text("issue_date"),
];

const MATERIAL_LINE_COLS: &[ColumnSpec] = &[
    ColumnSpec::text("order_id"),
    ColumnSpec::text("material_id"),
    ColumnSpec::text("unit_measure_id"),
];

const SERVICE_LINE_COLS: &[ColumnSpec] = &[
    ColumnSpec::text("order_id"),
    ColumnSpec::text("service_id"),
    ColumnSpec::text("room_id"),
    ColumnSpec::text("room_part_id"),
];

const ORDER_REFS: &[ReferenceSpec] = &[
    ReferenceSpec { column: "client_id", resource: "clients", on_delete: OnDelete::Protect },
    ReferenceSpec { column: "status_id", resource: "statuses", on_delete: OnDelete::Protect },
];

const MATERIAL_LINE_REFS: &[ReferenceSpec] = &[
    ReferenceSpec { column: "order_id", resource: "orders", on_delete: OnDelete::Cascade },
    ReferenceSpec { column: "material_id", resource: "materials", on_delete: OnDelete::Protect },
    ReferenceSpec { column: "unit_measure_id", resource: "unit_measures", on_delete: OnDelete::Protect },
];

const SERVICE_LINE_REFS: &[ReferenceSpec] = &[
    ReferenceSpec { column: "order_id", resource: "orders", on_delete: OnDelete::Cascade },
    ReferenceSpec { column: "service_id", resource: "services", on_delete: OnDelete::Protect },
    ReferenceSpec { column: "room_id", resource: "rooms", on_delete: OnDelete::Protect },
    ReferenceSpec { column: "room_part_id", resource: "room_parts", on_delete: OnDelete::Protect },
];

fn display_order(doc: &Json) -> String {
    format!(
        "Pedido {} - {}",
        doc["id"].as_str().unwrap_or_default(),
        doc["client_name"].as_str().unwrap_or_default(),
    )
}

/// Resource specs contributed to the registry at startup.
pub fn resource_specs() -> Vec<ResourceSpec> {
    vec![
        ResourceSpec {
            name: "orders",
            table: "orders",
            columns: ORDER_COLS,
            references: ORDER_REFS,
            default_order: "create_at",
            default_desc: true,
            display: display_order,
        },
        ResourceSpec {
            name: "order_materials",
            table: "orders_materials",
            columns: MATERIAL_LINE_COLS,
            references: MATERIAL_LINE_REFS,
            default_order: "create_at",
            default_desc: false,
            display: |doc| doc["material_name"].as_str().unwrap_or_default().to_string(),
        },
        ResourceSpec {
            name: "order_services",
            table: "orders_services",
            columns: SERVICE_LINE_COLS,
            references: SERVICE_LINE_REFS,
            default_order: "create_at",
            default_desc: false,
            display: |doc| doc["service_name"].as_str().unwrap_or_default().to_string(),
        },
    ]
}

fn order_row(doc: &Json) -> Vec<String> {
    let o: Order = serde_json::from_value(doc.clone()).unwrap_or_default();
    vec![o.id, o.client_name, o.issue_date.unwrap_or_default(), o.status_name]
}

/// Orders list view. Status filter options are a per-process snapshot
/// taken at module construction — descriptors stay immutable afterwards.
pub fn list_view(status_options: Vec<(String, String)>) -> ListView {
    ListView {
        title: "Listagem de Pedidos",
        resource: "orders",
        filters: vec![
            FilterDescriptor::text("client_name", "Cliente"),
            FilterDescriptor::select("status_id", "Status", status_options),
        ],
        headers: vec![
            Header { field: "id", label: "#" },
            Header { field: "client_name", label: "Cliente" },
            Header { field: "issue_date", label: "Emissão" },
            Header { field: "status_id", label: "Status" },
        ],
        row_mapper: order_row,
    }
}

pub fn form_spec() -> FormSpec {
    FormSpec {
        resource: "orders",
        fields: vec![
            FieldSpec::required("client_id", "Cliente", FieldKind::ForeignKey("clients")),
            FieldSpec::optional("issue_date", "Data de Emissão", FieldKind::Date),
            FieldSpec::optional("due_date", "Data de Vencimento", FieldKind::Date),
            FieldSpec::optional("lead_time", "Prazo (Dias)", FieldKind::Integer),
            FieldSpec::required("status_id", "Status", FieldKind::ForeignKey("statuses")),
            FieldSpec::optional("notes", "Observações", FieldKind::Text),
        ],
        collections: vec![
            CollectionSpec {
                name: "materials",
                resource: "order_materials",
                parent_column: "order_id",
                fields: vec![
                    FieldSpec::required("material_id", "Material", FieldKind::ForeignKey("materials")),
                    FieldSpec::required(
                        "unit_measure_id",
                        "Unidade Medida",
                        FieldKind::ForeignKey("unit_measures"),
                    ),
                    FieldSpec::required("quantity", "Quantidade", FieldKind::Integer),
                    FieldSpec::optional("notes", "Observações", FieldKind::Text),
                ],
                pre_save: Some(hooks::material_row_pre_save),
            },
            CollectionSpec {
                name: "services",
                resource: "order_services",
                parent_column: "order_id",
                fields: vec![
                    FieldSpec::required("service_id", "Serviço", FieldKind::ForeignKey("services")),
                    FieldSpec::required("room_id", "Ambiente", FieldKind::ForeignKey("rooms")),
                    FieldSpec::required(
                        "room_part_id",
                        "Parte do Ambiente",
                        FieldKind::ForeignKey("room_parts"),
                    ),
                    FieldSpec::required("quantity", "Quantidade", FieldKind::Integer),
                    FieldSpec::required("price", "Preço", FieldKind::Decimal),
                    FieldSpec::optional("discount", "Desconto", FieldKind::Decimal),
                    FieldSpec::optional("notes", "Observações", FieldKind::Text),
                ],
                pre_save: Some(hooks::service_row_pre_save),
            },
        ],
        pre_save: Some(hooks::order_pre_save),
    }
}

pub fn detail_view() -> DetailView {
    DetailView {
        resource: "orders",
        fields: vec![
            ("client_name", "Cliente"),
            ("issue_date", "Data de Emissão"),
            ("due_date", "Data de Vencimento"),
            ("lead_time", "Prazo (Dias)"),
            ("status_name", "Status"),
            ("notes", "Observações"),
        ],
        display: display_order,
    }
}
