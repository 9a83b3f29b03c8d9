//! Declarative view configuration for the clients module.

use serde_json::Value as Json;

use tinta_store::{ColumnSpec, OnDelete, ReferenceSpec, ResourceSpec};
use tinta_view::{
    CollectionSpec, DetailView, FieldKind, FieldSpec, FilterDescriptor, FormSpec, Header,
    ListView,
};

use crate::model::Client;
use crate::normalize;

pub const PERSON_TYPE_CHOICES: &[(&str, &str)] =
    &[("F", "Pessoa Física"), ("J", "Pessoa Jurídica")];

const CLIENT_COLS: &[ColumnSpec] = &[
    ColumnSpec::text("name"),
    ColumnSpec::unique_text("cpf_cnpj"),
    ColumnSpec::text("person_type"),
    ColumnSpec::boolean("idle"),
];

const ADDRESS_COLS: &[ColumnSpec] = &[
    ColumnSpec::text("client_id"),
    ColumnSpec::text("city_id"),
    ColumnSpec::text("zip_code"),
    ColumnSpec::text("street"),
    ColumnSpec::text("district"),
];

const CONTACT_COLS: &[ColumnSpec] = &[
    ColumnSpec::text("client_id"),
    ColumnSpec::text("contact_type_id"),
    ColumnSpec::text("value"),
];

const ADDRESS_REFS: &[ReferenceSpec] = &[
    ReferenceSpec { column: "client_id", resource: "clients", on_delete: OnDelete::Cascade },
    ReferenceSpec { column: "city_id", resource: "cities", on_delete: OnDelete::Protect },
];

const CONTACT_REFS: &[ReferenceSpec] = &[
    ReferenceSpec { column: "client_id", resource: "clients", on_delete: OnDelete::Cascade },
    ReferenceSpec { column: "contact_type_id", resource: "contact_types", on_delete: OnDelete::Protect },
];

fn display_client(doc: &Json) -> String {
    doc["name"].as_str().unwrap_or_default().to_string()
}

/// Resource specs contributed to the registry at startup.
pub fn resource_specs() -> Vec<ResourceSpec> {
    vec![
        ResourceSpec {
            name: "clients",
            table: "clients",
            columns: CLIENT_COLS,
            references: &[],
            default_order: "name",
            default_desc: false,
            display: display_client,
        },
        ResourceSpec {
            name: "client_addresses",
            table: "clients_addresses",
            columns: ADDRESS_COLS,
            references: ADDRESS_REFS,
            default_order: "create_at",
            default_desc: false,
            display: |doc| {
                format!(
                    "{}, {}",
                    doc["street"].as_str().unwrap_or_default(),
                    doc["number"].as_str().unwrap_or_default(),
                )
            },
        },
        ResourceSpec {
            name: "client_contacts",
            table: "clients_contacts",
            columns: CONTACT_COLS,
            references: CONTACT_REFS,
            default_order: "create_at",
            default_desc: false,
            display: |doc| doc["value"].as_str().unwrap_or_default().to_string(),
        },
    ]
}

fn client_row(doc: &Json) -> Vec<String> {
    let c: Client = serde_json::from_value(doc.clone()).unwrap_or_default();
    let status = if c.idle { "Sim" } else { "Não" };
    vec![c.id, c.name, c.cpf_cnpj.unwrap_or_default(), status.to_string()]
}

pub fn list_view() -> ListView {
    ListView {
        title: "Listagem de Clientes",
        resource: "clients",
        filters: vec![
            FilterDescriptor::text("name", "Nome"),
            FilterDescriptor::text("cpf_cnpj", "Documento"),
            FilterDescriptor::boolean("idle", "Inativo?"),
        ],
        headers: vec![
            Header { field: "id", label: "#" },
            Header { field: "name", label: "Nome" },
            Header { field: "cpf_cnpj", label: "Documento" },
            Header { field: "idle", label: "Status" },
        ],
        row_mapper: client_row,
    }
}

pub fn form_spec() -> FormSpec {
    FormSpec {
        resource: "clients",
        fields: vec![
            FieldSpec::required("name", "Nome / Razão Social", FieldKind::Text),
            FieldSpec::optional("fantasy_name", "Nome Fantasia", FieldKind::Text),
            FieldSpec::required(
                "person_type",
                "Tipo de Pessoa",
                FieldKind::Select(PERSON_TYPE_CHOICES),
            ),
            FieldSpec::optional("cpf_cnpj", "CPF ou CNPJ", FieldKind::Text),
            FieldSpec::optional("rg_ie", "RG / Inscrição Estadual", FieldKind::Text),
            FieldSpec::optional("idle", "Cliente Inativo?", FieldKind::Boolean),
            FieldSpec::optional("notes", "Observações", FieldKind::Text),
        ],
        collections: vec![
            CollectionSpec {
                name: "addresses",
                resource: "client_addresses",
                parent_column: "client_id",
                fields: vec![
                    FieldSpec::required("zip_code", "CEP", FieldKind::Text),
                    FieldSpec::required("city_id", "Cidade", FieldKind::ForeignKey("cities")),
                    FieldSpec::required("street", "Logradouro (Rua/Av)", FieldKind::Text),
                    FieldSpec::required("number", "Número", FieldKind::Text),
                    FieldSpec::optional("complement", "Complemento", FieldKind::Text),
                    FieldSpec::required("district", "Bairro", FieldKind::Text),
                    FieldSpec::optional("notes", "Observações", FieldKind::Text),
                ],
                pre_save: Some(normalize::address_pre_save),
            },
            CollectionSpec {
                name: "contacts",
                resource: "client_contacts",
                parent_column: "client_id",
                fields: vec![
                    FieldSpec::required(
                        "contact_type_id",
                        "Tipo de Contato",
                        FieldKind::ForeignKey("contact_types"),
                    ),
                    FieldSpec::required("value", "Valor (Tel/Email)", FieldKind::Text),
                    FieldSpec::optional("notes", "Observações", FieldKind::Text),
                ],
                pre_save: Some(normalize::contact_pre_save),
            },
        ],
        pre_save: Some(normalize::client_pre_save),
    }
}

pub fn detail_view() -> DetailView {
    DetailView {
        resource: "clients",
        fields: vec![
            ("name", "Nome / Razão Social"),
            ("fantasy_name", "Nome Fantasia"),
            ("person_type", "Tipo de Pessoa"),
            ("cpf_cnpj", "CPF/CNPJ"),
            ("rg_ie", "RG/IE"),
            ("idle", "Inativo?"),
            ("notes", "Observações"),
        ],
        display: display_client,
    }
}
