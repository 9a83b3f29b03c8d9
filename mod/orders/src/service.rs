use std::collections::BTreeMap;
use std::sync::Arc;

use tinta_core::ServiceError;
use tinta_store::{EntityStore, Predicate};
use tinta_view::{
    Detail, DetailSpec, DetailView, FormInput, FormResult, FormSpec, Fragment, ListView, Page,
    Section, SectionBody, Tab, render_fragment, render_list, validate_and_save,
};

use crate::model::{Order, OrderMaterial, OrderService};
use crate::views;

/// Upper bound on line rows materialized into a detail view.
const DETAIL_LINE_LIMIT: usize = 200;

/// Orders service — order listing, tabbed detail, and the nested
/// order+materials+services form.
pub struct OrdersService {
    store: Arc<EntityStore>,
    list: ListView,
    form: FormSpec,
    detail: DetailView,
}

impl OrdersService {
    /// Build the service, snapshotting the status filter options from the
    /// store (view configuration is immutable per process).
    pub fn new(store: Arc<EntityStore>) -> Result<Self, ServiceError> {
        let (status_docs, _) = store.find("statuses", &[], None, 0, 100)?;
        let status_options = status_docs
            .iter()
            .filter_map(|doc| {
                let id = doc["id"].as_str()?;
                let name = doc["name"].as_str()?;
                Some((id.to_string(), name.to_string()))
            })
            .collect();

        Ok(Self {
            store,
            list: views::list_view(status_options),
            form: views::form_spec(),
            detail: views::detail_view(),
        })
    }

    pub fn list(&self, raw: &BTreeMap<String, String>) -> Result<Page, ServiceError> {
        render_list(&self.list, &self.store, raw)
    }

    pub fn list_fragment(&self, raw: &BTreeMap<String, String>) -> Result<Fragment, ServiceError> {
        render_fragment(&self.list, &self.store, raw)
    }

    pub fn create(&self, input: FormInput) -> Result<FormResult, ServiceError> {
        validate_and_save(&self.store, &self.form, None, input)
    }

    pub fn update(&self, id: &str, input: FormInput) -> Result<FormResult, ServiceError> {
        validate_and_save(&self.store, &self.form, Some(id), input)
    }

    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.store.delete("orders", id)?;
        tracing::info!(id, "order removed");
        Ok(())
    }

    pub fn get_order(&self, id: &str) -> Result<Order, ServiceError> {
        let doc = self.store.get("orders", id)?;
        serde_json::from_value(doc).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// Tabbed detail: order data plus material and service line tables.
    pub fn detail(&self, id: &str) -> Result<Detail, ServiceError> {
        let doc = self.store.get("orders", id)?;

        let owned = [Predicate::eq("order_id", id)];
        let (material_docs, material_total) =
            self.store.find("order_materials", &owned, None, 0, DETAIL_LINE_LIMIT)?;
        let (service_docs, service_total) =
            self.store.find("order_services", &owned, None, 0, DETAIL_LINE_LIMIT)?;

        let mut material_rows = Vec::with_capacity(material_docs.len());
        for d in &material_docs {
            let m: OrderMaterial = serde_json::from_value(d.clone())
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            material_rows.push(vec![
                m.material_name,
                m.unit_label,
                m.quantity.to_string(),
                m.notes.unwrap_or_default(),
            ]);
        }

        let mut service_rows = Vec::with_capacity(service_docs.len());
        for d in &service_docs {
            let s: OrderService = serde_json::from_value(d.clone())
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            service_rows.push(vec![
                s.service_name,
                s.room_name,
                s.room_part_name,
                s.quantity.to_string(),
                format!("{:.2}", s.price),
                format!("{:.2}", s.discount),
            ]);
        }

        let tabs = vec![
            Tab { id: "tab-dados".into(), label: "Dados do Pedido".into(), active: true },
            Tab {
                id: "tab-materiais".into(),
                label: format!("Materiais ({material_total})"),
                active: false,
            },
            Tab {
                id: "tab-servicos".into(),
                label: format!("Serviços ({service_total})"),
                active: false,
            },
        ];

        let order: Order = serde_json::from_value(doc.clone())
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let sections = vec![
            Section {
                id: "tab-dados".into(),
                title: "Informações Gerais".into(),
                active: true,
                body: SectionBody::Fields {
                    fields: vec![
                        field("Cliente", &order.client_name),
                        field("Data de Emissão", order.issue_date.as_deref().unwrap_or("")),
                        field("Data de Vencimento", order.due_date.as_deref().unwrap_or("")),
                        field(
                            "Prazo (Dias)",
                            &order.lead_time.map(|d| d.to_string()).unwrap_or_default(),
                        ),
                        field("Status", &order.status_name),
                        field("Observações", order.notes.as_deref().unwrap_or("")),
                    ],
                },
            },
            Section {
                id: "tab-materiais".into(),
                title: "Materiais do Pedido".into(),
                active: false,
                body: SectionBody::Table {
                    headers: vec!["Material".into(), "Unidade".into(), "Qtd".into(), "Obs".into()],
                    rows: material_rows,
                },
            },
            Section {
                id: "tab-servicos".into(),
                title: "Serviços do Pedido".into(),
                active: false,
                body: SectionBody::Table {
                    headers: vec![
                        "Serviço".into(),
                        "Ambiente".into(),
                        "Parte".into(),
                        "Qtd".into(),
                        "Preço".into(),
                        "Desconto".into(),
                    ],
                    rows: service_rows,
                },
            },
        ];

        Ok(self.detail.render(&doc, Some(DetailSpec { tabs, sections, buttons: None })))
    }
}

fn field(label: &str, value: &str) -> tinta_view::detail::FieldValue {
    tinta_view::detail::FieldValue {
        label: label.to_string(),
        value: serde_json::Value::String(value.into()),
    }
}
