use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as Json;

use tinta_core::{HasNotes, ServiceError, idle_status_label};
use tinta_store::{EntityStore, Predicate};
use tinta_view::{
    Detail, DetailSpec, DetailView, FormInput, FormResult, FormSpec, Fragment, ListView, Page,
    Section, SectionBody, Tab, render_fragment, render_list, validate_and_save,
};

use crate::model::{Client, ClientAddress, ClientContact};
use crate::views;

/// Upper bound on child rows materialized into a detail view.
const DETAIL_CHILD_LIMIT: usize = 200;

/// Clients service — list, tabbed detail, and the nested
/// client+addresses+contacts form.
pub struct ClientService {
    store: Arc<EntityStore>,
    list: ListView,
    form: FormSpec,
    detail: DetailView,
}

impl ClientService {
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self {
            store,
            list: views::list_view(),
            form: views::form_spec(),
            detail: views::detail_view(),
        }
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
        self.store.delete("clients", id)?;
        tracing::info!(id, "client removed");
        Ok(())
    }

    pub fn get_client(&self, id: &str) -> Result<Client, ServiceError> {
        let doc = self.store.get("clients", id)?;
        serde_json::from_value(doc).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// Tabbed detail: registration data, addresses, contacts, and the
    /// orders placeholder.
    pub fn detail(&self, id: &str) -> Result<Detail, ServiceError> {
        let doc = self.store.get("clients", id)?;
        let client: Client = serde_json::from_value(doc.clone())
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let owned = [Predicate::eq("client_id", id)];
        let (addr_docs, addr_total) =
            self.store.find("client_addresses", &owned, None, 0, DETAIL_CHILD_LIMIT)?;
        let (contact_docs, contact_total) =
            self.store.find("client_contacts", &owned, None, 0, DETAIL_CHILD_LIMIT)?;

        let mut addr_rows = Vec::with_capacity(addr_docs.len());
        for d in &addr_docs {
            let a: ClientAddress = serde_json::from_value(d.clone())
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            addr_rows.push(vec![
                self.display_ref("cities", &a.city_id)?,
                format!("{}, {}", a.street, a.number),
                a.district,
                a.zip_code,
            ]);
        }

        let mut contact_rows = Vec::with_capacity(contact_docs.len());
        for d in &contact_docs {
            let c: ClientContact = serde_json::from_value(d.clone())
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            let notes = c.notes().unwrap_or_default().to_string();
            contact_rows.push(vec![
                self.display_ref("contact_types", &c.contact_type_id)?,
                c.value,
                notes,
            ]);
        }

        let tabs = vec![
            Tab { id: "tab-dados".into(), label: "Dados Cadastrais".into(), active: true },
            Tab {
                id: "tab-enderecos".into(),
                label: format!("Endereços ({addr_total})"),
                active: false,
            },
            Tab {
                id: "tab-contatos".into(),
                label: format!("Contatos ({contact_total})"),
                active: false,
            },
            Tab { id: "tab-orcamentos".into(), label: "Orçamentos".into(), active: false },
        ];

        let sections = vec![
            Section {
                id: "tab-dados".into(),
                title: "Informações Gerais".into(),
                active: true,
                body: SectionBody::Fields {
                    fields: vec![
                        field("Nome / Razão Social", &client.name),
                        field("Nome Fantasia", client.fantasy_name.as_deref().unwrap_or("")),
                        field("Tipo", client.person_type.display()),
                        field("CPF/CNPJ", client.cpf_cnpj.as_deref().unwrap_or("")),
                        field("RG/IE", client.rg_ie.as_deref().unwrap_or("")),
                        field("Status", idle_status_label(&client)),
                        field("Observações", client.notes.as_deref().unwrap_or("")),
                    ],
                },
            },
            Section {
                id: "tab-enderecos".into(),
                title: "Endereços Cadastrados".into(),
                active: false,
                body: SectionBody::Table {
                    headers: vec!["Cidade".into(), "Logradouro".into(), "Bairro".into(), "CEP".into()],
                    rows: addr_rows,
                },
            },
            Section {
                id: "tab-contatos".into(),
                title: "Contatos Cadastrados".into(),
                active: false,
                body: SectionBody::Table {
                    headers: vec!["Tipo".into(), "Valor".into(), "Obs".into()],
                    rows: contact_rows,
                },
            },
            Section {
                id: "tab-orcamentos".into(),
                title: "Histórico de Orçamentos".into(),
                active: false,
                body: SectionBody::Text { text: "Nenhum orçamento emitido ainda.".into() },
            },
        ];

        Ok(self.detail.render(&doc, Some(DetailSpec { tabs, sections, buttons: None })))
    }

    /// Display label of a referenced record; falls back to the raw id when
    /// the reference vanished.
    fn display_ref(&self, resource: &str, id: &str) -> Result<String, ServiceError> {
        Ok(match self.store.try_get(resource, id)? {
            Some(doc) => self.store.registry().display(resource, &doc),
            None => id.to_string(),
        })
    }
}

fn field(label: &str, value: &str) -> tinta_view::detail::FieldValue {
    tinta_view::detail::FieldValue { label: label.to_string(), value: Json::String(value.into()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tinta_sql::{SQLStore, SqliteStore};
    use tinta_store::{Registry, schema::init_schema};

    fn service() -> ClientService {
        let mut registry = Registry::new();
        for spec in tinta_cities::resource_specs() {
            registry.register(spec);
        }
        for spec in tinta_catalog::resource_specs() {
            registry.register(spec);
        }
        for spec in crate::views::resource_specs() {
            registry.register(spec);
        }
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let registry = Arc::new(registry);
        init_schema(sql.as_ref(), &registry).unwrap();
        ClientService::new(Arc::new(EntityStore::new(sql, registry)))
    }

    fn seed_refs(svc: &ClientService) -> (String, String, String) {
        let city = svc
            .store
            .save(
                "cities",
                json!({"name": "Belo Horizonte", "uf_id": "31", "uf_abbreviation": "MG", "idle": false}),
            )
            .unwrap();
        let email_type = svc
            .store
            .save("contact_types", json!({"name": "E-mail", "idle": false}))
            .unwrap();
        let phone_type = svc
            .store
            .save("contact_types", json!({"name": "Telefone", "idle": false}))
            .unwrap();
        (
            city["id"].as_str().unwrap().to_string(),
            email_type["id"].as_str().unwrap().to_string(),
            phone_type["id"].as_str().unwrap().to_string(),
        )
    }

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn row(pairs: &[(&str, &str)]) -> tinta_view::RowInput {
        tinta_view::RowInput { id: None, delete: false, fields: fields(pairs) }
    }

    fn saved(result: FormResult) -> Json {
        match result {
            FormResult::Saved(doc) => doc,
            FormResult::Rejected(r) => panic!("unexpected rejection: {:?}", r.errors),
        }
    }

    #[test]
    fn create_normalizes_names_documents_and_contacts() {
        let svc = service();
        let (city_id, email_type, phone_type) = seed_refs(&svc);

        let input = FormInput {
            fields: fields(&[
                ("name", "  João da Conceição "),
                ("person_type", "F"),
                ("cpf_cnpj", "123.456.789-00"),
            ]),
            collections: BTreeMap::from([
                (
                    "addresses".to_string(),
                    vec![row(&[
                        ("zip_code", "30.130-010"),
                        ("city_id", &city_id),
                        ("street", "Rua dos Aimorés"),
                        ("number", "500"),
                        ("district", "Funcionários"),
                    ])],
                ),
                (
                    "contacts".to_string(),
                    vec![
                        row(&[("contact_type_id", &email_type), ("value", "Joao.C@Example.COM")]),
                        row(&[("contact_type_id", &phone_type), ("value", "(31) 9 9999-9999")]),
                    ],
                ),
            ]),
        };

        let doc = saved(svc.create(input).unwrap());
        assert_eq!(doc["name"], "JOAO DA CONCEICAO");
        assert_eq!(doc["cpf_cnpj"], "12345678900");

        let id = doc["id"].as_str().unwrap();
        let (addrs, _) = svc
            .store
            .find("client_addresses", &[Predicate::eq("client_id", id)], None, 0, 10)
            .unwrap();
        assert_eq!(addrs[0]["zip_code"], "30130010");

        let (contacts, _) = svc
            .store
            .find("client_contacts", &[Predicate::eq("client_id", id)], None, 0, 10)
            .unwrap();
        let values: Vec<&str> = contacts.iter().map(|c| c["value"].as_str().unwrap()).collect();
        assert!(values.contains(&"joao.c@example.com"));
        assert!(values.contains(&"+5531999999999"));
    }

    #[test]
    fn name_search_finds_exactly_the_match() {
        let svc = service();
        for name in ["Ana Silva", "Carlos"] {
            saved(
                svc.create(FormInput {
                    fields: fields(&[("name", name), ("person_type", "F")]),
                    collections: BTreeMap::new(),
                })
                .unwrap(),
            );
        }

        let page = svc.list(&fields(&[("name", "ana")])).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0][1], "ANA SILVA");
    }

    #[test]
    fn detail_has_four_tabs_with_counts() {
        let svc = service();
        let (city_id, email_type, _) = seed_refs(&svc);

        let doc = saved(
            svc.create(FormInput {
                fields: fields(&[("name", "Ana Silva"), ("person_type", "F")]),
                collections: BTreeMap::from([
                    (
                        "addresses".to_string(),
                        vec![row(&[
                            ("zip_code", "30130010"),
                            ("city_id", &city_id),
                            ("street", "Rua A"),
                            ("number", "10"),
                            ("district", "Centro"),
                        ])],
                    ),
                    (
                        "contacts".to_string(),
                        vec![row(&[("contact_type_id", &email_type), ("value", "a@b.com")])],
                    ),
                ]),
            })
            .unwrap(),
        );

        let detail = svc.detail(doc["id"].as_str().unwrap()).unwrap();
        assert_eq!(detail.title, "ANA SILVA");
        assert_eq!(detail.tabs.len(), 4);
        assert_eq!(detail.tabs[1].label, "Endereços (1)");
        assert_eq!(detail.tabs[2].label, "Contatos (1)");

        match &detail.sections[1].body {
            SectionBody::Table { rows, .. } => {
                assert_eq!(rows[0][0], "Belo Horizonte - MG");
                assert_eq!(rows[0][1], "Rua A, 10");
            }
            other => panic!("unexpected body: {other:?}"),
        }
        match &detail.sections[2].body {
            SectionBody::Table { rows, .. } => assert_eq!(rows[0][0], "E-mail"),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn delete_cascades_children_but_not_references() {
        let svc = service();
        let (city_id, email_type, _) = seed_refs(&svc);

        let doc = saved(
            svc.create(FormInput {
                fields: fields(&[("name", "Ana"), ("person_type", "F")]),
                collections: BTreeMap::from([
                    (
                        "addresses".to_string(),
                        vec![row(&[
                            ("zip_code", "30130010"),
                            ("city_id", &city_id),
                            ("street", "Rua A"),
                            ("number", "10"),
                            ("district", "Centro"),
                        ])],
                    ),
                    (
                        "contacts".to_string(),
                        vec![row(&[("contact_type_id", &email_type), ("value", "a@b.com")])],
                    ),
                ]),
            })
            .unwrap(),
        );

        svc.delete(doc["id"].as_str().unwrap()).unwrap();
        assert_eq!(svc.store.count("client_addresses", &[]).unwrap(), 0);
        assert_eq!(svc.store.count("client_contacts", &[]).unwrap(), 0);
        assert_eq!(svc.store.count("cities", &[]).unwrap(), 1);
        assert_eq!(svc.store.count("contact_types", &[]).unwrap(), 2);
    }

    #[test]
    fn city_delete_is_blocked_while_addressed() {
        let svc = service();
        let (city_id, _, _) = seed_refs(&svc);

        saved(
            svc.create(FormInput {
                fields: fields(&[("name", "Ana"), ("person_type", "F")]),
                collections: BTreeMap::from([(
                    "addresses".to_string(),
                    vec![row(&[
                        ("zip_code", "30130010"),
                        ("city_id", &city_id),
                        ("street", "Rua A"),
                        ("number", "10"),
                        ("district", "Centro"),
                    ])],
                )]),
            })
            .unwrap(),
        );

        let err = svc.store.delete("cities", &city_id).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
