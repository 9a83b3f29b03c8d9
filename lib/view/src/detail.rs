//! Detail presenter: composes a record's fields into tabs, sections, and
//! action buttons for read-only display.

use serde::Serialize;
use serde_json::Value as Json;

/// One tab in a detail page.
#[derive(Debug, Clone, Serialize)]
pub struct Tab {
    pub id: String,
    pub label: String,
    pub active: bool,
}

/// One labeled field value inside a fields section.
#[derive(Debug, Clone, Serialize)]
pub struct FieldValue {
    pub label: String,
    pub value: Json,
}

/// Body of a section: a label/value listing, an embedded table (child
/// collections), or plain placeholder text.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SectionBody {
    Fields { fields: Vec<FieldValue> },
    Table { headers: Vec<String>, rows: Vec<Vec<String>> },
    Text { text: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub active: bool,
    #[serde(flatten)]
    pub body: SectionBody,
}

/// An action button below the detail view.
#[derive(Debug, Clone, Serialize)]
pub struct Button {
    pub class: String,
    pub url: String,
    pub label: String,
}

/// Fully-rendered detail payload.
#[derive(Debug, Serialize)]
pub struct Detail {
    pub title: String,
    pub tabs: Vec<Tab>,
    pub sections: Vec<Section>,
    pub buttons: Vec<Button>,
}

/// Explicit tab/section layout supplied by a view; buttons may be
/// overridden too.
#[derive(Debug, Clone, Default)]
pub struct DetailSpec {
    pub tabs: Vec<Tab>,
    pub sections: Vec<Section>,
    pub buttons: Option<Vec<Button>>,
}

/// Declarative configuration of one detail view.
pub struct DetailView {
    pub resource: &'static str,
    /// `(field, label)` pairs used for the derived default section.
    pub fields: Vec<(&'static str, &'static str)>,
    /// Record display label, used as the page title.
    pub display: fn(&Json) -> String,
}

impl DetailView {
    /// Render a record. With no explicit layout, one default tab and one
    /// section listing every declared field are derived; buttons are
    /// derived from the resource name unless the layout overrides them.
    pub fn render(&self, record: &Json, spec: Option<DetailSpec>) -> Detail {
        let id = record["id"].as_str().unwrap_or_default();
        let title = (self.display)(record);

        let (tabs, sections, buttons) = match spec {
            Some(s) => {
                let buttons = s.buttons.unwrap_or_else(|| default_buttons(self.resource, id));
                (s.tabs, s.sections, buttons)
            }
            None => {
                let tabs = vec![Tab { id: "tab-main".into(), label: "Dados".into(), active: true }];
                let sections = vec![Section {
                    id: "tab-main".into(),
                    title: "Dados do Registro".into(),
                    active: true,
                    body: SectionBody::Fields {
                        fields: self
                            .fields
                            .iter()
                            .map(|(field, label)| FieldValue {
                                label: (*label).to_string(),
                                value: record[*field].clone(),
                            })
                            .collect(),
                    },
                }];
                (tabs, sections, default_buttons(self.resource, id))
            }
        };

        Detail { title, tabs, sections, buttons }
    }
}

/// Edit / delete / return buttons derived from the resource name.
pub fn default_buttons(resource: &str, id: &str) -> Vec<Button> {
    vec![
        Button {
            class: "btn-edit".into(),
            url: format!("/{resource}/{id}/edit"),
            label: "Editar".into(),
        },
        Button {
            class: "btn-delete".into(),
            url: format!("/{resource}/{id}/delete"),
            label: "Excluir".into(),
        },
        Button { class: "btn-return".into(), url: format!("/{resource}"), label: "Voltar".into() },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn view() -> DetailView {
        DetailView {
            resource: "materials",
            fields: vec![("name", "Nome do Material"), ("idle", "Inativo?")],
            display: |doc| doc["name"].as_str().unwrap_or_default().to_string(),
        }
    }

    #[test]
    fn default_layout_lists_declared_fields() {
        let record = json!({"id": "m1", "name": "Tinta Acrílica", "idle": false});
        let detail = view().render(&record, None);

        assert_eq!(detail.title, "Tinta Acrílica");
        assert_eq!(detail.tabs.len(), 1);
        assert_eq!(detail.sections.len(), 1);
        match &detail.sections[0].body {
            SectionBody::Fields { fields } => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].label, "Nome do Material");
                assert_eq!(fields[0].value, json!("Tinta Acrílica"));
            }
            other => panic!("unexpected body: {other:?}"),
        }
        assert_eq!(detail.buttons.len(), 3);
        assert_eq!(detail.buttons[0].url, "/materials/m1/edit");
        assert_eq!(detail.buttons[2].url, "/materials");
    }

    #[test]
    fn explicit_spec_wins() {
        let record = json!({"id": "m1", "name": "Tinta"});
        let spec = DetailSpec {
            tabs: vec![
                Tab { id: "t1".into(), label: "Um".into(), active: true },
                Tab { id: "t2".into(), label: "Dois".into(), active: false },
            ],
            sections: vec![Section {
                id: "t2".into(),
                title: "Tabela".into(),
                active: false,
                body: SectionBody::Table {
                    headers: vec!["A".into()],
                    rows: vec![vec!["1".into()]],
                },
            }],
            buttons: Some(vec![]),
        };
        let detail = view().render(&record, Some(spec));
        assert_eq!(detail.tabs.len(), 2);
        assert!(detail.buttons.is_empty());
    }
}
