//! Nested-collection form orchestration.
//!
//! A form binds raw string input to a parent record plus zero or more
//! child collections, validates everything (foreign keys through the
//! dynamic choice resolver, keyed per row), and either commits the whole
//! tree in one store transaction or rejects the submission with
//! positionally-attached errors and no writes at all.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json, json};

use tinta_core::ServiceError;
use tinta_store::{ChildWrite, CollectionWrite, EntityStore};

use crate::choice::resolve_candidates;

// ── Field specs ─────────────────────────────────────────────────────

/// Value type of a form field, driving binding and validation.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text,
    Boolean,
    Integer,
    Decimal,
    /// ISO date, `YYYY-MM-DD`.
    Date,
    /// Fixed `(value, label)` choices.
    Select(&'static [(&'static str, &'static str)]),
    /// Foreign key to the named resource, resolved narrowly per request.
    ForeignKey(&'static str),
}

/// One declared form field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, required: true, kind }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, required: false, kind }
    }
}

/// Hook run on each bound document just before commit.
pub type PreSaveHook = fn(&EntityStore, &mut Json) -> Result<(), ServiceError>;

/// One child collection attached to a parent form.
pub struct CollectionSpec {
    /// Payload key, e.g. `"addresses"`.
    pub name: &'static str,
    pub resource: &'static str,
    /// FK column on the child pointing back at the parent.
    pub parent_column: &'static str,
    pub fields: Vec<FieldSpec>,
    pub pre_save: Option<PreSaveHook>,
}

/// Declarative configuration of a parent + collections form.
pub struct FormSpec {
    pub resource: &'static str,
    pub fields: Vec<FieldSpec>,
    pub collections: Vec<CollectionSpec>,
    pub pre_save: Option<PreSaveHook>,
}

// ── Input ───────────────────────────────────────────────────────────

/// One submitted child row. Rows arrive as an explicit indexed list, so a
/// row's position — not a string prefix — identifies it in error output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowInput {
    /// Persisted row id when editing; absent for a newly added row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Marked for deletion.
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl RowInput {
    fn is_blank(&self) -> bool {
        self.id.is_none() && !self.delete && self.fields.values().all(|v| v.trim().is_empty())
    }
}

/// The full bound submission: parent field values plus child rows per
/// collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub collections: BTreeMap<String, Vec<RowInput>>,
}

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowErrors {
    /// Position in the submitted row list, counting unsaved new rows.
    pub index: usize,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    pub parent: Vec<FieldError>,
    pub collections: BTreeMap<String, Vec<RowErrors>>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty() && self.collections.values().all(Vec::is_empty)
    }
}

/// A rejected submission: field errors plus the original bound state, so
/// the form re-renders exactly as the user left it.
#[derive(Debug, Serialize)]
pub struct FormRejection {
    pub errors: ValidationErrors,
    pub input: FormInput,
}

/// Outcome of a submission that reached the store layer without a fatal
/// error: either the saved parent record or a rejection.
#[derive(Debug)]
pub enum FormResult {
    Saved(Json),
    Rejected(FormRejection),
}

// ── Orchestration ───────────────────────────────────────────────────

/// Bind, validate, and atomically persist one submission.
///
/// `parent_id` is set when editing an existing record. Nothing is written
/// unless the parent form and every collection row validate; the commit
/// itself is a single store transaction.
pub fn validate_and_save(
    store: &EntityStore,
    spec: &FormSpec,
    parent_id: Option<&str>,
    input: FormInput,
) -> Result<FormResult, ServiceError> {
    let existing = match parent_id {
        Some(id) => Some(store.get(spec.resource, id)?),
        None => None,
    };

    let mut errors = ValidationErrors::default();

    let parent_patch = bind_fields(
        store,
        &spec.fields,
        &input.fields,
        existing.as_ref(),
        &mut errors.parent,
    )?;

    let mut collections: Vec<CollectionWrite> = Vec::new();
    for coll in &spec.collections {
        let rows = input.collections.get(coll.name).cloned().unwrap_or_default();
        let mut row_errors: Vec<RowErrors> = Vec::new();
        let mut writes: Vec<ChildWrite> = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            if row.is_blank() {
                continue;
            }
            let mut errs: Vec<FieldError> = Vec::new();
            bind_row(store, coll, existing.as_ref(), row, &mut errs, &mut writes)?;
            if !errs.is_empty() {
                row_errors.push(RowErrors { index, errors: errs });
            }
        }

        errors.collections.insert(coll.name.to_string(), row_errors);
        collections.push(CollectionWrite {
            resource: coll.resource.to_string(),
            parent_column: coll.parent_column.to_string(),
            writes,
        });
    }

    if !errors.is_empty() {
        return Ok(FormResult::Rejected(FormRejection { errors, input }));
    }

    // Committed state: parent first, then children, one transaction.
    let mut parent_doc = match existing {
        Some(prev) => merged(prev, parent_patch),
        None => Json::Object(parent_patch),
    };
    if let Some(hook) = spec.pre_save {
        hook(store, &mut parent_doc)?;
    }

    let mut tree = Vec::new();
    for (coll, mut write) in spec.collections.iter().zip(collections) {
        if let Some(hook) = coll.pre_save {
            for w in &mut write.writes {
                match w {
                    ChildWrite::Insert(doc) | ChildWrite::Update(_, doc) => hook(store, doc)?,
                    ChildWrite::Delete(_) => {}
                }
            }
        }
        tree.push(write);
    }

    let saved = store.save_tree(spec.resource, parent_doc, tree)?;
    Ok(FormResult::Saved(saved))
}

/// Bind and validate one child row, appending its pending write.
fn bind_row(
    store: &EntityStore,
    coll: &CollectionSpec,
    parent: Option<&Json>,
    row: &RowInput,
    errs: &mut Vec<FieldError>,
    writes: &mut Vec<ChildWrite>,
) -> Result<(), ServiceError> {
    // An id must exist and belong to the parent being edited — for
    // deletions as much as for updates.
    let stored = match &row.id {
        Some(rid) => match store.try_get(coll.resource, rid)? {
            None => {
                errs.push(FieldError { field: "id".into(), message: "row not found".into() });
                return Ok(());
            }
            Some(doc) => {
                let owner = doc[coll.parent_column].as_str().unwrap_or_default();
                let parent_id = parent.and_then(|p| p["id"].as_str()).unwrap_or_default();
                if parent_id.is_empty() || owner != parent_id {
                    errs.push(FieldError {
                        field: "id".into(),
                        message: "row does not belong to this record".into(),
                    });
                    return Ok(());
                }
                Some(doc)
            }
        },
        None => None,
    };

    if row.delete {
        // Deletion skips field validation entirely; a delete-marked row
        // that was never persisted is simply dropped.
        if let Some(rid) = &row.id {
            writes.push(ChildWrite::Delete(rid.clone()));
        }
        return Ok(());
    }

    let patch = bind_fields(store, &coll.fields, &row.fields, stored.as_ref(), errs)?;
    if !errs.is_empty() {
        return Ok(());
    }

    match (&row.id, stored) {
        (Some(rid), Some(prev)) => writes.push(ChildWrite::Update(rid.clone(), merged(prev, patch))),
        _ => writes.push(ChildWrite::Insert(Json::Object(patch))),
    }
    Ok(())
}

/// Bind raw string values to typed JSON per the field specs, collecting
/// field-level errors. Foreign keys resolve through the choice resolver,
/// using this binding's own submitted value and stored instance value.
fn bind_fields(
    store: &EntityStore,
    fields: &[FieldSpec],
    raw: &BTreeMap<String, String>,
    instance: Option<&Json>,
    errs: &mut Vec<FieldError>,
) -> Result<Map<String, Json>, ServiceError> {
    let mut out = Map::new();

    for field in fields {
        let value = raw.get(field.name).map(|v| v.trim()).filter(|v| !v.is_empty());
        let mut fail = |message: &str| {
            errs.push(FieldError { field: field.name.to_string(), message: message.into() });
        };

        match field.kind {
            FieldKind::Text => match value {
                Some(v) => {
                    out.insert(field.name.into(), json!(v));
                }
                None if field.required => fail("this field is required"),
                None => {
                    out.insert(field.name.into(), Json::Null);
                }
            },
            FieldKind::Boolean => match value {
                Some("True") => {
                    out.insert(field.name.into(), json!(true));
                }
                Some("False") => {
                    out.insert(field.name.into(), json!(false));
                }
                Some(_) => fail("select Sim or Não"),
                None if field.required => fail("this field is required"),
                None => {
                    out.insert(field.name.into(), json!(false));
                }
            },
            FieldKind::Integer => match value {
                Some(v) => match v.parse::<i64>() {
                    Ok(n) => {
                        out.insert(field.name.into(), json!(n));
                    }
                    Err(_) => fail("enter a whole number"),
                },
                None if field.required => fail("this field is required"),
                None => {
                    out.insert(field.name.into(), Json::Null);
                }
            },
            FieldKind::Decimal => match value {
                Some(v) => match v.parse::<f64>() {
                    Ok(n) if n.is_finite() => {
                        out.insert(field.name.into(), json!(n));
                    }
                    _ => fail("enter a number"),
                },
                None if field.required => fail("this field is required"),
                None => {
                    out.insert(field.name.into(), Json::Null);
                }
            },
            FieldKind::Date => match value {
                Some(v) => match chrono::NaiveDate::parse_from_str(v, "%Y-%m-%d") {
                    Ok(_) => {
                        out.insert(field.name.into(), json!(v));
                    }
                    Err(_) => fail("enter a valid date (YYYY-MM-DD)"),
                },
                None if field.required => fail("this field is required"),
                None => {
                    out.insert(field.name.into(), Json::Null);
                }
            },
            FieldKind::Select(options) => match value {
                Some(v) if options.iter().any(|(val, _)| *val == v) => {
                    out.insert(field.name.into(), json!(v));
                }
                Some(_) => fail("select a valid choice"),
                None if field.required => fail("this field is required"),
                None => {
                    out.insert(field.name.into(), Json::Null);
                }
            },
            FieldKind::ForeignKey(resource) => {
                let stored_value = instance.and_then(|doc| doc[field.name].as_str());
                let candidates = resolve_candidates(store, resource, value, stored_value)?;
                match (candidates.first(), value) {
                    (Some(choice), _) => {
                        out.insert(field.name.into(), json!(choice.id));
                    }
                    (None, Some(_)) => fail("select a valid choice"),
                    (None, None) if field.required => fail("this field is required"),
                    (None, None) => {
                        out.insert(field.name.into(), Json::Null);
                    }
                }
            }
        }
    }

    Ok(out)
}

/// Shallow-merge bound fields over a stored document, preserving
/// everything the form does not manage (id, timestamps, FK to parent).
fn merged(prev: Json, patch: Map<String, Json>) -> Json {
    let mut doc = prev;
    if let Some(obj) = doc.as_object_mut() {
        for (k, v) in patch {
            obj.insert(k, v);
        }
    }
    doc
}
