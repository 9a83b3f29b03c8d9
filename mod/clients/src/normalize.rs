//! Commit-time normalization of client records.
//!
//! These hooks run only once a submission has fully validated, right
//! before the transactional save.

use serde_json::{Value as Json, json};

use tinta_core::ServiceError;
use tinta_core::text::{digits_only, fold_upper, normalize_email, normalize_phone};
use tinta_store::EntityStore;

/// Names and documents of the client itself.
pub fn client_pre_save(_store: &EntityStore, doc: &mut Json) -> Result<(), ServiceError> {
    fold_field(doc, "name");
    fold_field(doc, "fantasy_name");
    digits_field(doc, "cpf_cnpj");
    Ok(())
}

/// Address rows: zip codes are stored as bare digits.
pub fn address_pre_save(_store: &EntityStore, doc: &mut Json) -> Result<(), ServiceError> {
    digits_field(doc, "zip_code");
    Ok(())
}

/// Contact rows: the contact type's name decides how the value is
/// normalized — email-like types are lowercased, phone-like types go
/// through digit stripping and country-code prefixing.
pub fn contact_pre_save(store: &EntityStore, doc: &mut Json) -> Result<(), ServiceError> {
    let Some(type_id) = doc["contact_type_id"].as_str().map(str::to_string) else {
        return Ok(());
    };
    let Some(type_doc) = store.try_get("contact_types", &type_id)? else {
        return Ok(());
    };
    let type_name = type_doc["name"].as_str().unwrap_or_default().to_lowercase();
    let value = doc["value"].as_str().unwrap_or_default();

    if is_email_type(&type_name) {
        doc["value"] = json!(normalize_email(value));
    } else if is_phone_type(&type_name) {
        doc["value"] = json!(normalize_phone(value));
    }
    Ok(())
}

fn is_email_type(type_name: &str) -> bool {
    type_name.contains("mail")
}

fn is_phone_type(type_name: &str) -> bool {
    ["telefone", "fone", "celular", "whatsapp", "phone"]
        .iter()
        .any(|k| type_name.contains(k))
}

fn fold_field(doc: &mut Json, field: &str) {
    if let Some(v) = doc[field].as_str() {
        let folded = fold_upper(v);
        doc[field] = if folded.is_empty() { Json::Null } else { json!(folded) };
    }
}

/// Strip a document-number field down to digits; an all-punctuation value
/// becomes null rather than an empty string (which would collide on the
/// unique index).
fn digits_field(doc: &mut Json, field: &str) {
    if let Some(v) = doc[field].as_str() {
        let digits = digits_only(v);
        doc[field] = if digits.is_empty() { Json::Null } else { json!(digits) };
    }
}
