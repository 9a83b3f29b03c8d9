//! Commit-time hooks for order records: copy the display label of each
//! referenced record onto the row, so listings and detail views render
//! without joins. Runs after validation, so every reference is known to
//! resolve.

use serde_json::{Value as Json, json};

use tinta_core::ServiceError;
use tinta_store::EntityStore;

pub fn order_pre_save(store: &EntityStore, doc: &mut Json) -> Result<(), ServiceError> {
    stamp_label(store, doc, "client_id", "clients", "client_name")?;
    stamp_label(store, doc, "status_id", "statuses", "status_name")
}

pub fn material_row_pre_save(store: &EntityStore, doc: &mut Json) -> Result<(), ServiceError> {
    stamp_label(store, doc, "material_id", "materials", "material_name")?;
    stamp_label(store, doc, "unit_measure_id", "unit_measures", "unit_label")
}

pub fn service_row_pre_save(store: &EntityStore, doc: &mut Json) -> Result<(), ServiceError> {
    stamp_label(store, doc, "service_id", "services", "service_name")?;
    stamp_label(store, doc, "room_id", "rooms", "room_name")?;
    stamp_label(store, doc, "room_part_id", "room_parts", "room_part_name")
}

fn stamp_label(
    store: &EntityStore,
    doc: &mut Json,
    id_field: &str,
    resource: &str,
    label_field: &str,
) -> Result<(), ServiceError> {
    let Some(id) = doc[id_field].as_str().map(str::to_string) else {
        return Ok(());
    };
    if let Some(target) = store.try_get(resource, &id)? {
        doc[label_field] = json!(store.registry().display(resource, &target));
    }
    Ok(())
}
