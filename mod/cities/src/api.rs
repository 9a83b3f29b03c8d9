//! Axum handlers for the cities module.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;

use tinta_core::ServiceError;

use crate::model::City;
use crate::service::CityService;

pub type AppState = Arc<CityService>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/cities/autocomplete", get(autocomplete))
        .route("/cities/{id}", get(get_city))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct AutocompleteQuery {
    #[serde(default)]
    term: String,
}

async fn autocomplete(
    State(svc): State<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let results = svc.autocomplete(&query.term)?;
    Ok(Json(serde_json::json!({ "results": results })))
}

async fn get_city(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<City>, ServiceError> {
    svc.get_city(&id).map(Json)
}
