//! Axum handlers for the catalog module.
//!
//! One generic handler set serves every catalog resource; the resource
//! key in the path selects the view configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};

use tinta_core::{ServiceError, wants_fragment};
use tinta_view::FormResult;

use crate::service::CatalogService;

pub type AppState = Arc<CatalogService>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/{resource}", get(list).post(create))
        .route("/{resource}/{id}", get(detail).put(update).delete(delete))
        .with_state(state)
}

/// Saved → 200/201 with the record; rejected → 400 with errors + bound state.
pub(crate) fn form_response(result: FormResult, created: StatusCode) -> Response {
    match result {
        FormResult::Saved(doc) => (created, Json(doc)).into_response(),
        FormResult::Rejected(rejection) => {
            (StatusCode::BAD_REQUEST, Json(rejection)).into_response()
        }
    }
}

async fn list(
    State(svc): State<AppState>,
    Path(resource): Path<String>,
    headers: HeaderMap,
    Query(raw): Query<BTreeMap<String, String>>,
) -> Result<Response, ServiceError> {
    if wants_fragment(&headers) {
        Ok(Json(svc.list_fragment(&resource, &raw)?).into_response())
    } else {
        Ok(Json(svc.list(&resource, &raw)?).into_response())
    }
}

async fn create(
    State(svc): State<AppState>,
    Path(resource): Path<String>,
    Json(input): Json<tinta_view::FormInput>,
) -> Result<Response, ServiceError> {
    Ok(form_response(svc.create(&resource, input)?, StatusCode::CREATED))
}

async fn detail(
    State(svc): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<tinta_view::Detail>, ServiceError> {
    svc.detail(&resource, &id).map(Json)
}

async fn update(
    State(svc): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    Json(input): Json<tinta_view::FormInput>,
) -> Result<Response, ServiceError> {
    Ok(form_response(svc.update(&resource, &id, input)?, StatusCode::OK))
}

async fn delete(
    State(svc): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<StatusCode, ServiceError> {
    svc.delete(&resource, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
