//! Axum handlers for the clients module.

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
use tinta_view::{Detail, FormInput, FormResult};

use crate::service::ClientService;

pub type AppState = Arc<ClientService>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/clients", get(list).post(create))
        .route("/clients/{id}", get(detail).put(update).delete(delete))
        .with_state(state)
}

fn form_response(result: FormResult, created: StatusCode) -> Response {
    match result {
        FormResult::Saved(doc) => (created, Json(doc)).into_response(),
        FormResult::Rejected(rejection) => {
            (StatusCode::BAD_REQUEST, Json(rejection)).into_response()
        }
    }
}

async fn list(
    State(svc): State<AppState>,
    headers: HeaderMap,
    Query(raw): Query<BTreeMap<String, String>>,
) -> Result<Response, ServiceError> {
    if wants_fragment(&headers) {
        Ok(Json(svc.list_fragment(&raw)?).into_response())
    } else {
        Ok(Json(svc.list(&raw)?).into_response())
    }
}

async fn create(
    State(svc): State<AppState>,
    Json(input): Json<FormInput>,
) -> Result<Response, ServiceError> {
    Ok(form_response(svc.create(input)?, StatusCode::CREATED))
}

async fn detail(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Detail>, ServiceError> {
    svc.detail(&id).map(Json)
}

async fn update(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<FormInput>,
) -> Result<Response, ServiceError> {
    Ok(form_response(svc.update(&id, input)?, StatusCode::OK))
}

async fn delete(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    svc.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
