use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde_json::Value;

use super::{json_body, ok_json, str_field, ApiError, AppState, Message};
use crate::model::System;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/systems", get(list_systems).post(create_system))
        .route("/systems/{id}", delete(delete_system))
}

async fn list_systems(State(svc): State<AppState>) -> Result<Json<Vec<System>>, ApiError> {
    ok_json(svc.list_systems())
}

async fn create_system(
    State(svc): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<System>), ApiError> {
    let body = json_body(body)?;
    let name = str_field(&body, "name").unwrap_or_default();
    let system = svc.create_system(&name)?;
    Ok((StatusCode::CREATED, Json(system)))
}

async fn delete_system(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    svc.delete_system(&id)?;
    Ok(Json(Message { message: "Système supprimé" }))
}
