use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde_json::Value;

use super::{json_body, ok_json, str_field, ApiError, AppState, Message};
use crate::model::Location;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/systems/{id}/locations", get(list_locations).post(create_location))
        .route("/locations/{id}", delete(delete_location))
}

async fn list_locations(
    State(svc): State<AppState>,
    Path(system_id): Path<String>,
) -> Result<Json<Vec<Location>>, ApiError> {
    ok_json(svc.list_locations(&system_id))
}

async fn create_location(
    State(svc): State<AppState>,
    Path(system_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Location>), ApiError> {
    let body = json_body(body)?;
    let name = str_field(&body, "name").unwrap_or_default();
    let location = svc.create_location(&system_id, &name)?;
    Ok((StatusCode::CREATED, Json(location)))
}

async fn delete_location(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    svc.delete_location(&id)?;
    Ok(Json(Message { message: "Localisation supprimée" }))
}
