use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::Value;

use super::{json_body, ok_json, str_field, ApiError, AppState, Message};
use crate::model::Folder;
use crate::service::FolderInput;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/locations/{id}/folders", post(create_folder))
        .route("/locations/{id}/folders/{kind}", get(list_folders))
        .route("/folders/{id}", delete(delete_folder))
}

async fn list_folders(
    State(svc): State<AppState>,
    Path((location_id, kind)): Path<(String, String)>,
) -> Result<Json<Vec<Folder>>, ApiError> {
    ok_json(svc.list_folders(&location_id, &kind))
}

async fn create_folder(
    State(svc): State<AppState>,
    Path(location_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Folder>), ApiError> {
    let body = json_body(body)?;
    let input = FolderInput {
        name: str_field(&body, "name"),
        kind: str_field(&body, "type"),
        order: body.get("order").and_then(Value::as_i64),
    };
    let folder = svc.create_folder(&location_id, input)?;
    Ok((StatusCode::CREATED, Json(folder)))
}

async fn delete_folder(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    svc.delete_folder(&id)?;
    Ok(Json(Message { message: "Dossier supprimé" }))
}
