pub mod content;
pub mod folder;
pub mod location;
pub mod system;

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

use radfiche_core::ServiceError;

use crate::service::FicheService;

/// Shared application state.
pub type AppState = Arc<FicheService>;

/// Build the fiche API router. Paths are relative to the mount point
/// (`/api` in the server).
pub fn router(state: AppState, upload_limit: usize) -> Router {
    Router::new()
        .merge(system::routes())
        .merge(location::routes())
        .merge(folder::routes())
        .merge(content::routes(upload_limit))
        .with_state(state)
}

/// API error response: `{"error": message}` plus optional context fields.
#[derive(Debug)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
    pub context: Map<String, Value>,
}

impl ApiError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Map::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    /// Attach an extra field to the JSON body.
    pub fn with_context(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut body = self.context;
        body.insert("error".to_string(), Value::String(self.message));
        (status, Json(Value::Object(body))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        if err.is_server_error() {
            error!("request failed: {}", err);
        }
        ApiError::new(err.status_code().as_u16(), err.to_string())
    }
}

/// Wrap a Result<T, ServiceError> into an API response.
pub(crate) fn ok_json<T: Serialize>(result: Result<T, ServiceError>) -> Result<Json<T>, ApiError> {
    result.map(Json).map_err(ApiError::from)
}

/// Body returned by DELETE endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct Message {
    pub message: &'static str,
}

/// Unwrap a JSON body, turning extractor rejections into `{error}` responses.
pub(crate) fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(v)| v)
        .map_err(|rejection| ApiError::new(rejection.status().as_u16(), rejection.body_text()))
}

/// A string field of a JSON body; anything else reads as absent.
pub(crate) fn str_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_keep_status_and_message() {
        let err = ApiError::from(ServiceError::NotFound("Contenu non trouvé".into()));
        assert_eq!(err.code, 404);
        assert_eq!(err.message, "Contenu non trouvé");

        let err = ApiError::from(ServiceError::Upload("bucket said no".into()));
        assert_eq!(err.code, 500);
    }

    #[test]
    fn context_is_merged_into_body() {
        let resp = ApiError::new(404, "Contenu non trouvé")
            .with_context("contentId", "abc")
            .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn str_field_ignores_non_strings() {
        let body = serde_json::json!({"name": "Thorax", "order": 3});
        assert_eq!(str_field(&body, "name").as_deref(), Some("Thorax"));
        assert_eq!(str_field(&body, "order"), None);
        assert_eq!(str_field(&body, "slug"), None);
    }
}
