use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── ServiceError ────────────────────────────────────────────────────

/// Unified service error type used across all modules.
///
/// Each variant maps to an HTTP status code. The JSON response carries the
/// human-readable message only:
///
/// ```json
/// {"error": "Localisation non trouvée"}
/// ```
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Parent or record does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Missing required field or value outside its enumeration. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Database failure. HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// Object storage rejected or failed an upload. HTTP 500.
    #[error("{0}")]
    Upload(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error is the server's fault (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(ServiceError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ServiceError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::Storage("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ServiceError::Upload("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ServiceError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn server_error_classification() {
        assert!(!ServiceError::NotFound("x".into()).is_server_error());
        assert!(!ServiceError::Validation("x".into()).is_server_error());
        assert!(ServiceError::Upload("x".into()).is_server_error());
    }

    #[tokio::test]
    async fn json_response_format() {
        let err = ServiceError::NotFound("Localisation non trouvée".into());
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Localisation non trouvée"}));
    }

    #[test]
    fn error_display_is_just_message() {
        assert_eq!(ServiceError::NotFound("content 123".into()).to_string(), "content 123");
        assert_eq!(ServiceError::Validation("title is required".into()).to_string(), "title is required");
    }
}
