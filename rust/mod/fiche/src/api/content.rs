use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use super::{ok_json, ApiError, AppState, Message};
use crate::model::{Content, Image};
use crate::service::{ContentInput, ImageUpload};

pub fn routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/locations/{id}/content/{kind}", get(list_contents))
        .route("/locations/{id}/content", post(create_content))
        .route(
            "/content/{id}",
            get(get_content).put(update_content).delete(delete_content),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
}

/// Fields of a content multipart request.
#[derive(Debug, Default)]
struct ContentForm {
    input: ContentInput,
    /// Raw `existingImages` JSON string, PUT only.
    existing_images: Option<String>,
    files: Vec<ImageUpload>,
}

impl ContentForm {
    /// Parse `existingImages`; absent means none are kept.
    fn existing(&self) -> Result<Vec<Image>, ApiError> {
        match self.existing_images.as_deref() {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| ApiError::bad_request(format!("existingImages: {}", e))),
        }
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status().as_u16(), err.body_text())
}

/// Read every part of the request. Unknown fields are skipped.
async fn read_form(multipart: Result<Multipart, MultipartRejection>) -> Result<ContentForm, ApiError> {
    let mut multipart = multipart
        .map_err(|rejection| ApiError::new(rejection.status().as_u16(), rejection.body_text()))?;
    let mut form = ContentForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty part for an untouched file input.
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                form.files.push(ImageUpload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            "title" | "type" | "description" | "folderId" | "existingImages" => {
                let text = field.text().await.map_err(multipart_error)?;
                match name.as_str() {
                    "title" => form.input.title = Some(text),
                    "type" => form.input.kind = Some(text),
                    "description" => form.input.description = Some(text),
                    "folderId" => form.input.folder_id = Some(text),
                    _ => form.existing_images = Some(text),
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn with_content_id(id: &str) -> impl FnOnce(radfiche_core::ServiceError) -> ApiError + '_ {
    move |err| {
        let not_found = err.status_code() == StatusCode::NOT_FOUND;
        let api = ApiError::from(err);
        if not_found {
            api.with_context("contentId", id)
        } else {
            api
        }
    }
}

async fn list_contents(
    State(svc): State<AppState>,
    Path((location_id, kind)): Path<(String, String)>,
) -> Result<Json<Vec<Content>>, ApiError> {
    ok_json(svc.list_contents(&location_id, &kind))
}

async fn get_content(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Content>, ApiError> {
    svc.get_content(&id).map(Json).map_err(with_content_id(&id))
}

async fn create_content(
    State(svc): State<AppState>,
    Path(location_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Content>), ApiError> {
    let form = read_form(multipart).await?;
    let content = svc
        .create_content(&location_id, form.input, form.files)
        .await?;
    Ok((StatusCode::CREATED, Json(content)))
}

async fn update_content(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Content>, ApiError> {
    let form = read_form(multipart).await?;
    let existing = form.existing()?;
    svc.update_content(&id, form.input, existing, form.files)
        .await
        .map(Json)
        .map_err(with_content_id(&id))
}

async fn delete_content(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    svc.delete_content(&id)?;
    Ok(Json(Message { message: "Fiche supprimée" }))
}
