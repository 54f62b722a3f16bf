use radfiche_core::{new_id, now_rfc3339, ServiceError};
use radfiche_sql::Value;
use serde_json::json;
use tracing::info;

use super::upload::{upload_images, ImageUpload};
use super::{from_doc, FicheService};
use crate::model::{Content, Image};
use crate::validate;

/// Text fields of a content form. `None` means the field was not sent.
#[derive(Debug, Default, Clone)]
pub struct ContentInput {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub folder_id: Option<String>,
}

impl ContentInput {
    /// Copy every sent field onto `doc`.
    fn apply(self, doc: &mut serde_json::Value) {
        if let Some(title) = self.title {
            doc["title"] = json!(title);
        }
        if let Some(kind) = self.kind {
            doc["type"] = json!(kind);
        }
        if let Some(description) = self.description {
            doc["description"] = json!(description);
        }
        if let Some(folder_id) = self.folder_id {
            // An empty folder selection detaches the content.
            doc["folderId"] = if folder_id.is_empty() { json!(null) } else { json!(folder_id) };
        }
    }
}

fn content_indexes(record: &Content) -> Vec<(&'static str, Value)> {
    vec![
        ("location_id", Value::Text(record.location_id.clone())),
        (
            "folder_id",
            record.folder_id.clone().map(Value::Text).unwrap_or(Value::Null),
        ),
        ("type", Value::Text(record.kind.as_str().to_string())),
    ]
}

fn content_not_found() -> ServiceError {
    ServiceError::NotFound("Contenu non trouvé".into())
}

impl FicheService {
    /// Content of one Location and type, in insertion order.
    pub fn list_contents(&self, location_id: &str, kind: &str) -> Result<Vec<Content>, ServiceError> {
        self.list_records(
            "contents",
            &[
                ("location_id", Value::Text(location_id.to_string())),
                ("type", Value::Text(kind.to_string())),
            ],
            "create_at, rowid",
        )
    }

    pub fn get_content(&self, id: &str) -> Result<Content, ServiceError> {
        self.find_record("contents", id)?.ok_or_else(content_not_found)
    }

    /// Create a Content under an existing Location, uploading its images first.
    ///
    /// The Location is looked up and the document validated before anything
    /// is uploaded.
    pub async fn create_content(
        &self,
        location_id: &str,
        input: ContentInput,
        files: Vec<ImageUpload>,
    ) -> Result<Content, ServiceError> {
        if self.get_location(location_id)?.is_none() {
            return Err(ServiceError::NotFound("Localisation non trouvée".into()));
        }

        let mut doc = json!({
            "id": new_id(),
            "title": null,
            "type": null,
            "images": [],
            "locationId": location_id,
            "createdAt": now_rfc3339(),
        });
        input.apply(&mut doc);
        validate::check(&validate::CONTENT, &doc)?;

        let images = upload_images(&self.blob, files).await?;
        doc["images"] = serde_json::to_value(&images)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let record: Content = from_doc(doc)?;

        let mut indexes = content_indexes(&record);
        indexes.push(("create_at", Value::Text(record.created_at.clone())));
        self.insert_record("contents", &record.id, &record, &indexes)?;

        info!(
            "created {} content {} in location {} with {} image(s)",
            record.kind,
            record.id,
            record.location_id,
            record.images.len()
        );
        Ok(record)
    }

    /// Patch a Content with the sent fields and replace its images with
    /// `existing` followed by the newly uploaded files.
    pub async fn update_content(
        &self,
        id: &str,
        input: ContentInput,
        existing: Vec<Image>,
        files: Vec<ImageUpload>,
    ) -> Result<Content, ServiceError> {
        let current = self.get_content(id)?;

        let mut doc =
            serde_json::to_value(&current).map_err(|e| ServiceError::Internal(e.to_string()))?;
        input.apply(&mut doc);
        validate::check(&validate::CONTENT, &doc)?;

        let uploaded = upload_images(&self.blob, files).await?;
        let mut images = existing;
        images.extend(uploaded);
        doc["images"] = serde_json::to_value(&images)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let record: Content = from_doc(doc)?;

        self.update_record("contents", id, &record, &content_indexes(&record))?;

        info!("updated content {} ({} image(s))", record.id, record.images.len());
        Ok(record)
    }

    pub fn delete_content(&self, id: &str) -> Result<bool, ServiceError> {
        let deleted = self.delete_record("contents", id)?;
        info!("deleted content {} (existed: {})", id, deleted);
        Ok(deleted)
    }
}
