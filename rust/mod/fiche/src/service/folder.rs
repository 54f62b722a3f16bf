use radfiche_core::{new_id, now_rfc3339, ServiceError};
use radfiche_sql::Value;
use serde_json::json;
use tracing::info;

use super::{from_doc, FicheService};
use crate::model::Folder;
use crate::validate;

/// Fields accepted when creating a Folder.
#[derive(Debug, Default, Clone)]
pub struct FolderInput {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub order: Option<i64>,
}

impl FicheService {
    /// Folders of one Location and type, by ascending `order`.
    pub fn list_folders(&self, location_id: &str, kind: &str) -> Result<Vec<Folder>, ServiceError> {
        self.list_records(
            "folders",
            &[
                ("location_id", Value::Text(location_id.to_string())),
                ("type", Value::Text(kind.to_string())),
            ],
            "sort_order, create_at, rowid",
        )
    }

    pub fn create_folder(&self, location_id: &str, input: FolderInput) -> Result<Folder, ServiceError> {
        let doc = json!({
            "id": new_id(),
            "name": input.name,
            "locationId": location_id,
            "type": input.kind,
            "order": input.order.unwrap_or(0),
            "createdAt": now_rfc3339(),
        });
        validate::check(&validate::FOLDER, &doc)?;
        let record: Folder = from_doc(doc)?;

        self.insert_record(
            "folders",
            &record.id,
            &record,
            &[
                ("location_id", Value::Text(record.location_id.clone())),
                ("type", Value::Text(record.kind.as_str().to_string())),
                ("sort_order", Value::Integer(record.order)),
                ("create_at", Value::Text(record.created_at.clone())),
            ],
        )?;

        info!("created {} folder {} in location {}", record.kind, record.id, record.location_id);
        Ok(record)
    }

    pub fn delete_folder(&self, id: &str) -> Result<bool, ServiceError> {
        let deleted = self.delete_record("folders", id)?;
        info!("deleted folder {} (existed: {})", id, deleted);
        Ok(deleted)
    }
}
