use radfiche_core::{new_id, now_rfc3339, slugify, ServiceError};
use radfiche_sql::Value;
use serde_json::json;
use tracing::{info, warn};

use super::{from_doc, CascadeOutcome, FicheService};
use crate::model::Location;
use crate::validate;

impl FicheService {
    pub fn list_locations(&self, system_id: &str) -> Result<Vec<Location>, ServiceError> {
        self.list_records(
            "locations",
            &[("system_id", Value::Text(system_id.to_string()))],
            "create_at, rowid",
        )
    }

    pub fn get_location(&self, id: &str) -> Result<Option<Location>, ServiceError> {
        self.find_record("locations", id)
    }

    /// Create a Location under `system_id`. The System is not looked up.
    pub fn create_location(&self, system_id: &str, name: &str) -> Result<Location, ServiceError> {
        let now = now_rfc3339();
        let doc = json!({
            "id": new_id(),
            "name": name,
            "slug": slugify(name),
            "systemId": system_id,
            "createdAt": now,
            "updatedAt": now,
        });
        validate::check(&validate::LOCATION, &doc)?;
        let record: Location = from_doc(doc)?;

        self.insert_record(
            "locations",
            &record.id,
            &record,
            &[
                ("system_id", Value::Text(record.system_id.clone())),
                ("create_at", Value::Text(record.created_at.clone())),
                ("update_at", Value::Text(record.updated_at.clone())),
            ],
        )?;

        info!("created location {} in system {}", record.id, record.system_id);
        Ok(record)
    }

    /// Delete a Location and its Content in one transaction.
    ///
    /// Folders of the Location are not removed; their count is logged.
    pub fn delete_location(&self, id: &str) -> Result<CascadeOutcome, ServiceError> {
        let outcome = self.delete_cascade("locations", id, "contents", "location_id")?;
        info!(
            "deleted location {} (existed: {}, content removed: {})",
            id, outcome.deleted, outcome.children
        );

        let orphaned = self.count_records("folders", &[("location_id", Value::Text(id.to_string()))])?;
        if orphaned > 0 {
            warn!("location {} deleted, {} folder(s) still reference it", id, orphaned);
        }
        Ok(outcome)
    }
}
