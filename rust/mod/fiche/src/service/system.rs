use radfiche_core::{new_id, now_rfc3339, slugify, ServiceError};
use radfiche_sql::Value;
use serde_json::json;
use tracing::info;

use super::{from_doc, CascadeOutcome, FicheService};
use crate::model::System;
use crate::validate;

impl FicheService {
    pub fn list_systems(&self) -> Result<Vec<System>, ServiceError> {
        self.list_records("systems", &[], "create_at, rowid")
    }

    /// Create a System. The slug is derived from `name`.
    pub fn create_system(&self, name: &str) -> Result<System, ServiceError> {
        let doc = json!({
            "id": new_id(),
            "name": name,
            "slug": slugify(name),
            "createdAt": now_rfc3339(),
        });
        validate::check(&validate::SYSTEM, &doc)?;
        let record: System = from_doc(doc)?;

        self.insert_record(
            "systems",
            &record.id,
            &record,
            &[("create_at", Value::Text(record.created_at.clone()))],
        )?;

        info!("created system {} ({})", record.id, record.slug);
        Ok(record)
    }

    /// Delete a System and its Locations in one transaction.
    ///
    /// Content under those Locations is left in place.
    pub fn delete_system(&self, id: &str) -> Result<CascadeOutcome, ServiceError> {
        let outcome = self.delete_cascade("systems", id, "locations", "system_id")?;
        info!(
            "deleted system {} (existed: {}, locations removed: {})",
            id, outcome.deleted, outcome.children
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use crate::service::testing::service;
    use radfiche_core::ServiceError;

    #[test]
    fn slug_is_derived_from_name() {
        let (svc, _dir) = service();
        assert_eq!(svc.create_system("Thorax").unwrap().slug, "thorax");
        assert_eq!(
            svc.create_system("Membre Supérieur").unwrap().slug,
            "membre-supérieur"
        );
        assert_eq!(svc.create_system("Tête  et\tCou").unwrap().slug, "tête-et-cou");
    }

    #[test]
    fn empty_name_is_rejected() {
        let (svc, _dir) = service();
        let err = svc.create_system("").unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(svc.list_systems().unwrap().is_empty());
    }

    #[test]
    fn list_keeps_insertion_order() {
        let (svc, _dir) = service();
        for name in ["Thorax", "Abdomen", "Rachis"] {
            svc.create_system(name).unwrap();
        }
        let names: Vec<String> = svc.list_systems().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Thorax", "Abdomen", "Rachis"]);
    }

    #[test]
    fn delete_removes_locations_of_that_system_only() {
        let (svc, _dir) = service();
        let thorax = svc.create_system("Thorax").unwrap();
        let abdomen = svc.create_system("Abdomen").unwrap();
        svc.create_location(&thorax.id, "Poumon").unwrap();
        svc.create_location(&thorax.id, "Médiastin").unwrap();
        svc.create_location(&abdomen.id, "Foie").unwrap();

        let outcome = svc.delete_system(&thorax.id).unwrap();
        assert!(outcome.deleted);
        assert_eq!(outcome.children, 2);
        assert!(svc.list_locations(&thorax.id).unwrap().is_empty());
        assert_eq!(svc.list_locations(&abdomen.id).unwrap().len(), 1);
        assert_eq!(svc.list_systems().unwrap().len(), 1);
    }

    #[test]
    fn delete_missing_system_is_not_an_error() {
        let (svc, _dir) = service();
        let outcome = svc.delete_system("nope").unwrap();
        assert!(!outcome.deleted);
        assert_eq!(outcome.children, 0);
    }
}
