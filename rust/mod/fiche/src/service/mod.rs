pub mod content;
pub mod folder;
pub mod location;
pub mod schema;
pub mod system;
pub mod upload;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use radfiche_blob::BlobStore;
use radfiche_core::ServiceError;
use radfiche_sql::{SQLStore, Statement, Value};

pub use content::ContentInput;
pub use folder::FolderInput;
pub use upload::ImageUpload;

/// Result of deleting a parent row together with its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// Whether the parent row existed.
    pub deleted: bool,
    /// Number of child rows removed in the same transaction.
    pub children: u64,
}

/// Fiche service. Holds the document store and the object storage and
/// provides the System → Location → Content operations.
pub struct FicheService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) blob: Arc<dyn BlobStore>,
}

impl FicheService {
    pub fn new(sql: Arc<dyn SQLStore>, blob: Arc<dyn BlobStore>) -> Result<Self, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Self { sql, blob })
    }

    // ── Generic CRUD helpers ──

    /// Insert a record as JSON into a table with indexed columns.
    pub(crate) fn insert_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), ServiceError> {
        let json = serde_json::to_string(record)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let mut cols = vec!["id", "data"];
        let mut placeholders = vec!["?1".to_string(), "?2".to_string()];
        let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            let idx = i + 3;
            cols.push(col);
            placeholders.push(format!("?{}", idx));
            params.push(val.clone());
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            cols.join(", "),
            placeholders.join(", "),
        );

        self.sql
            .exec(&sql, &params)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Find a record by id, deserializing the JSON `data` column.
    pub(crate) fn find_record<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<Option<T>, ServiceError> {
        let sql = format!("SELECT data FROM {} WHERE id = ?1", table);
        let rows = self
            .sql
            .query(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let row = match rows.first() {
            Some(row) => row,
            None => return Ok(None),
        };
        let data = row
            .get_str("data")
            .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
        serde_json::from_str(data)
            .map(Some)
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// Update a record's JSON data and indexed columns.
    pub(crate) fn update_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), ServiceError> {
        let json = serde_json::to_string(record)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let mut sets = vec!["data = ?1".to_string()];
        let mut params: Vec<Value> = vec![Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            let idx = i + 2;
            sets.push(format!("{} = ?{}", col, idx));
            params.push(val.clone());
        }

        let id_idx = params.len() + 1;
        params.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            table,
            sets.join(", "),
            id_idx,
        );

        let affected = self
            .sql
            .exec(&sql, &params)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(ServiceError::NotFound(format!("{}/{}", table, id)));
        }

        Ok(())
    }

    /// Delete a record by id. Deleting a missing id is not an error.
    pub(crate) fn delete_record(&self, table: &str, id: &str) -> Result<bool, ServiceError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", table);
        let affected = self
            .sql
            .exec(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(affected > 0)
    }

    /// Delete a record and every child row whose `fk_column` equals its id,
    /// in one transaction.
    pub(crate) fn delete_cascade(
        &self,
        table: &str,
        id: &str,
        child_table: &str,
        fk_column: &str,
    ) -> Result<CascadeOutcome, ServiceError> {
        let key = Value::Text(id.to_string());
        let affected = self
            .sql
            .exec_batch(&[
                Statement::new(format!("DELETE FROM {} WHERE id = ?1", table), vec![key.clone()]),
                Statement::new(
                    format!("DELETE FROM {} WHERE {} = ?1", child_table, fk_column),
                    vec![key],
                ),
            ])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        Ok(CascadeOutcome {
            deleted: affected.first().copied().unwrap_or(0) > 0,
            children: affected.get(1).copied().unwrap_or(0),
        })
    }

    /// List records matching equality filters, in the given order.
    pub(crate) fn list_records<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, Value)],
        order_by: &str,
    ) -> Result<Vec<T>, ServiceError> {
        let (where_sql, params) = where_clause(filters);
        let sql = format!("SELECT data FROM {}{} ORDER BY {}", table, where_sql, order_by);

        let rows = self
            .sql
            .query(&sql, &params)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let data = row
                .get_str("data")
                .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
            let item: T = serde_json::from_str(data)
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            items.push(item);
        }

        Ok(items)
    }

    /// Count records with optional filters.
    pub(crate) fn count_records(
        &self,
        table: &str,
        filters: &[(&str, Value)],
    ) -> Result<i64, ServiceError> {
        let (where_sql, params) = where_clause(filters);
        let sql = format!("SELECT COUNT(*) as cnt FROM {}{}", table, where_sql);
        let rows = self
            .sql
            .query(&sql, &params)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0))
    }
}

/// Turn a validated candidate document into its typed record.
pub(crate) fn from_doc<T: DeserializeOwned>(doc: serde_json::Value) -> Result<T, ServiceError> {
    serde_json::from_value(doc).map_err(|e| ServiceError::Internal(e.to_string()))
}

fn where_clause(filters: &[(&str, Value)]) -> (String, Vec<Value>) {
    let mut where_clauses = Vec::new();
    let mut params = Vec::new();

    for (i, (col, val)) in filters.iter().enumerate() {
        where_clauses.push(format!("{} = ?{}", col, i + 1));
        params.push(val.clone());
    }

    let where_sql = if where_clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_clauses.join(" AND "))
    };
    (where_sql, params)
}
