use radfiche_core::ServiceError;
use radfiche_sql::SQLStore;

/// SQL DDL statements to initialize the fiche database schema.
///
/// Each table stores the full JSON document in a `data` TEXT column,
/// with indexed columns extracted for owner-reference and type filters.
/// No foreign keys: owner references are plain text.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS systems (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        create_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS locations (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        system_id TEXT,
        create_at TEXT,
        update_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS folders (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        location_id TEXT,
        type TEXT,
        sort_order INTEGER,
        create_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS contents (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        location_id TEXT,
        folder_id TEXT,
        type TEXT,
        create_at TEXT
    )",
    // Indexes
    "CREATE INDEX IF NOT EXISTS idx_loc_system ON locations(system_id)",
    "CREATE INDEX IF NOT EXISTS idx_folder_loc_type ON folders(location_id, type)",
    "CREATE INDEX IF NOT EXISTS idx_content_loc_type ON contents(location_id, type)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| ServiceError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}
