//! SQL DDL for initializing the database schema.

/// SQLite schema includes:
/// - `castor_settings` table (one serialized settings snapshot per tenant marker)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Settings snapshots (one row per tenant marker)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS castor_settings (
    name TEXT PRIMARY KEY NOT NULL,
    settings TEXT NOT NULL, -- JSON document
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);
"#;
