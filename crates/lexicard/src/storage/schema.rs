//! `SQLite` schema definitions for lexicard.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the cards table.
///
/// `examples` holds a JSON array of `{id, text, translation}` objects.
/// Timestamps are RFC 3339 UTC strings with fixed precision so they sort
/// lexically in chronological order.
pub const CREATE_CARDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS cards (
    id TEXT PRIMARY KEY NOT NULL,
    owner_id TEXT NOT NULL,
    word TEXT NOT NULL,
    translation TEXT NOT NULL,
    examples TEXT NOT NULL DEFAULT '[]',
    is_known INTEGER NOT NULL DEFAULT 0,
    last_reviewed TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create an index for listing a deck newest-first.
pub const CREATE_OWNER_CREATED_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_cards_owner_created ON cards(owner_id, created_at DESC)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_CARDS_TABLE,
    CREATE_OWNER_CREATED_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_cards_table_contains_required_columns() {
        assert!(CREATE_CARDS_TABLE.contains("id TEXT PRIMARY KEY"));
        assert!(CREATE_CARDS_TABLE.contains("owner_id TEXT NOT NULL"));
        assert!(CREATE_CARDS_TABLE.contains("word TEXT NOT NULL"));
        assert!(CREATE_CARDS_TABLE.contains("translation TEXT NOT NULL"));
        assert!(CREATE_CARDS_TABLE.contains("is_known INTEGER NOT NULL"));
        assert!(CREATE_CARDS_TABLE.contains("last_reviewed TEXT"));
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
