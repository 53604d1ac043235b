//! Tests for the SQLite preference backend
//!
//! These tests verify that:
//! - The schema is created and its version recorded
//! - Migrating an up-to-date file changes nothing
//! - Values survive closing and reopening the file

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::storage::backend::PreferenceBackend;
    use crate::storage::database::Database;

    /// Helper to create a temporary database for testing
    fn create_test_db() -> (Database, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db = Database::new(&db_path).expect("Failed to create database");
        (db, temp_dir)
    }

    #[test]
    fn test_database_creation() {
        let (db, _temp) = create_test_db();
        assert_eq!(db.schema_version().unwrap(), 1, "Expected schema version 1");
    }

    #[test]
    fn test_preferences_table_exists() {
        let (db, _temp) = create_test_db();

        let mut stmt = db
            .conn()
            .prepare("PRAGMA table_info(preferences)")
            .expect("Failed to prepare PRAGMA");

        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("Failed to get columns")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(columns, vec!["key", "value", "updated_at"]);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let (mut db, _temp) = create_test_db();
        db.write("midnight_theme", "slate").unwrap();

        db.migrate().expect("Second migration run failed");
        assert_eq!(db.schema_version().unwrap(), 1);
        assert_eq!(db.read("midnight_theme").unwrap().as_deref(), Some("slate"));
    }

    #[test]
    fn test_read_write_remove() {
        let (mut db, _temp) = create_test_db();

        assert_eq!(db.read("midnight_theme").unwrap(), None);

        db.write("midnight_theme", "slate").unwrap();
        assert_eq!(db.read("midnight_theme").unwrap().as_deref(), Some("slate"));

        db.write("midnight_theme", "aqua-haze").unwrap();
        assert_eq!(
            db.read("midnight_theme").unwrap().as_deref(),
            Some("aqua-haze")
        );

        db.remove("midnight_theme").unwrap();
        assert_eq!(db.read("midnight_theme").unwrap(), None);

        // Removing an absent key is fine
        db.remove("midnight_theme").unwrap();
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("portal.db");

        {
            let mut db = Database::new(&db_path).unwrap();
            db.write("midnight_page_themes", r#"{"g":"slate"}"#).unwrap();
        }

        let db = Database::new(&db_path).unwrap();
        assert_eq!(
            db.read("midnight_page_themes").unwrap().as_deref(),
            Some(r#"{"g":"slate"}"#)
        );
        assert_eq!(db.schema_version().unwrap(), 1);
    }

    #[test]
    fn test_in_memory_database() {
        let mut db = Database::open_in_memory().unwrap();
        db.write("k", "v").unwrap();
        assert_eq!(db.read("k").unwrap().as_deref(), Some("v"));
        assert_eq!(db.name(), "sqlite");
    }
}
