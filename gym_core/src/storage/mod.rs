//! SQLite persistence for exercises, schedule entries and workout rows.
//!
//! All access goes through one [`Database`] owning one connection.
//! Multi-statement writes run inside a transaction so that a failure part
//! way through leaves nothing behind.

pub mod exercises;
pub mod schedule;
pub mod schema;
pub mod workouts;

pub use workouts::HistoryFilter;

use crate::Result;
use rusqlite::{Connection, Transaction};
use schema::{SCHEMA, TABLES};
use std::path::Path;

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path, creating tables as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        tracing::debug!("Opened database at {:?}", path);
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let db = Self { conn };
        db.create()?;
        Ok(db)
    }

    /// Create all tables if they do not exist.
    pub fn create(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Drop all tables.
    pub fn drop_tables(&self) -> Result<()> {
        for table in TABLES.iter().rev() {
            self.conn
                .execute_batch(&format!("DROP TABLE IF EXISTS {};", table))?;
        }
        tracing::info!("Dropped all tables");
        Ok(())
    }

    /// Drop and recreate all tables.
    pub fn reset(&self) -> Result<()> {
        self.drop_tables()?;
        self.create()
    }

    /// Delete every row, keeping the tables.
    pub fn clear(&mut self) -> Result<()> {
        let tx = self.transaction()?;
        for table in TABLES.iter().rev() {
            tx.execute_batch(&format!("DELETE FROM {};", table))?;
        }
        tx.commit()?;
        tracing::info!("Cleared all tables");
        Ok(())
    }

    /// Get a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction.
    pub(crate) fn transaction(&mut self) -> Result<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}

/// Extended SQLite code of a failed constraint, if `err` is one
pub(crate) fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(e.extended_code)
        }
        _ => None,
    }
}

/// True when `err` is a UNIQUE (or primary key) violation
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        constraint_code(err),
        Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
            | Some(rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}

/// True when `err` is a FOREIGN KEY violation
pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    constraint_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewExercise, RawWorkout};
    use chrono::NaiveDate;

    fn table_names(db: &Database) -> Vec<String> {
        db.connection()
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    #[test]
    fn test_tables_created() {
        let db = Database::open_in_memory().expect("Failed to create database");
        assert_eq!(table_names(&db), vec!["exercises", "schedule", "workouts"]);
    }

    #[test]
    fn test_create_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.create().unwrap();
        db.create().unwrap();
        assert_eq!(table_names(&db).len(), 3);
    }

    #[test]
    fn test_drop_and_reset() {
        let db = Database::open_in_memory().unwrap();
        db.add_exercise(&NewExercise::new("Squat")).unwrap();

        db.drop_tables().unwrap();
        assert!(table_names(&db).is_empty());

        db.reset().unwrap();
        assert_eq!(table_names(&db).len(), 3);
        assert!(db.exercises().unwrap().is_empty());
    }

    #[test]
    fn test_clear_keeps_tables() {
        let mut db = Database::open_in_memory().unwrap();
        db.add_exercise(&NewExercise::new("Squat")).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 27).unwrap();
        db.record_workout(date, "Squat", 1, RawWorkout::strength(3, 60.0, 5))
            .unwrap();

        db.clear().unwrap();
        assert_eq!(table_names(&db).len(), 3);
        assert!(db.exercises().unwrap().is_empty());
        assert!(db.dates().unwrap().is_empty());
    }

    #[test]
    fn test_open_file_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("gym.db");

        {
            let db = Database::open(&db_path).unwrap();
            db.add_exercise(&NewExercise::new("Squat")).unwrap();
        }

        assert!(db_path.exists());
        let reopened = Database::open(&db_path).unwrap();
        assert_eq!(reopened.exercises().unwrap().len(), 1);
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let db = Database::open_in_memory().unwrap();
        let enabled: bool = db
            .connection()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert!(enabled);
    }
}
