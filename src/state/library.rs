use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use super::store::KvBackend;
use crate::config::StudioConfig;
use crate::error::StoreError;

/// The Library manages the SQLite database behind the record store.
/// Each collection is one row of the `kv` table holding its JSON snapshot.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
    /// Largest payload accepted per key (None = unlimited)
    max_value_bytes: Option<usize>,
}

impl Library {
    /// Open (or create) the database described by `config`.
    ///
    /// The data directory is created if it does not exist yet.
    pub fn open(config: &StudioConfig) -> Result<Self, StoreError> {
        let db_path = config.database_path();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut library = Self::open_at(&db_path)?;
        library.max_value_bytes = config.max_value_bytes;
        Ok(library)
    }

    /// Open (or create) a database file at an explicit path
    pub fn open_at(db_path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;

        let library = Library {
            conn,
            db_path: db_path.to_path_buf(),
            max_value_bytes: None,
        };
        library.init_schema()?;

        tracing::info!(
            "📁 Database initialized at: {} ({} collections stored)",
            db_path.display(),
            library.key_count()?
        );

        Ok(library)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;

        tracing::debug!("✅ Database schema initialized");

        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Number of stored keys
    pub fn key_count(&self) -> Result<i64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl KvBackend for Library {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, payload: &str) -> Result<(), StoreError> {
        if let Some(limit) = self.max_value_bytes {
            if payload.len() > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed: payload.len(),
                    limit,
                });
            }
        }

        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, payload, chrono::Utc::now().timestamp()],
        )?;
        Ok(())
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}
