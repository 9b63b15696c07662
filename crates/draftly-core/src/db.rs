use crate::store::{DocumentStore, StoreError, StoredDocument};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub up: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "init",
    up: "CREATE TABLE IF NOT EXISTS documents (
            store TEXT NOT NULL,
            id TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (store, id)
        );",
}];

const PRAGMAS: &str = "PRAGMA journal_mode = WAL;
     PRAGMA synchronous = NORMAL;
     PRAGMA temp_store = MEMORY;
     PRAGMA busy_timeout = 5000;";

/// SQLite-backed document store. One row per `(store, id)` key holding the
/// JSON-serialized value.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(PRAGMAS)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn new_in_memory() -> rusqlite::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(PRAGMAS)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub fn latest_migration_version() -> i64 {
        MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn current_schema_version(&self) -> rusqlite::Result<i64> {
        let conn = self.conn();
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations')",
            [],
            |row| row.get(0),
        )?;
        if !exists {
            return Ok(0);
        }
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
    }

    pub fn run_migrations(&self) -> rusqlite::Result<()> {
        let current_version = self.current_schema_version()?;
        let conn = self.conn();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT DEFAULT CURRENT_TIMESTAMP
            );",
        )?;

        for migration in MIGRATIONS {
            if migration.version > current_version {
                let tx = conn.unchecked_transaction()?;
                tx.execute_batch(migration.up)?;
                tx.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    params![migration.version, migration.name],
                )?;
                tx.commit()?;
                tracing::debug!(version = migration.version, name = migration.name, "applied migration");
            }
        }

        Ok(())
    }
}

impl DocumentStore for SqliteStore {
    fn get(&self, store: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let raw: Option<String> = self
            .conn()
            .query_row(
                "SELECT value FROM documents WHERE store = ?1 AND id = ?2",
                params![store, id],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn put(&self, store: &str, value: &StoredDocument) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.conn().execute(
            "INSERT INTO documents (store, id, value, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(store, id) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![store, value.id, raw, value.updated_at.to_rfc3339()],
        )?;
        Ok(())
    }
}
