use crate::blocks::Block;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug)]
pub enum StoreError {
    Db(rusqlite::Error),
    Serde(serde_json::Error),
    Io(std::io::Error),
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Db(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// The whole block sequence as it is written to a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub id: String,
    pub content: Vec<Block>,
    pub updated_at: DateTime<Utc>,
}

impl StoredDocument {
    pub fn new(id: impl Into<String>, content: Vec<Block>) -> Self {
        Self {
            id: id.into(),
            content,
            updated_at: Utc::now(),
        }
    }
}

/// Key/value document store shared with the rest of the application.
///
/// `put` is an upsert keyed by `value.id` and must be safe to repeat.
pub trait DocumentStore: Send + Sync {
    fn get(&self, store: &str, id: &str) -> Result<Option<StoredDocument>, StoreError>;
    fn put(&self, store: &str, value: &StoredDocument) -> Result<(), StoreError>;
}

/// In-process store holding serialized JSON, with switches to simulate an
/// unreachable backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<(String, String), String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    puts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `put` calls.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Stores a raw value, bypassing serialization. Used to plant corrupt data.
    pub fn insert_raw(&self, store: &str, id: &str, raw: &str) {
        let mut values = self.values.lock().unwrap_or_else(|err| err.into_inner());
        values.insert((store.to_string(), id.to_string()), raw.to_string());
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, store: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        let values = self.values.lock().unwrap_or_else(|err| err.into_inner());
        match values.get(&(store.to_string(), id.to_string())) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn put(&self, store: &str, value: &StoredDocument) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        let raw = serde_json::to_string(value)?;
        let mut values = self.values.lock().unwrap_or_else(|err| err.into_inner());
        values.insert((store.to_string(), value.id.clone()), raw);
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
