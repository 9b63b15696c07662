use crate::config::{ConfigError, ConfigStore, EditorConfig};
use crate::db::SqliteStore;
use crate::ids::UuidIds;
use crate::session::EditorSession;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Db(rusqlite::Error),
    Io(std::io::Error),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Db(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

pub fn open_store(db_path: &Path) -> Result<SqliteStore, AppError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::open(db_path)?;
    store.run_migrations()?;
    Ok(store)
}

pub fn open_session(config: EditorConfig) -> Result<EditorSession, AppError> {
    let db_path = config.resolve_database_path()?;
    let store = open_store(&db_path)?;
    tracing::info!(path = %db_path.display(), "opened editor store");
    Ok(EditorSession::load(config, Arc::new(store), Box::new(UuidIds))?)
}

pub fn open_default_session() -> Result<EditorSession, AppError> {
    let config = ConfigStore::default_store()?.load()?;
    open_session(config)
}
