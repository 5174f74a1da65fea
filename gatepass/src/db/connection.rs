// src/db/connection.rs
//! Opening SQLite with runtime parameters.

use std::{fs, path::{Path, PathBuf}, time::Duration};
use rusqlite::Connection;
use crate::config::DatabaseConfig;
use super::error::StoreError;

/// Resolve the configured database path against `base_dir`; absolute paths
/// are kept as they are.
pub fn db_path(base_dir: &Path, cfg: &DatabaseConfig) -> PathBuf {
    base_dir.join(&cfg.path)
}

pub fn open_db_connection(path: &Path, cfg: &DatabaseConfig) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::UnavailablePath {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let conn = Connection::open(path)?;
    conn.busy_timeout(Duration::from_millis(cfg.busy_timeout_ms))?;
    // journal_mode returns the resulting mode as a row
    conn.pragma_update_and_check(None, "journal_mode", cfg.journal_mode.as_str(), |_| Ok(()))?;
    conn.pragma_update(None, "synchronous", cfg.synchronous.as_str())?;
    Ok(conn)
}
