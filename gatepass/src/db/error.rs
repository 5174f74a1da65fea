// src/db/error.rs

use shared::IdentityError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened, read or written.
    #[error("record store unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),

    #[error("record store unavailable: cannot create {path:?}: {source}")]
    UnavailablePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row holds a timestamp that does not parse; the table is corrupt.
    #[error("entry {id} has malformed timestamp {value:?}")]
    MalformedTimestamp {
        id: i64,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("refusing to store incomplete identity: {0}")]
    Incomplete(#[from] IdentityError),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::UnavailablePath { .. })
    }
}
