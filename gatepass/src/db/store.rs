// src/db/store.rs

//! # Record store
//!
//! Append-only `student_info` table. Each accepted scan adds one row; rows are
//! never updated, and the only deletion is the explicit [`RecordStore::clear_all`].

use chrono::NaiveDateTime;
use log::Level;
use rusqlite::{Connection, Row, params};
use serde::Serialize;
use shared::{Identity, IdentityRecord, constants::TIMESTAMP_FORMAT};
use std::path::Path;

use super::{connection::open_db_connection, error::StoreError};
use crate::{config::DatabaseConfig, gatepass_log};

const SCHEMA: &str = include_str!("../../resources/schema.sql");

/// One persisted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredEntry {
    pub id: i64,
    #[serde(flatten)]
    pub record: IdentityRecord,
}

pub struct RecordStore {
    conn: Connection,
}

fn parse_timestamp(id: i64, value: String) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(&value, TIMESTAMP_FORMAT)
        .map_err(|source| StoreError::MalformedTimestamp { id, value, source })
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<(i64, Identity, String)> {
    Ok((
        row.get(0)?,
        Identity {
            name: row.get(1)?,
            branch: row.get(2)?,
            roll_number: row.get(3)?,
        },
        row.get(4)?,
    ))
}

impl RecordStore {
    /// Open (creating if needed) the database file and make sure the table exists.
    pub fn open(path: &Path, cfg: &DatabaseConfig) -> Result<Self, StoreError> {
        let store = Self { conn: open_db_connection(path, cfg)? };
        store.ensure_schema()?;
        gatepass_log!(Level::Info, "store", "Database ready at {}", path.display());
        Ok(store)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        let store = Self { conn: Connection::open_in_memory()? };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Idempotent. An existing table with other columns is left untouched.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert one entry and return its id.
    pub fn append(&self, record: &IdentityRecord) -> Result<i64, StoreError> {
        record.identity.validate()?;
        let id = &record.identity;
        self.conn.execute(
            "INSERT INTO student_info (name, branch, roll_number, timestamp) \
             VALUES (?1, ?2, ?3, ?4)",
            params![id.name, id.branch, id.roll_number, record.timestamp_text()],
        )?;
        let row_id = self.conn.last_insert_rowid();
        gatepass_log!(Level::Debug, "store", "Appended entry {} for {}", row_id, id);
        Ok(row_id)
    }

    /// Most recent timestamp for the identity key, `None` if never seen.
    ///
    /// Every row for the key is parsed, so one unreadable timestamp fails the
    /// lookup instead of being sorted out of sight by text comparison.
    pub fn last_entry(&self, identity: &Identity) -> Result<Option<NaiveDateTime>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp FROM student_info \
             WHERE name = ?1 AND branch = ?2 AND roll_number = ?3",
        )?;
        let rows = stmt.query_map(
            params![identity.name, identity.branch, identity.roll_number],
            |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)),
        )?;

        let mut latest: Option<(NaiveDateTime, i64)> = None;
        for row in rows {
            let (id, value) = row?;
            let candidate = (parse_timestamp(id, value)?, id);
            if latest.is_none_or(|l| candidate > l) {
                latest = Some(candidate);
            }
        }
        Ok(latest.map(|(ts, _)| ts))
    }

    /// Every row in insertion order.
    pub fn all_records(&self) -> Result<Vec<StoredEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, branch, roll_number, timestamp FROM student_info ORDER BY id",
        )?;
        let rows = stmt.query_map([], read_row)?;

        let mut out = Vec::new();
        for row in rows {
            let (id, identity, ts) = row?;
            out.push(StoredEntry {
                id,
                record: IdentityRecord::new(identity, parse_timestamp(id, ts)?),
            });
        }
        Ok(out)
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM student_info", [], |r| r.get(0))?;
        Ok(n as usize)
    }

    /// Delete every row. Irreversible; callers confirm with the user first.
    pub fn clear_all(&self) -> Result<usize, StoreError> {
        let removed = self.conn.execute("DELETE FROM student_info", [])?;
        gatepass_log!(Level::Warn, "store", "Cleared {} entries", removed);
        Ok(removed)
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}
