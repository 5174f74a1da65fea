// src/export.rs

//! CSV export of the whole record store.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use log::Level;
use std::{fs::File, io::Write, path::Path};
use thiserror::Error;

use crate::db::{RecordStore, StoreError, StoredEntry};
use crate::gatepass_log;

pub const CSV_HEADER: [&str; 5] = ["ID", "Name", "Branch", "Roll Number", "Timestamp"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Header plus one row per entry, in the order given.
pub fn write_csv<W: Write>(entries: &[StoredEntry], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for e in entries {
        let id = &e.record.identity;
        let row_id = e.id.to_string();
        let ts = e.record.timestamp_text();
        wtr.write_record([
            row_id.as_str(),
            id.name.as_str(),
            id.branch.as_str(),
            id.roll_number.as_str(),
            ts.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Whole table as CSV bytes.
pub fn export_bytes(store: &RecordStore) -> Result<Vec<u8>, ExportError> {
    let entries = store.all_records()?;
    let mut buf = Vec::new();
    write_csv(&entries, &mut buf)?;
    Ok(buf)
}

/// Write the whole table to `path`; returns the number of rows exported.
pub fn export_file(store: &RecordStore, path: &Path) -> Result<usize, ExportError> {
    let entries = store.all_records()?;
    write_csv(&entries, File::create(path)?)?;
    gatepass_log!(Level::Info, "export", "Exported {} entries to {}", entries.len(), path.display());
    Ok(entries.len())
}

/// `data:file/csv;base64,...`, usable as a download link.
pub fn csv_data_uri(csv: &[u8]) -> String {
    format!("data:file/csv;base64,{}", STANDARD.encode(csv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::{Identity, IdentityRecord};

    fn entry(id: i64, name: &str, secs: u32) -> StoredEntry {
        let ts = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(7, 30, secs).unwrap();
        StoredEntry { id, record: IdentityRecord::new(Identity::new(name, "CS", "17"), ts) }
    }

    #[test]
    fn header_then_rows_in_given_order() {
        let mut out = Vec::new();
        write_csv(&[entry(1, "Asha", 0), entry(2, "Ravi", 5)], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "ID,Name,Branch,Roll Number,Timestamp\n\
             1,Asha,CS,17,2024-02-29 07:30:00\n\
             2,Ravi,CS,17,2024-02-29 07:30:05\n"
        );
    }

    #[test]
    fn values_with_commas_are_quoted() {
        let mut out = Vec::new();
        write_csv(&[entry(3, "Doe, Jane", 0)], &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("3,\"Doe, Jane\",CS"));
    }

    #[test]
    fn empty_store_exports_header_only() {
        let store = RecordStore::in_memory().unwrap();
        let bytes = export_bytes(&store).unwrap();
        assert_eq!(bytes, b"ID,Name,Branch,Roll Number,Timestamp\n");
    }

    #[test]
    fn data_uri_roundtrips() {
        let uri = csv_data_uri(b"ID\n");
        assert_eq!(uri, "data:file/csv;base64,SUQK");
    }
}
