// src/db/mod.rs
//! Public façade for the record store.

pub mod connection;
pub mod error;
pub mod store;

pub use connection::db_path;
pub use error::StoreError;
pub use store::{RecordStore, StoredEntry};
