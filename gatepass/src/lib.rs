// src/lib.rs
// ────────────────────────────────────────────────────────────────────────────
// Public library entry point.  Re-export everything for both `main.rs` and
// integration tests.

mod macros;

pub mod clock;
pub mod config;
pub mod db;
pub mod export;
pub mod policy;
pub mod qr;
pub mod scan;
