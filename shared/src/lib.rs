//! Types shared by everything that reads or writes a gatepass QR payload.

pub mod constants;
pub mod identity;
pub mod payload;

pub use identity::{Field, Identity, IdentityError, IdentityRecord};
