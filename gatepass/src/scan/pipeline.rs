// src/scan/pipeline.rs

//! Scan-to-record pipeline.
//!
//! One attempt walks `Idle → FrameCaptured → Decoded | NoCodeFound`, then
//! `PolicyAllowed → Stored` or `PolicyDenied`. Each terminal state is a
//! [`ScanOutcome`]; only capture and storage failures are errors.

use chrono::NaiveDateTime;
use log::Level;
use shared::{Field, Identity, IdentityRecord, payload};
use std::fmt;
use thiserror::Error;

use super::decoder::CodeDecoder;
use super::source::{CaptureError, Frame, FrameSource};
use crate::clock::Clock;
use crate::db::{RecordStore, StoreError, StoredEntry};
use crate::gatepass_log;
use crate::policy::ReentryPolicy;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The frame held no readable QR code. Nothing was stored.
    NoCodeFound,
    /// A code was read but some identity fields are empty. Nothing was stored.
    Incomplete { identity: Identity, missing: Vec<Field> },
    /// The identity entered too recently.
    Denied {
        identity: Identity,
        last_entry: NaiveDateTime,
        allowed_at: Option<NaiveDateTime>,
    },
    /// A new row was appended.
    Stored { entry: StoredEntry },
}

impl ScanOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, ScanOutcome::Stored { .. })
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanOutcome::NoCodeFound => write!(f, "No QR code found in the captured image."),
            ScanOutcome::Incomplete { missing, .. } => {
                let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
                write!(f, "QR code is missing {}; nothing was saved.", names.join(", "))
            }
            ScanOutcome::Denied { identity, allowed_at, .. } => {
                write!(f, "{identity} cannot enter again yet")?;
                match allowed_at {
                    Some(at) => write!(f, " (allowed from {}).", at.format(shared::constants::TIMESTAMP_FORMAT)),
                    None => write!(f, "."),
                }
            }
            ScanOutcome::Stored { entry } => {
                let id = &entry.record.identity;
                writeln!(f, "Student Name: {}", id.name)?;
                writeln!(f, "Branch/Division: {}", id.branch)?;
                writeln!(f, "Roll Number: {}", id.roll_number)?;
                write!(f, "Data saved to the database at {}.", entry.record.timestamp_text())
            }
        }
    }
}

pub struct ScanPipeline<'s, D, C> {
    store: &'s RecordStore,
    policy: ReentryPolicy,
    decoder: D,
    clock: C,
}

impl<'s, D: CodeDecoder, C: Clock> ScanPipeline<'s, D, C> {
    pub fn new(store: &'s RecordStore, policy: ReentryPolicy, decoder: D, clock: C) -> Self {
        Self { store, policy, decoder, clock }
    }

    /// Capture one frame from `source` and process it.
    pub fn scan<S: FrameSource>(&self, mut source: S) -> Result<ScanOutcome, ScanError> {
        let frame = source.capture_frame()?;
        self.process(&frame)
    }

    /// Run an already captured frame through decode, policy and store.
    pub fn process(&self, frame: &Frame) -> Result<ScanOutcome, ScanError> {
        let payloads = self.decoder.decode_frame(frame);
        let Some(text) = payloads.first() else {
            gatepass_log!(Level::Info, "scan", "No QR code in frame");
            return Ok(ScanOutcome::NoCodeFound);
        };
        if payloads.len() > 1 {
            gatepass_log!(Level::Debug, "scan", "{} codes in frame, using the first", payloads.len());
        }
        Ok(self.process_payload(text)?)
    }

    /// Decoded payload text onwards; the part of the pipeline that does not
    /// depend on an image.
    pub fn process_payload(&self, text: &str) -> Result<ScanOutcome, StoreError> {
        let identity = payload::decode(text);
        let missing = identity.missing_fields();
        if !missing.is_empty() {
            gatepass_log!(Level::Warn, "scan", "Incomplete payload, missing {:?}", missing);
            return Ok(ScanOutcome::Incomplete { identity, missing });
        }

        let last = self.store.last_entry(&identity)?;
        let now = self.clock.now();

        match last {
            Some(last_entry) if !self.policy.may_enter(last, now) => {
                gatepass_log!(Level::Info, "scan", "Denied {} (last entry {})", identity, last_entry);
                return Ok(ScanOutcome::Denied {
                    allowed_at: self.policy.allowed_at(last_entry),
                    identity,
                    last_entry,
                });
            }
            _ => {}
        }

        let record = IdentityRecord::new(identity, now);
        let id = self.store.append(&record)?;
        gatepass_log!(Level::Info, "scan", "Stored entry {} for {}", id, record.identity);
        Ok(ScanOutcome::Stored { entry: StoredEntry { id, record } })
    }
}
