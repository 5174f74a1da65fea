// shared/src/identity.rs

//! # Identity model
//!
//! An [`Identity`] is the key `(name, branch, roll_number)` a subject is known
//! by. Decoding a payload may yield a *partial* identity (any field empty), so
//! the type itself does not enforce completeness; callers that persist or
//! encode identities go through [`Identity::validate`] first.
//!
//! An [`IdentityRecord`] is one accepted entry: an identity plus the second
//! at which it was accepted.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::{BRANCH_LABEL, NAME_LABEL, ROLL_NUMBER_LABEL};

/// One of the three identity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Name,
    Branch,
    RollNumber,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Branch, Field::RollNumber];

    /// Prefix that introduces this field inside a payload line.
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => NAME_LABEL,
            Field::Branch => BRANCH_LABEL,
            Field::RollNumber => ROLL_NUMBER_LABEL,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Branch => "branch/division",
            Field::RollNumber => "roll number",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("missing {}", join_fields(.0))]
    MissingFields(Vec<Field>),

    #[error("{0} contains a line break and cannot be encoded")]
    LineBreak(Field),
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The identity key. Equality is field-by-field and case-sensitive, exactly
/// as the store compares it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub branch: String,
    pub roll_number: String,
}

impl Identity {
    pub fn new(
        name: impl Into<String>,
        branch: impl Into<String>,
        roll_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            branch: branch.into(),
            roll_number: roll_number.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Branch => &self.branch,
            Field::RollNumber => &self.roll_number,
        }
    }

    pub(crate) fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Branch => self.branch = value,
            Field::RollNumber => self.roll_number = value,
        }
    }

    /// Fields that are empty or only whitespace, in payload order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }

    /// Copy with surrounding whitespace removed from every field, the form a
    /// decoded payload takes.
    pub fn trimmed(&self) -> Self {
        Self::new(self.name.trim(), self.branch.trim(), self.roll_number.trim())
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// All three fields must be non-empty before an identity is stored.
    pub fn validate(&self) -> Result<(), IdentityError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IdentityError::MissingFields(missing))
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.branch, self.roll_number)
    }
}

/// One accepted entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(with = "timestamp_text")]
    pub timestamp: NaiveDateTime,
}

impl IdentityRecord {
    pub fn new(identity: Identity, timestamp: NaiveDateTime) -> Self {
        Self { identity, timestamp }
    }

    /// Timestamp rendered the way it is persisted and exported.
    pub fn timestamp_text(&self) -> String {
        self.timestamp
            .format(crate::constants::TIMESTAMP_FORMAT)
            .to_string()
    }
}

/// Serde adapter keeping JSON timestamps in the persisted text layout.
mod timestamp_text {
    use crate::constants::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(D::Error::custom)
    }
}
