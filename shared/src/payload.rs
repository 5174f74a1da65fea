// shared/src/payload.rs

//! # Payload codec
//!
//! The text stored inside a printed QR code:
//!
//! ```text
//! Name: Asha
//! Branch/Division: CS
//! Roll Number: 17
//! ```
//!
//! Values are not escaped. Decoding is lenient: unknown lines are skipped,
//! absent labels leave the field empty, and nothing is ever rejected as
//! malformed. Completeness is the caller's decision.

use crate::identity::{Field, Identity, IdentityError};

/// Render the three identity fields as payload lines.
pub fn encode(identity: &Identity) -> String {
    Field::ALL
        .into_iter()
        .map(|f| format!("{} {}", f.label(), identity.get(f)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse payload text back into a (possibly partial) identity.
pub fn decode(text: &str) -> Identity {
    let mut identity = Identity::default();
    for line in text.split('\n') {
        let Some(field) = Field::ALL.into_iter().find(|f| line.starts_with(f.label())) else {
            continue;
        };
        // everything after the first colon; labels end with theirs
        let value = line.split_once(':').map_or("", |(_, rest)| rest);
        identity.set(field, value.trim().to_owned());
    }
    identity
}

/// A value with a line break would split into a second, unlabelled line on
/// decode. Refuse to encode such identities.
pub fn check_encodable(identity: &Identity) -> Result<(), IdentityError> {
    match Field::ALL
        .into_iter()
        .find(|f| identity.get(*f).contains(['\n', '\r']))
    {
        Some(field) => Err(IdentityError::LineBreak(field)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_emits_three_labelled_lines() {
        let text = encode(&Identity::new("Asha", "CS", "17"));
        assert_eq!(text, "Name: Asha\nBranch/Division: CS\nRoll Number: 17");
    }

    #[test]
    fn decode_reference_payload() {
        let id = decode("Name: Asha\nBranch/Division: CS\nRoll Number: 17");
        assert_eq!(id, Identity::new("Asha", "CS", "17"));
    }

    #[test]
    fn decode_ignores_unknown_lines_and_keeps_missing_fields_empty() {
        let id = decode("hello\nRoll Number:   42  \nsomething: else");
        assert_eq!(id, Identity::new("", "", "42"));
    }

    #[test]
    fn decode_tolerates_crlf() {
        let id = decode("Name: Ravi\r\nBranch/Division: EE\r\nRoll Number: 42\r\n");
        assert_eq!(id, Identity::new("Ravi", "EE", "42"));
    }

    #[test]
    fn decode_keeps_colons_inside_values() {
        let id = decode("Name: A: B");
        assert_eq!(id.name, "A: B");
    }

    #[test]
    fn repeated_label_last_one_wins() {
        let id = decode("Name: First\nName: Second");
        assert_eq!(id.name, "Second");
    }

    #[test]
    fn labels_are_case_sensitive_and_anchored() {
        let id = decode("name: lower\n Name: indented");
        assert_eq!(id, Identity::default());
    }

    #[test]
    fn check_encodable_rejects_line_breaks() {
        let id = Identity::new("Asha", "CS\nRoll Number: 99", "17");
        assert_eq!(check_encodable(&id), Err(IdentityError::LineBreak(Field::Branch)));
        assert!(check_encodable(&Identity::new("Asha", "CS", "17")).is_ok());
    }
}
