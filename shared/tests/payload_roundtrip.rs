use shared::{Identity, payload};

#[test]
fn decode_recovers_encoded_identity() {
    let original = Identity::new("Ravi Kumar", "EE / Div B", "42-A");
    let back = payload::decode(&payload::encode(&original));
    assert_eq!(back, original);
}

#[test]
fn non_ascii_values_survive() {
    let original = Identity::new("Zoë Ñúñez", "Mécanique", "７");
    assert_eq!(payload::decode(&payload::encode(&original)), original);
}

#[test]
fn validated_trimmed_identities_roundtrip() {
    for raw in [
        Identity::new("  Asha ", "CS", "17"),
        Identity::new("Ravi", "\tEE", "42  "),
        Identity::new("Doe, Jane", " Div: B ", "A-1"),
    ] {
        let accepted = raw.trimmed();
        assert!(accepted.validate().is_ok());
        assert!(payload::check_encodable(&accepted).is_ok());
        assert_eq!(payload::decode(&payload::encode(&accepted)), accepted);
    }
}

#[test]
fn blank_fields_are_rejected_before_encoding() {
    let blank = Identity::new("   ", "CS", "17").trimmed();
    assert_eq!(blank.missing_fields(), vec![shared::Field::Name]);
    assert!(blank.validate().is_err());
}

#[test]
fn encoding_an_empty_field_decodes_as_missing() {
    let partial = Identity::new("Asha", "", "17");
    let back = payload::decode(&payload::encode(&partial));
    assert!(!back.is_complete());
    assert_eq!(back.missing_fields(), vec![shared::Field::Branch]);
}
