use contactdesk_core::{Aggregate, Contact, ValidationError};

fn sample() -> Contact {
    Contact::new("100", "Ada", "Lovelace", "1234567890", "12 Analytical Row").unwrap()
}

#[test]
fn new_trims_id_and_text_fields() {
    let contact = Contact::new("  100  ", "  Ada ", " Lovelace ", "1234567890", " 12 Row ").unwrap();

    assert_eq!(contact.contact_id(), "100");
    assert_eq!(contact.first_name(), "Ada");
    assert_eq!(contact.last_name(), "Lovelace");
    assert_eq!(contact.address(), "12 Row");
}

#[test]
fn new_rejects_each_invalid_field_with_its_label() {
    let too_long_id = Contact::new("12345678901", "Ada", "Lovelace", "1234567890", "Row");
    assert!(matches!(
        too_long_id.unwrap_err(),
        ValidationError::LengthOutOfRange {
            field: "contact_id",
            actual: 11,
            ..
        }
    ));

    let blank_first = Contact::new("100", "   ", "Lovelace", "1234567890", "Row");
    assert_eq!(
        blank_first.unwrap_err(),
        ValidationError::Blank {
            field: "first_name"
        }
    );

    let short_phone = Contact::new("100", "Ada", "Lovelace", "12345", "Row");
    assert!(matches!(
        short_phone.unwrap_err(),
        ValidationError::NotNumeric {
            field: "phone",
            expected_digits: 10
        }
    ));

    let long_address = Contact::new(
        "100",
        "Ada",
        "Lovelace",
        "1234567890",
        "1234567890123456789012345678901",
    );
    assert!(matches!(
        long_address.unwrap_err(),
        ValidationError::LengthOutOfRange {
            field: "address",
            max: 30,
            ..
        }
    ));
}

#[test]
fn setters_validate_and_leave_value_on_failure() {
    let mut contact = sample();

    contact.set_first_name("Grace").unwrap();
    assert_eq!(contact.first_name(), "Grace");

    let err = contact.set_phone("not-a-phone").unwrap_err();
    assert!(matches!(err, ValidationError::NotNumeric { .. }));
    assert_eq!(contact.phone(), "1234567890");
}

#[test]
fn update_replaces_all_fields_when_every_value_is_valid() {
    let mut contact = sample();
    contact
        .update("Grace", "Hopper", "0987654321", "7 Compiler Court")
        .unwrap();

    assert_eq!(contact.first_name(), "Grace");
    assert_eq!(contact.last_name(), "Hopper");
    assert_eq!(contact.phone(), "0987654321");
    assert_eq!(contact.address(), "7 Compiler Court");
    assert_eq!(contact.contact_id(), "100");
}

#[test]
fn failed_update_leaves_every_field_unchanged() {
    let mut contact = sample();
    let before = contact.clone();

    // Last value is invalid, so nothing may be assigned.
    let err = contact.update("Grace", "Hopper", "0987654321", "   ").unwrap_err();
    assert_eq!(err, ValidationError::Blank { field: "address" });

    assert_eq!(contact, before);
}

#[test]
fn copy_is_field_equal_and_independent() {
    let contact = sample();
    let mut copied = contact.copy().unwrap();
    assert_eq!(copied, contact);

    copied.set_first_name("Changed").unwrap();
    assert_eq!(contact.first_name(), "Ada");
}

#[test]
fn serialization_uses_expected_wire_fields_and_roundtrips() {
    let contact = sample();
    let json = serde_json::to_value(&contact).unwrap();

    assert_eq!(json["contact_id"], "100");
    assert_eq!(json["first_name"], "Ada");
    assert_eq!(json["last_name"], "Lovelace");
    assert_eq!(json["phone"], "1234567890");
    assert_eq!(json["address"], "12 Analytical Row");

    let decoded: Contact = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, contact);
}

#[test]
fn deserialize_rejects_structurally_invalid_data() {
    let value = serde_json::json!({
        "contact_id": "100",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "phone": "12345",
        "address": "12 Analytical Row"
    });

    let err = serde_json::from_value::<Contact>(value).unwrap_err();
    assert!(
        err.to_string().contains("phone"),
        "unexpected error: {err}"
    );
}
