use addressbook_core::{Contact, ContactValidationError};

fn john_doe() -> Contact {
    Contact::new(
        "John",
        "Doe",
        Some("+1 111 1234567".to_string()),
        "john.doe@somewhere.com",
    )
}

#[test]
fn new_contact_has_no_id_and_validates() {
    let contact = john_doe();

    assert_eq!(contact.id, None);
    assert_eq!(contact.first_name, "John");
    assert_eq!(contact.last_name, "Doe");
    assert_eq!(contact.phone_number.as_deref(), Some("+1 111 1234567"));
    assert_eq!(contact.email, "john.doe@somewhere.com");
    contact.validate().unwrap();
}

#[test]
fn phone_number_is_optional() {
    let contact = Contact::new("Ada", "Lovelace", None, "ada@example.com");
    contact.validate().unwrap();
}

#[test]
fn validate_rejects_blank_required_fields() {
    let mut contact = john_doe();
    contact.first_name = "   ".to_string();
    assert_eq!(
        contact.validate().unwrap_err(),
        ContactValidationError::MissingField("first_name")
    );

    let mut contact = john_doe();
    contact.last_name = String::new();
    assert_eq!(
        contact.validate().unwrap_err(),
        ContactValidationError::MissingField("last_name")
    );

    let mut contact = john_doe();
    contact.email = String::new();
    assert_eq!(
        contact.validate().unwrap_err(),
        ContactValidationError::MissingField("email")
    );
}

#[test]
fn validate_enforces_column_widths_in_characters() {
    let mut contact = john_doe();
    contact.first_name = "é".repeat(50);
    contact.validate().unwrap();

    contact.first_name = "é".repeat(51);
    assert_eq!(
        contact.validate().unwrap_err(),
        ContactValidationError::TooLong {
            field: "first_name",
            max_chars: 50,
            actual_chars: 51,
        }
    );

    let mut contact = john_doe();
    contact.email = format!("{}@example.com", "a".repeat(90));
    let err = contact.validate().unwrap_err();
    assert!(matches!(err, ContactValidationError::TooLong { field: "email", .. }));
    assert!(err.to_string().contains("at most 100"));
}

#[test]
fn same_fields_ignores_id() {
    let mut stored = john_doe();
    stored.id = Some(42);

    assert!(stored.same_fields(&john_doe()));
    assert_ne!(stored, john_doe());
}

#[test]
fn serialization_uses_snake_case_fields_and_skips_missing_id() {
    let json = serde_json::to_value(john_doe()).unwrap();
    assert!(json.get("id").is_none());
    assert_eq!(json["first_name"], "John");
    assert_eq!(json["last_name"], "Doe");
    assert_eq!(json["phone_number"], "+1 111 1234567");
    assert_eq!(json["email"], "john.doe@somewhere.com");

    let mut stored = john_doe();
    stored.id = Some(7);
    let json = serde_json::to_value(&stored).unwrap();
    assert_eq!(json["id"], 7);

    let decoded: Contact = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, stored);
}
