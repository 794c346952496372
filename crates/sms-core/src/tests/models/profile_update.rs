use crate::{ProfileUpdate, Role};

#[test]
fn given_empty_update_when_validate_then_error() {
    let update = ProfileUpdate::default();
    assert!(update.is_empty());
    assert!(update.validate().is_err());
}

#[test]
fn given_blank_name_when_validate_then_error() {
    let update = ProfileUpdate {
        full_name: Some("  ".to_string()),
        ..Default::default()
    };
    assert!(update.validate().is_err());
}

#[test]
fn given_partial_update_when_serialize_then_only_set_fields_sent() {
    let update = ProfileUpdate {
        avatar_url: Some("https://cdn.example.com/a.png".to_string()),
        role: Some(Role::Staff),
        ..Default::default()
    };

    assert!(update.validate().is_ok());
    let json = serde_json::to_value(&update).unwrap();

    assert_eq!(json["avatar_url"], "https://cdn.example.com/a.png");
    assert_eq!(json["role"], "staff");
    assert!(json.get("full_name").is_none());
}
