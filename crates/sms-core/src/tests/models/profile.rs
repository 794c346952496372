use crate::{Identity, Profile, Role};

use uuid::Uuid;

fn identity() -> Identity {
    Identity::new(Uuid::new_v4(), "desk@example.com")
}

#[test]
fn given_identity_when_fallback_then_id_and_email_match_and_no_role() {
    let identity = identity();

    let profile = Profile::fallback(&identity);

    assert_eq!(profile.id, identity.id);
    assert_eq!(profile.email, identity.email);
    assert!(profile.full_name.is_none());
    assert!(profile.avatar_url.is_none());
    assert!(profile.role.is_none());
}

#[test]
fn given_blank_name_when_new_account_then_name_is_none() {
    let profile = Profile::for_new_account(&identity(), "   ");
    assert!(profile.full_name.is_none());
}

#[test]
fn given_name_when_new_account_then_name_is_trimmed() {
    let profile = Profile::for_new_account(&identity(), "  Priya Shah ");
    assert_eq!(profile.full_name.as_deref(), Some("Priya Shah"));
    assert!(profile.role.is_none());
}

#[test]
fn given_no_role_when_has_role_in_then_false() {
    let profile = Profile::fallback(&identity());
    assert!(!profile.has_role_in(&[Role::Admin, Role::Staff, Role::User]));
}

#[test]
fn given_staff_role_when_has_role_in_then_checks_membership() {
    let mut profile = Profile::fallback(&identity());
    profile.role = Some(Role::Staff);

    assert!(profile.has_role_in(&[Role::Admin, Role::Staff]));
    assert!(!profile.has_role_in(&[Role::Admin]));
}

#[test]
fn given_row_without_optional_columns_when_deserialize_then_defaults() {
    let json = r#"{"id":"550e8400-e29b-41d4-a716-446655440000","email":"a@x.com"}"#;

    let profile: Profile = serde_json::from_str(json).unwrap();

    assert_eq!(profile.email, "a@x.com");
    assert!(profile.role.is_none());
    assert_eq!(profile.display_name(), "a@x.com");
}

#[test]
fn given_row_with_role_when_deserialize_then_role_parsed() {
    let json = r#"{
        "id":"550e8400-e29b-41d4-a716-446655440000",
        "email":"a@x.com",
        "full_name":"Asha",
        "avatar_url":null,
        "role":"admin",
        "created_at":"2024-01-01T00:00:00Z"
    }"#;

    let profile: Profile = serde_json::from_str(json).unwrap();

    assert_eq!(profile.role, Some(Role::Admin));
    assert_eq!(profile.display_name(), "Asha");
}
