use crate::Role;

use std::str::FromStr;

#[test]
fn test_role_as_str() {
    assert_eq!(Role::Admin.as_str(), "admin");
    assert_eq!(Role::Staff.as_str(), "staff");
    assert_eq!(Role::User.as_str(), "user");
}

#[test]
fn test_role_from_str() {
    assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
    assert_eq!(Role::from_str("Staff").unwrap(), Role::Staff);
    assert_eq!(Role::from_str(" user ").unwrap(), Role::User);
    assert!(Role::from_str("superuser").is_err());
}

#[test]
fn test_role_serde_uses_lowercase() {
    let json = serde_json::to_string(&Role::Staff).unwrap();
    assert_eq!(json, "\"staff\"");

    let role: Role = serde_json::from_str("\"admin\"").unwrap();
    assert_eq!(role, Role::Admin);
}

#[test]
fn test_role_display_matches_as_str() {
    for role in Role::ALL {
        assert_eq!(role.to_string(), role.as_str());
    }
}
