use crate::{AuthClient, BackendClient, Database, MemorySessionStorage};

use std::sync::Arc;
use std::time::Duration;

fn database() -> Database {
    let client =
        BackendClient::new("http://127.0.0.1:1", "anon-key", Duration::from_secs(1)).unwrap();
    let auth = Arc::new(AuthClient::new(
        client.clone(),
        Arc::new(MemorySessionStorage::new()),
    ));
    Database::new(client, auth)
}

fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

#[test]
fn given_default_query_then_selects_all_columns() {
    let query = database().from("profiles");

    assert_eq!(query.query_pairs(), vec![pair("select", "*")]);
}

#[test]
fn given_filters_then_encoded_as_operator_prefix() {
    let query = database()
        .from("students")
        .select("id,full_name")
        .eq("status", "active")
        .neq("grade", 3)
        .gt("age", 10)
        .gte("age", 11)
        .lt("age", 20)
        .lte("age", 19)
        .like("full_name", "A%")
        .ilike("email", "%@x.com")
        .is("deleted_at", "null");

    assert_eq!(
        query.query_pairs(),
        vec![
            pair("select", "id,full_name"),
            pair("status", "eq.active"),
            pair("grade", "neq.3"),
            pair("age", "gt.10"),
            pair("age", "gte.11"),
            pair("age", "lt.20"),
            pair("age", "lte.19"),
            pair("full_name", "like.A%"),
            pair("email", "ilike.%@x.com"),
            pair("deleted_at", "is.null"),
        ]
    );
}

#[test]
fn given_order_and_limit_then_appended_last() {
    let query = database()
        .from("courses")
        .order("created_at", false)
        .order("title", true)
        .limit(25);

    assert_eq!(
        query.query_pairs(),
        vec![
            pair("select", "*"),
            pair("order", "created_at.desc,title.asc"),
            pair("limit", "25"),
        ]
    );
}

#[test]
fn given_delete_then_no_select_pair() {
    let query = database().from("enquiries").delete().eq("id", 7);

    assert_eq!(query.query_pairs(), vec![pair("id", "eq.7")]);
}
