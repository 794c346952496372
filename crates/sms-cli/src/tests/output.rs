use crate::output::render;

use serde_json::json;

#[test]
fn test_render_compact() {
    let value = json!({ "signed_out": true });

    assert_eq!(render(&value, false).unwrap(), r#"{"signed_out":true}"#);
}

#[test]
fn test_render_pretty() {
    let value = json!({ "signed_out": true });

    assert_eq!(
        render(&value, true).unwrap(),
        "{\n  \"signed_out\": true\n}"
    );
}
