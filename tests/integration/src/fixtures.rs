//! Test fixtures

use serde_json::{json, Value};

/// User directory seeded into every test server, keyed by handle
pub fn sample_users() -> Value {
    json!({
        "alice": {"id": "alice", "name": "Alice"},
        "bob": {"id": "bob", "name": "Bob"},
        "carol": {"id": "carol", "name": "Carol"}
    })
}

/// `typingChange` payload naming a user by id
pub fn typing(user_id: &str, typing: bool) -> Value {
    json!({"user": user_id, "typing": typing})
}

/// `statusChange` payload
pub fn status(user_id: &str, status: &str) -> Value {
    json!({"id": user_id, "status": status})
}

/// Compact view of a `typing` push: the ids of the active typers, in order
pub fn typer_ids(push: &Value) -> Vec<String> {
    push["d"]
        .as_array()
        .map(|typers| {
            typers
                .iter()
                .filter_map(|typer| typer["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
