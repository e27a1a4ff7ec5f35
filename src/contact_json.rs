//! Purpose: Build stable JSON envelopes for CLI stdout.
//! Exports: `contact_json`, `check_json`.
//! Role: Shared contract helpers for scripted consumers of the CLI.
//! Invariants: JSON schema is stable once published; fields are additive-only.
//! Invariants: `phone` is an explicit null when absent, never omitted.

use serde_json::{Map, Value, json};

use rolodex::api::Contact;

pub fn contact_json(position: usize, contact: &Contact) -> Value {
    let mut inner = Map::new();
    inner.insert("position".to_string(), json!(position));
    inner.insert("first_name".to_string(), json!(contact.first_name));
    inner.insert("last_name".to_string(), json!(contact.last_name));
    inner.insert("emails".to_string(), json!(contact.emails));
    inner.insert(
        "phone".to_string(),
        contact.phone.as_ref().map(|p| json!(p)).unwrap_or(Value::Null),
    );
    Value::Object(inner)
}

pub fn check_json(source: &str, contacts: usize) -> Value {
    let mut inner = Map::new();
    inner.insert("ok".to_string(), json!(true));
    inner.insert("source".to_string(), json!(source));
    inner.insert("contacts".to_string(), json!(contacts));
    Value::Object(inner)
}
