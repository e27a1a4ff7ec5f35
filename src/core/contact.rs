//! Purpose: Decode contact-feed JSON into typed contact records.
//! Exports: `Contact`, `decode_contacts`.
//! Role: The tolerant record decoder; a pure transform with no IO.
//! Invariants: Output preserves wire order; decode is all-or-nothing.
//! Invariants: `email` tolerates string-or-array; absent `email`/`phone` never fail.
//! Invariants: Errors carry the offending field name and zero-based entry index.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub emails: Vec<String>,
    pub phone: Option<String>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// First email in wire order, if the entry carried any.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }
}

/// Decode a full feed document into contact records.
///
/// The document must be a JSON array of objects. The first violation aborts
/// the whole decode; there is no partial-success mode.
pub fn decode_contacts(document: &Value) -> Result<Vec<Contact>, Error> {
    let entries = document.as_array().ok_or_else(|| {
        Error::new(ErrorKind::UnexpectedShape).with_message("feed document must be a json array")
    })?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| decode_entry(entry, index as u64))
        .collect()
}

fn decode_entry(entry: &Value, index: u64) -> Result<Contact, Error> {
    let fields = entry.as_object().ok_or_else(|| {
        Error::new(ErrorKind::UnexpectedShape)
            .with_message("feed entry must be a json object")
            .with_index(index)
    })?;
    Ok(Contact {
        first_name: required_string(fields, "fname", index)?,
        last_name: required_string(fields, "lname", index)?,
        emails: email_list(fields, index)?,
        phone: optional_string(fields, "phone", index)?,
    })
}

fn required_string(fields: &Map<String, Value>, name: &str, index: u64) -> Result<String, Error> {
    match fields.get(name) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(type_mismatch(name, "a string", index)),
        None => Err(Error::new(ErrorKind::MissingField)
            .with_message(format!("required field `{name}` is absent"))
            .with_field(name)
            .with_index(index)),
    }
}

fn optional_string(
    fields: &Map<String, Value>,
    name: &str,
    index: u64,
) -> Result<Option<String>, Error> {
    match fields.get(name) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(type_mismatch(name, "a string", index)),
    }
}

// `email` is polymorphic on the wire: a lone string or an array of strings.
fn email_list(fields: &Map<String, Value>, index: u64) -> Result<Vec<String>, Error> {
    match fields.get("email") {
        None => Ok(Vec::new()),
        Some(Value::String(text)) => Ok(vec![text.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| type_mismatch("email", "a string or an array of strings", index)),
        Some(_) => Err(type_mismatch("email", "a string or an array of strings", index)),
    }
}

fn type_mismatch(name: &str, expected: &str, index: u64) -> Error {
    Error::new(ErrorKind::TypeMismatch)
        .with_message(format!("field `{name}` must be {expected}"))
        .with_field(name)
        .with_index(index)
}
