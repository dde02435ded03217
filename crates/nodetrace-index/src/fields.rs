//! Column coercion for parsed record fields.

use nodetrace_types::{FieldValue, ParsedRecord};

use crate::{Error, Result};

/// Display form of a field; absent fields become the empty string.
pub fn text(record: &ParsedRecord, field: &str) -> String {
    record.get(field).map(ToString::to_string).unwrap_or_default()
}

/// `None` for absent or blank fields.
pub fn optional_text(record: &ParsedRecord, field: &str) -> Option<String> {
    record
        .get(field)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

pub fn integer(record: &ParsedRecord, field: &str) -> Result<Option<i64>> {
    match record.get(field) {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| coercion(field, value, "integer")),
    }
}

pub fn required_integer(record: &ParsedRecord, field: &str) -> Result<i64> {
    integer(record, field)?.ok_or_else(|| Error::Coercion {
        field: field.to_string(),
        value: String::new(),
        expected: "integer",
    })
}

pub fn float(record: &ParsedRecord, field: &str) -> Result<Option<f64>> {
    match record.get(field) {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| coercion(field, value, "number")),
    }
}

fn coercion(field: &str, value: &FieldValue, expected: &'static str) -> Error {
    Error::Coercion {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
}
