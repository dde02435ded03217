//! Flattening and normalization of parser output.

use nodetrace_types::{FieldValue, ParsedRecord};

/// Concatenate per-command-line record lists in block order.
pub fn merge(keyed: Vec<(String, Vec<ParsedRecord>)>) -> Vec<ParsedRecord> {
    keyed.into_iter().flat_map(|(_, records)| records).collect()
}

/// Trim field names and collapse whitespace runs inside text values.
/// Typed values pass through untouched.
pub fn normalize_record(record: ParsedRecord) -> ParsedRecord {
    record.map_fields(|name, value| {
        let value = match value {
            FieldValue::Text(text) => FieldValue::Text(collapse_whitespace(&text)),
            other => other,
        };
        (name.trim().to_string(), value)
    })
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
