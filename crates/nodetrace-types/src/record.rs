use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A single extracted field value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// Returns the text if this value is textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(n) => Some(*n),
            FieldValue::Integer(n) => Some(*n as f64),
            FieldValue::Text(s) => s.trim().trim_end_matches('%').parse().ok(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Float(n) => write!(f, "{}", n),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Float(n)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(dt: NaiveDateTime) -> Self {
        FieldValue::DateTime(dt)
    }
}

/// One structured row of extracted fields.
///
/// Field order is insertion order; inserting an existing field name replaces
/// its value in place. The schema is defined by the parser that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRecord {
    fields: Vec<(String, FieldValue)>,
}

impl ParsedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Insert a field at the front, removing any existing field of the same name.
    pub fn prepend(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        self.fields.retain(|(k, _)| *k != name);
        self.fields.insert(0, (name, value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Text of a field, or `None` when absent or not textual.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Rebuild the record by passing every field through `f`.
    pub fn map_fields(self, mut f: impl FnMut(String, FieldValue) -> (String, FieldValue)) -> Self {
        let mut out = ParsedRecord::new();
        for (k, v) in self.fields {
            let (k, v) = f(k, v);
            out.insert(k, v);
        }
        out
    }
}

impl<K, V> FromIterator<(K, V)> for ParsedRecord
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = ParsedRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for ParsedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Result of running one parser over the blocks of its canonical key.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ParseOutput {
    /// One flat sequence, command lines concatenated in block order.
    Merged(Vec<ParsedRecord>),
    /// Records per command line, in block order.
    Keyed(Vec<(String, Vec<ParsedRecord>)>),
}

impl ParseOutput {
    pub fn from_keyed(keyed: Vec<(String, Vec<ParsedRecord>)>, merge: bool) -> Self {
        if merge {
            ParseOutput::Merged(keyed.into_iter().flat_map(|(_, records)| records).collect())
        } else {
            ParseOutput::Keyed(keyed)
        }
    }

    /// Convert the keyed shape into the merged one.
    pub fn flatten(self) -> Self {
        match self {
            ParseOutput::Merged(_) => self,
            keyed => ParseOutput::Merged(keyed.into_records()),
        }
    }

    /// Flatten into a single record sequence regardless of shape.
    pub fn into_records(self) -> Vec<ParsedRecord> {
        match self {
            ParseOutput::Merged(records) => records,
            ParseOutput::Keyed(keyed) => keyed.into_iter().flat_map(|(_, r)| r).collect(),
        }
    }

    pub fn record_count(&self) -> usize {
        match self {
            ParseOutput::Merged(records) => records.len(),
            ParseOutput::Keyed(keyed) => keyed.iter().map(|(_, r)| r.len()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = ParsedRecord::new();
        record.insert("A", "1");
        record.insert("B", "2");
        record.insert("A", "3");

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(record.get_str("A"), Some("3"));
    }

    #[test]
    fn test_prepend_moves_field_to_front() {
        let mut record = ParsedRecord::new().with("Task", "tShell");
        record.prepend("Record #", 2i64);

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["Record #", "Task"]);
        assert_eq!(record.get("Record #"), Some(&FieldValue::Integer(2)));
    }

    #[test]
    fn test_record_serializes_in_field_order() {
        let record = ParsedRecord::new()
            .with("Zeta", "z")
            .with("Alpha", 1i64)
            .with("Date", NaiveDate::from_ymd_opt(2022, 6, 21).unwrap());

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Zeta":"z","Alpha":1,"Date":"2022-06-21"}"#);
    }

    #[test]
    fn test_field_value_display() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 22)
            .unwrap()
            .and_hms_opt(9, 19, 1)
            .unwrap();
        assert_eq!(FieldValue::from(dt).to_string(), "2024-03-22 09:19:01");
        assert_eq!(FieldValue::from(18.1).to_string(), "18.1");
    }

    #[test]
    fn test_merged_output_equals_flattened_keyed_output() {
        let keyed = vec![
            ("cmd a".to_string(), vec![ParsedRecord::new().with("n", 1i64)]),
            ("cmd b".to_string(), vec![]),
            (
                "cmd c".to_string(),
                vec![
                    ParsedRecord::new().with("n", 2i64),
                    ParsedRecord::new().with("n", 3i64),
                ],
            ),
        ];

        let merged = ParseOutput::from_keyed(keyed.clone(), true);
        let unmerged = ParseOutput::from_keyed(keyed, false);

        assert_eq!(merged.record_count(), 3);
        assert_eq!(merged, unmerged.flatten());
    }
}
