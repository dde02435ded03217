use serde::Serialize;
use std::ops::AddAssign;

/// Node row from the index database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    /// Node identity, usually the management IP.
    pub node: String,
    /// When the first transcript for this node was ingested (RFC 3339).
    pub first_ingested_at: String,
}

/// Outcome of ingesting one canonical key's records for a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub inserted: usize,
    /// Records whose natural key was already stored.
    pub duplicates: usize,
    /// Records rejected for bad field values or database errors.
    pub failed: usize,
}

impl IngestReport {
    pub fn total(&self) -> usize {
        self.inserted + self.duplicates + self.failed
    }
}

impl AddAssign for IngestReport {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.duplicates += other.duplicates;
        self.failed += other.failed;
    }
}

/// One `Info Type` / `Data` row of the node summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Info Type")]
    pub info_type: &'static str,
    #[serde(rename = "Data")]
    pub data: String,
}

impl SummaryRow {
    pub fn new(info_type: &'static str, data: impl Into<String>) -> Self {
        Self {
            info_type,
            data: data.into(),
        }
    }
}
