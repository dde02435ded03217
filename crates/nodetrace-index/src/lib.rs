// SQLite store for extracted records
// One table per canonical command key, natural keys enforced by UNIQUE

mod db;
mod error;
mod fields;
mod ingest;
mod queries;
mod records;
mod schema;

// Public API
pub use db::Database;
pub use error::{Error, Result};
pub use ingest::{IngestFn, IngestionRegistry};
pub use records::{IngestReport, NodeRecord, SummaryRow};
pub use schema::SCHEMA_VERSION;
