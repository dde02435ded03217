// Configuration: data directory, TOML settings, catalog overrides
pub mod config;

// Error types
pub mod error;

// Transcript -> keyed records, and records -> index
pub mod pipeline;

pub use config::{Config, resolve_data_dir};
pub use error::{Error, Result};
pub use pipeline::{
    Extraction, FileOutcome, KeyFailure, KeyOutput, Pipeline, ingest_extraction,
    node_id_from_path,
};
