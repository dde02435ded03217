pub mod catalog;
pub mod ingest;
pub mod parse;
pub mod summary;
