// Error types
pub mod error;

// Parser contract
pub mod traits;

// Command key -> raw command-line patterns
pub mod catalog;

// Transcript -> per-command blocks
pub mod segmenter;

// Shared extraction primitives
pub mod extract;

// Command parser implementations
pub mod commands;

// Parser registry
pub mod registry;

// Flattening and normalization
pub mod merge;

pub use catalog::{PatternCatalog, PatternSet, default_catalog};
pub use error::{Error, Result};
pub use registry::{ParserRegistration, ParserRegistry};
pub use segmenter::{DEFAULT_PROMPT_SENTINEL, Segmenter};
pub use traits::{CommandParser, ParseContext};
