use std::path::PathBuf;
use thiserror::Error;

/// Result type for nodetrace-parsers operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while segmenting and parsing transcripts
#[derive(Debug, Error)]
pub enum Error {
    /// Transcript could not be read. Fatal for that file only.
    #[error("failed to read transcript {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A canonical key has no registered parser.
    #[error("no parser registered for command key '{key}'")]
    ParserNotFound { key: String },

    /// A parser's structural assumption about its block output was violated.
    #[error("failed to parse '{key}' output: {reason}")]
    Parse { key: String, reason: String },

    /// A declared companion block is absent from the transcript.
    #[error("'{key}' requires the '{command}' output, which is missing from the transcript")]
    MissingCoBlock { key: String, command: String },

    /// Catalog and registry disagree, or a pattern is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    pub fn parse(key: &str, reason: impl Into<String>) -> Self {
        Error::Parse {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the pipeline may skip the offending key and continue with the file.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::ParserNotFound { .. } | Error::Parse { .. } | Error::MissingCoBlock { .. }
        )
    }
}
