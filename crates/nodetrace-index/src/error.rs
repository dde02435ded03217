use thiserror::Error;

/// Result type for nodetrace-index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the index layer
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed
    #[error("{}", describe_database_error(.0))]
    Database(#[from] rusqlite::Error),

    /// A record's natural key is already stored for this node
    #[error("duplicate {table} record for {key}")]
    DuplicateKey { table: &'static str, key: String },

    /// A field value could not be converted to its column type
    #[error("field '{field}' value '{value}' is not a valid {expected}")]
    Coercion {
        field: String,
        value: String,
        expected: &'static str,
    },

    /// Metrics payload could not be encoded
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Failures confined to a single record; sibling records still ingest.
    pub fn is_record_level(&self) -> bool {
        matches!(self, Error::DuplicateKey { .. } | Error::Coercion { .. })
    }
}

fn describe_database_error(err: &rusqlite::Error) -> String {
    let msg = err.to_string();
    // Detect schema mismatch errors and provide actionable hint
    if msg.contains("no such column") || msg.contains("no such table") {
        format!(
            "Database schema mismatch: {}. Please rerun to auto-migrate.",
            msg
        )
    } else {
        format!("Database error: {}", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_error_message() {
        let sqlite_err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            Some("no such column: slots_status".to_string()),
        );
        let msg = Error::Database(sqlite_err).to_string();

        assert!(msg.contains("Database schema mismatch"));
        assert!(msg.contains("auto-migrate"));
    }

    #[test]
    fn test_regular_database_error_message() {
        let sqlite_err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            Some("disk I/O error".to_string()),
        );
        let msg = Error::Database(sqlite_err).to_string();

        assert!(msg.starts_with("Database error:"));
        assert!(!msg.contains("auto-migrate"));
    }

    #[test]
    fn test_record_level_errors() {
        let dup = Error::DuplicateKey {
            table: "card_rom",
            key: "card 1".to_string(),
        };
        assert!(dup.is_record_level());
        assert!(!Error::Io(std::io::Error::other("gone")).is_record_level());
    }
}
