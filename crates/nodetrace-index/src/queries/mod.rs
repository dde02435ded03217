pub mod events;
pub mod inventory;
pub mod nodes;
pub mod stats;
pub mod summary;

use rusqlite::{Connection, ErrorCode, Params, ffi};

use crate::{Error, Result};

/// Run one INSERT, reporting a natural-key collision as `DuplicateKey`.
pub(crate) fn insert_unique<P: Params>(
    conn: &Connection,
    table: &'static str,
    key: impl FnOnce() -> String,
    sql: &str,
    params: P,
) -> Result<()> {
    match conn.execute(sql, params) {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::ConstraintViolation
                && err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(Error::DuplicateKey { table, key: key() })
        }
        Err(err) => Err(err.into()),
    }
}
