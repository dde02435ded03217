use chrono::Utc;
use nodetrace_types::{NodeId, ParsedRecord};
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, warn};

use crate::ingest::IngestionRegistry;
use crate::queries::{nodes, summary};
use crate::records::{IngestReport, NodeRecord, SummaryRow};
use crate::{Error, Result, schema};

pub struct Database {
    conn: Connection,
    mappers: IngestionRegistry,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        schema::init_schema(&conn)?;
        Ok(Self {
            conn,
            mappers: IngestionRegistry::builtin(),
        })
    }

    /// Store the records of one canonical key for `node`.
    ///
    /// Each record runs in its own savepoint: a duplicate natural key or a bad
    /// field value rolls back that record only and is counted in the report.
    /// Any other error aborts the key and is returned. Keys with no mapper are
    /// skipped.
    pub fn ingest(
        &mut self,
        node: &NodeId,
        key: &str,
        records: &[ParsedRecord],
    ) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        let Some(insert) = self.mappers.get(key) else {
            debug!(key = %key, node = %node, "no ingestion mapping, skipping");
            return Ok(report);
        };

        nodes::ensure(&self.conn, node, &Utc::now().to_rfc3339())?;

        for record in records {
            let sp = self.conn.savepoint()?;
            match insert(&sp, node, record) {
                Ok(()) => {
                    sp.commit()?;
                    report.inserted += 1;
                }
                Err(err @ Error::DuplicateKey { .. }) => {
                    warn!(key = %key, node = %node, error = %err, "record already ingested");
                    report.duplicates += 1;
                }
                Err(err) if err.is_record_level() => {
                    warn!(key = %key, node = %node, error = %err, "record rejected");
                    report.failed += 1;
                }
                Err(err) => return Err(err),
            }
        }

        debug!(
            key = %key,
            node = %node,
            inserted = report.inserted,
            duplicates = report.duplicates,
            failed = report.failed,
            "ingested records"
        );
        Ok(report)
    }

    pub fn get_node(&self, node: &str) -> Result<Option<NodeRecord>> {
        nodes::get(&self.conn, node)
    }

    pub fn list_nodes(&self) -> Result<Vec<NodeRecord>> {
        nodes::list(&self.conn)
    }

    pub fn count_rows(&self, table: &str, node: &str) -> Result<usize> {
        nodes::count_rows(&self.conn, table, node)
    }

    pub fn node_summary(&self, node: &str) -> Result<Vec<SummaryRow>> {
        summary::node_summary(&self.conn, node)
    }
}
