use nodetrace_types::NodeId;
use rusqlite::{Connection, OptionalExtension, params};

use crate::{Result, records::NodeRecord};

/// Register a node; an existing node keeps its first ingestion time.
pub fn ensure(conn: &Connection, node: &NodeId, now: &str) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO nodes (node, first_ingested_at)
        VALUES (?1, ?2)
        ON CONFLICT(node) DO NOTHING
        "#,
        params![node.as_str(), now],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, node: &str) -> Result<Option<NodeRecord>> {
    let result = conn
        .query_row(
            r#"
        SELECT node, first_ingested_at
        FROM nodes
        WHERE node = ?1
        "#,
            [node],
            |row| {
                Ok(NodeRecord {
                    node: row.get(0)?,
                    first_ingested_at: row.get(1)?,
                })
            },
        )
        .optional()?;

    Ok(result)
}

pub fn list(conn: &Connection) -> Result<Vec<NodeRecord>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT node, first_ingested_at
        FROM nodes
        ORDER BY node
        "#,
    )?;

    let nodes = stmt
        .query_map([], |row| {
            Ok(NodeRecord {
                node: row.get(0)?,
                first_ingested_at: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(nodes)
}

/// Number of rows for `node` in a record table.
pub fn count_rows(conn: &Connection, table: &str, node: &str) -> Result<usize> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {} WHERE node = ?1", table),
        [node],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}
