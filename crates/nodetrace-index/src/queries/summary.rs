//! Per-node overview report ("OLT info").

use rusqlite::Connection;

use crate::Result;
use crate::records::SummaryRow;

pub fn node_summary(conn: &Connection, node: &str) -> Result<Vec<SummaryRow>> {
    let chassis = distinct_values(conn, "chassis", node)?;
    let software = distinct_values(conn, "software_version", node)?;
    let rom = distinct_values(conn, "rom_version", node)?;

    let active_cards = grouped_counts(
        conn,
        r#"
        SELECT type, COUNT(*)
        FROM slot_status
        WHERE node = ?1
        GROUP BY type
        ORDER BY MIN(id)
        "#,
        node,
    )?
    .into_iter()
    .map(|(card_type, count)| format!("{} ({})", card_type, count))
    .collect::<Vec<_>>();

    let offline_cards: i64 = conn.query_row(
        r#"
        SELECT COUNT(*)
        FROM slot_status
        WHERE node = ?1 AND LOWER(mode) = 'non-functional'
        "#,
        [node],
        |row| row.get(0),
    )?;

    let sfp_types = grouped_counts(
        conn,
        r#"
        SELECT COALESCE(vendor_name, ''), COUNT(*)
        FROM sfp_inventory
        WHERE node = ?1
        GROUP BY vendor_name
        ORDER BY MIN(id)
        "#,
        node,
    )?
    .into_iter()
    .map(|(vendor, count)| format!("{} X {}", vendor, count))
    .collect::<Vec<_>>();

    Ok(vec![
        SummaryRow::new("Chassis Type", chassis.join(", ")),
        SummaryRow::new("Software Version", software.join(", ")),
        SummaryRow::new("ROM Version", rom.join(", ")),
        SummaryRow::new("# Active Cards", active_cards.join(", ")),
        SummaryRow::new("# Offline Cards", offline_cards.to_string()),
        SummaryRow::new("SFP Types", sfp_types.join(", ")),
        SummaryRow::new("System Uptime", system_uptime(conn, node)?),
    ])
}

/// Non-empty values of a `slot_status` column, in first-ingested order.
fn distinct_values(conn: &Connection, column: &str, node: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!(
        r#"
        SELECT {column}
        FROM slot_status
        WHERE node = ?1 AND {column} IS NOT NULL AND {column} != ''
        GROUP BY {column}
        ORDER BY MIN(id)
        "#
    ))?;

    let values = stmt
        .query_map([node], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, rusqlite::Error>>()?;
    Ok(values)
}

fn grouped_counts(conn: &Connection, sql: &str, node: &str) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([node], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows)
}

/// Uptime of the management card (slot `m1`, `m2`, ...), the closest thing
/// to a chassis uptime the transcripts carry.
fn system_uptime(conn: &Connection, node: &str) -> Result<String> {
    let mut stmt = conn.prepare(
        r#"
        SELECT uptime
        FROM slot_status
        WHERE node = ?1 AND slot LIKE 'm%' AND uptime IS NOT NULL
        ORDER BY slot
        LIMIT 1
        "#,
    )?;
    let mut rows = stmt.query([node])?;
    match rows.next()? {
        Some(row) => Ok(row.get(0)?),
        None => Ok(String::new()),
    }
}
