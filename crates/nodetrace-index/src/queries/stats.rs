//! Runtime statistics tables: card resources, GPON counters, line status.

use nodetrace_types::{FieldValue, NodeId, ParsedRecord};
use rusqlite::{Connection, params};
use serde_json::{Map, Value};

use super::insert_unique;
use crate::Result;
use crate::fields::{float, integer, optional_text, required_integer, text};

pub fn insert_card_stats(conn: &Connection, node: &NodeId, record: &ParsedRecord) -> Result<()> {
    let slot = text(record, "Slot");

    insert_unique(
        conn,
        "card_stats",
        || format!("slot {}", slot),
        r#"
        INSERT INTO card_stats (node, slot, cpu_idle_percent, cpu_usage_percent,
                                memory_utilization_percent, memory_used_kb, memory_peak_kb,
                                memory_available_kb, status, uptime, software_version)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            node.as_str(),
            &slot,
            integer(record, "CPU Idle %")?,
            integer(record, "CPU Usage %")?,
            float(record, "Memory Util %")?,
            integer(record, "Memory Used KB")?,
            integer(record, "Memory Peak KB")?,
            integer(record, "Memory Avail KB")?,
            optional_text(record, "Status"),
            optional_text(record, "Uptime"),
            optional_text(record, "Software Version"),
        ],
    )
}

/// Subport counters are stored as one JSON object, since the metric set
/// varies between firmware releases.
pub fn insert_gpon_subport(conn: &Connection, node: &NodeId, record: &ParsedRecord) -> Result<()> {
    let slot = text(record, "Slot");
    let sub_port = text(record, "Sub Port");

    let mut metrics = Map::new();
    for (name, value) in record.iter() {
        if name == "Slot" || name == "Sub Port" {
            continue;
        }
        let value = match value {
            FieldValue::Integer(n) => Value::from(*n),
            other => Value::from(other.to_string()),
        };
        metrics.insert(name.to_string(), value);
    }
    let metrics = serde_json::to_string(&metrics)?;

    insert_unique(
        conn,
        "gpon_subport_stats",
        || format!("slot {} {}", slot, sub_port),
        r#"
        INSERT INTO gpon_subport_stats (node, slot, sub_port, metrics)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![node.as_str(), &slot, &sub_port, metrics],
    )
}

pub fn insert_line_status(conn: &Connection, node: &NodeId, record: &ParsedRecord) -> Result<()> {
    let shelf = required_integer(record, "Shelf")?;
    let slot = text(record, "Slot");
    let port = text(record, "Port");
    let port_range = text(record, "Port Range");

    insert_unique(
        conn,
        "line_status",
        || format!("{}/{}/{} ports {}", shelf, slot, port, port_range),
        r#"
        INSERT INTO line_status (node, shelf, slot, port, line_type, port_range, status)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            node.as_str(),
            shelf,
            &slot,
            &port,
            text(record, "Line Type"),
            &port_range,
            optional_text(record, "Status"),
        ],
    )
}
