//! Alarm and fault tables.

use nodetrace_types::{NodeId, ParsedRecord};
use rusqlite::{Connection, params};

use super::insert_unique;
use crate::Result;
use crate::fields::{optional_text, required_integer, text};

pub fn insert_alarm(conn: &Connection, node: &NodeId, record: &ParsedRecord) -> Result<()> {
    let resource_id = text(record, "ResourceId");
    let alarm_type = text(record, "AlarmType");

    insert_unique(
        conn,
        "alarms",
        || format!("{} {}", resource_id, alarm_type),
        r#"
        INSERT INTO alarms (node, resource_id, alarm_type, alarm_severity)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            node.as_str(),
            &resource_id,
            &alarm_type,
            optional_text(record, "AlarmSeverity"),
        ],
    )
}

pub fn insert_fatal_record(conn: &Connection, node: &NodeId, record: &ParsedRecord) -> Result<()> {
    let record_no = required_integer(record, "Record #")?;

    insert_unique(
        conn,
        "fatal_log",
        || format!("record #{}", record_no),
        r#"
        INSERT INTO fatal_log (node, record_no, date, time, card, slot, task, reason, error)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            node.as_str(),
            record_no,
            optional_text(record, "Date"),
            optional_text(record, "Time"),
            optional_text(record, "Card"),
            optional_text(record, "Slot"),
            optional_text(record, "Task"),
            optional_text(record, "Reason"),
            optional_text(record, "Error"),
        ],
    )
}
