use rusqlite::Connection;

use crate::Result;

// Schema version (increment when changing table definitions)
pub const SCHEMA_VERSION: i32 = 3;

// Every record table carries `node` plus a UNIQUE natural key, so re-ingesting
// the same transcript inserts nothing new.

pub fn init_schema(conn: &Connection) -> Result<()> {
    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version != SCHEMA_VERSION {
        drop_all_tables(conn)?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS nodes (
            node TEXT PRIMARY KEY,
            first_ingested_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS slot_status (
            id INTEGER PRIMARY KEY,
            node TEXT NOT NULL REFERENCES nodes(node),
            component TEXT NOT NULL,
            shelf INTEGER NOT NULL,
            slot TEXT NOT NULL,
            type TEXT NOT NULL,
            card_version TEXT,
            serial_number TEXT,
            rom_version TEXT,
            software_version TEXT,
            state TEXT,
            mode TEXT,
            uptime TEXT,
            slots_status TEXT,
            chassis TEXT,
            UNIQUE (node, shelf, slot)
        );

        CREATE TABLE IF NOT EXISTS sfp_inventory (
            id INTEGER PRIMARY KEY,
            node TEXT NOT NULL REFERENCES nodes(node),
            interface TEXT NOT NULL,
            vendor_name TEXT,
            vendor_oui TEXT,
            vendor_part_number TEXT,
            vendor_revision_level TEXT,
            serial_number TEXT,
            manufacturing_date TEXT,
            connector_type TEXT,
            transceiver_type TEXT,
            fiber_link_length_km INTEGER,
            fiber_link_length_100m INTEGER,
            nominal_bit_rate_gbps INTEGER,
            UNIQUE (node, interface)
        );

        CREATE TABLE IF NOT EXISTS backplane_inventory (
            id INTEGER PRIMARY KEY,
            node TEXT NOT NULL REFERENCES nodes(node),
            eeprom_contents TEXT,
            eeprom_id TEXT,
            version TEXT,
            size INTEGER NOT NULL,
            card_type TEXT,
            card_version TEXT,
            serial_num TEXT NOT NULL,
            shelf_number TEXT,
            clei_code TEXT,
            cksum TEXT,
            feature_bits_modification_date TEXT,
            UNIQUE (node, serial_num)
        );

        CREATE TABLE IF NOT EXISTS card_rom (
            id INTEGER PRIMARY KEY,
            node TEXT NOT NULL REFERENCES nodes(node),
            card TEXT NOT NULL,
            rom_version TEXT NOT NULL,
            timestamp TEXT,
            UNIQUE (node, card)
        );

        CREATE TABLE IF NOT EXISTS card_stats (
            id INTEGER PRIMARY KEY,
            node TEXT NOT NULL REFERENCES nodes(node),
            slot TEXT NOT NULL,
            cpu_idle_percent INTEGER,
            cpu_usage_percent INTEGER,
            memory_utilization_percent REAL,
            memory_used_kb INTEGER,
            memory_peak_kb INTEGER,
            memory_available_kb INTEGER,
            status TEXT,
            uptime TEXT,
            software_version TEXT,
            UNIQUE (node, slot)
        );

        CREATE TABLE IF NOT EXISTS gpon_subport_stats (
            id INTEGER PRIMARY KEY,
            node TEXT NOT NULL REFERENCES nodes(node),
            slot TEXT NOT NULL,
            sub_port TEXT NOT NULL,
            metrics TEXT NOT NULL,
            UNIQUE (node, slot, sub_port)
        );

        CREATE TABLE IF NOT EXISTS line_status (
            id INTEGER PRIMARY KEY,
            node TEXT NOT NULL REFERENCES nodes(node),
            shelf INTEGER NOT NULL,
            slot TEXT NOT NULL,
            port TEXT NOT NULL,
            line_type TEXT NOT NULL,
            port_range TEXT NOT NULL,
            status TEXT,
            UNIQUE (node, shelf, slot, port, port_range)
        );

        CREATE TABLE IF NOT EXISTS alarms (
            id INTEGER PRIMARY KEY,
            node TEXT NOT NULL REFERENCES nodes(node),
            resource_id TEXT NOT NULL,
            alarm_type TEXT NOT NULL,
            alarm_severity TEXT,
            UNIQUE (node, resource_id, alarm_type)
        );

        CREATE TABLE IF NOT EXISTS fatal_log (
            id INTEGER PRIMARY KEY,
            node TEXT NOT NULL REFERENCES nodes(node),
            record_no INTEGER NOT NULL,
            date TEXT,
            time TEXT,
            card TEXT,
            slot TEXT,
            task TEXT,
            reason TEXT,
            error TEXT,
            UNIQUE (node, record_no)
        );

        CREATE INDEX IF NOT EXISTS idx_slot_status_node ON slot_status(node);
        CREATE INDEX IF NOT EXISTS idx_sfp_inventory_node ON sfp_inventory(node);
        "#,
    )?;

    conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;

    Ok(())
}

fn drop_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS fatal_log;
        DROP TABLE IF EXISTS alarms;
        DROP TABLE IF EXISTS line_status;
        DROP TABLE IF EXISTS gpon_subport_stats;
        DROP TABLE IF EXISTS card_stats;
        DROP TABLE IF EXISTS card_rom;
        DROP TABLE IF EXISTS backplane_inventory;
        DROP TABLE IF EXISTS sfp_inventory;
        DROP TABLE IF EXISTS slot_status;
        DROP TABLE IF EXISTS nodes;
        "#,
    )?;
    Ok(())
}
