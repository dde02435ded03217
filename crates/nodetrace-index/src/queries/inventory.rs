//! Hardware inventory tables: cards, optics, backplane, boot ROM.

use nodetrace_types::{NodeId, ParsedRecord};
use rusqlite::{Connection, params};

use super::insert_unique;
use crate::Result;
use crate::fields::{integer, optional_text, required_integer, text};

pub fn insert_slot_status(conn: &Connection, node: &NodeId, record: &ParsedRecord) -> Result<()> {
    let shelf = required_integer(record, "Shelf")?;
    let slot = text(record, "Slot");

    insert_unique(
        conn,
        "slot_status",
        || format!("shelf {} slot {}", shelf, slot),
        r#"
        INSERT INTO slot_status (node, component, shelf, slot, type, card_version, serial_number,
                                 rom_version, software_version, state, mode, uptime, slots_status, chassis)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        "#,
        params![
            node.as_str(),
            text(record, "Component"),
            shelf,
            &slot,
            text(record, "Type"),
            optional_text(record, "Card Version"),
            optional_text(record, "Serial #"),
            optional_text(record, "ROM Version"),
            optional_text(record, "Software Version"),
            optional_text(record, "State"),
            optional_text(record, "Mode"),
            optional_text(record, "Uptime"),
            optional_text(record, "Slots Status"),
            optional_text(record, "Chassis"),
        ],
    )
}

pub fn insert_sfp(conn: &Connection, node: &NodeId, record: &ParsedRecord) -> Result<()> {
    let interface = text(record, "Interface");

    insert_unique(
        conn,
        "sfp_inventory",
        || format!("interface {}", interface),
        r#"
        INSERT INTO sfp_inventory (node, interface, vendor_name, vendor_oui, vendor_part_number,
                                   vendor_revision_level, serial_number, manufacturing_date,
                                   connector_type, transceiver_type, fiber_link_length_km,
                                   fiber_link_length_100m, nominal_bit_rate_gbps)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
        params![
            node.as_str(),
            &interface,
            optional_text(record, "Vendor Name"),
            optional_text(record, "Vendor OUI"),
            optional_text(record, "Vendor Part Number"),
            optional_text(record, "Vendor Revision Level"),
            optional_text(record, "Serial Number"),
            optional_text(record, "Manufacturing Date"),
            optional_text(record, "Connector Type"),
            optional_text(record, "Transceiver Type"),
            integer(record, "Fiber Link Length (km)")?,
            integer(record, "Fiber Link Length (100m)")?,
            integer(record, "Nominal Bit Rate (Gbps)")?,
        ],
    )
}

pub fn insert_backplane(conn: &Connection, node: &NodeId, record: &ParsedRecord) -> Result<()> {
    let serial = text(record, "SerialNum");
    let size = integer(record, "Size")?.unwrap_or(0);

    insert_unique(
        conn,
        "backplane_inventory",
        || format!("serial {}", serial),
        r#"
        INSERT INTO backplane_inventory (node, eeprom_contents, eeprom_id, version, size, card_type,
                                         card_version, serial_num, shelf_number, clei_code, cksum,
                                         feature_bits_modification_date)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            node.as_str(),
            text(record, "EEPROM contents"),
            text(record, "EEPROM_ID"),
            text(record, "Version"),
            size,
            text(record, "CardType"),
            text(record, "CardVersion"),
            &serial,
            text(record, "ShelfNumber"),
            text(record, "CLEI Code"),
            text(record, "Cksum"),
            text(record, "Feature bits modification date"),
        ],
    )
}

pub fn insert_card_rom(conn: &Connection, node: &NodeId, record: &ParsedRecord) -> Result<()> {
    let card = text(record, "Card");

    insert_unique(
        conn,
        "card_rom",
        || format!("card {}", card),
        r#"
        INSERT INTO card_rom (node, card, rom_version, timestamp)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            node.as_str(),
            &card,
            text(record, "ROM Version"),
            optional_text(record, "Timestamp"),
        ],
    )
}
