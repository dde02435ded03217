//! Canonical command key -> table mapper.

use nodetrace_parsers::commands::{
    alarms, backplane, card_stats, fatal_log, gpon_stats, line_status, rom_version, sfp,
    slot_status,
};
use nodetrace_types::{NodeId, ParsedRecord};
use rusqlite::Connection;

use crate::Result;
use crate::queries::{events, inventory, stats};

/// Stores one parsed record for a node. Must either insert the whole record
/// or return an error.
pub type IngestFn = fn(&Connection, &NodeId, &ParsedRecord) -> Result<()>;

const BUILTIN_MAPPERS: &[(&str, IngestFn)] = &[
    (slot_status::KEY, inventory::insert_slot_status),
    (sfp::KEY, inventory::insert_sfp),
    (backplane::KEY, inventory::insert_backplane),
    (rom_version::KEY, inventory::insert_card_rom),
    (card_stats::KEY, stats::insert_card_stats),
    (gpon_stats::KEY, stats::insert_gpon_subport),
    (line_status::KEY, stats::insert_line_status),
    (alarms::KEY, events::insert_alarm),
    (fatal_log::KEY, events::insert_fatal_record),
];

/// Read-only after construction.
#[derive(Debug, Clone)]
pub struct IngestionRegistry {
    entries: Vec<(&'static str, IngestFn)>,
}

impl IngestionRegistry {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_MAPPERS.to_vec(),
        }
    }

    pub fn get(&self, key: &str) -> Option<IngestFn> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, ingest)| *ingest)
    }
}
