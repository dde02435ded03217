//! `slots <id>` card details, cross-referenced with the bare `slots` summary.
//!
//! The summary names the chassis, groups cards under component headings and
//! carries each card's run status:
//!
//! ```text
//! MXK 1419
//! Cards
//!  1: MXK GPON-4 OLT (RUNNING)
//!  a:*MXK 8X10G UPLINK (RUNNING+TRAFFIC)
//! ```

use crate::error::{Error, Result};
use crate::extract::KeyValuePairs;
use crate::traits::{CommandParser, ParseContext};
use nodetrace_types::{Block, ParsedRecord};
use regex::Regex;
use std::sync::LazyLock;

pub const KEY: &str = "Slot Status";

/// Command line of the summary co-block.
pub const SUMMARY_COMMAND: &str = "slots";

const DETAIL_FIELDS: &[&str] = &[
    "Shelf",
    "Slot",
    "Type",
    "Card Version",
    "Serial #",
    "ROM Version",
    "Software Version",
    "State",
    "Mode",
    "Uptime",
];

static SUMMARY_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\w+):\s*\*?(.+?)\s*\((.+)\)\s*$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
struct SummaryEntry {
    component: String,
    slot: String,
    card_type: String,
    status: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct SlotSummary {
    chassis: String,
    entries: Vec<SummaryEntry>,
}

impl SlotSummary {
    fn parse(output: &str) -> Self {
        let mut summary = SlotSummary::default();
        let mut component = String::new();

        for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if summary.chassis.is_empty() {
                summary.chassis = line.to_string();
                continue;
            }
            if let Some(caps) = SUMMARY_ENTRY.captures(line) {
                summary.entries.push(SummaryEntry {
                    component: component.clone(),
                    slot: caps[1].to_string(),
                    card_type: caps[2].to_string(),
                    status: caps[3].to_string(),
                });
            } else if !line.contains(':') {
                component = line.to_string();
            }
        }

        summary
    }

    /// Entry for a card type; when several slots share the type, the one at
    /// `slot` wins.
    fn find(&self, card_type: &str, slot: &str) -> Option<&SummaryEntry> {
        let mut candidates = self
            .entries
            .iter()
            .filter(|e| same_card_type(&e.card_type, card_type));
        let first = candidates.next()?;
        if first.slot == slot {
            return Some(first);
        }
        Some(candidates.find(|e| e.slot == slot).unwrap_or(first))
    }
}

/// The detail view may append a description after a comma
/// (`MXK-MC-TOP, 14U MGMT W/ TOP`); the summary may print either form.
fn same_card_type(summary_type: &str, detail_type: &str) -> bool {
    let summary_type = summary_type.trim().to_lowercase();
    let detail_type = detail_type.trim().to_lowercase();
    let detail_head = detail_type.split(',').next().unwrap_or_default().trim();
    summary_type == detail_type || summary_type == detail_head
}

#[derive(Debug)]
pub struct SlotStatusParser {
    details: KeyValuePairs,
}

impl Default for SlotStatusParser {
    fn default() -> Self {
        Self {
            details: KeyValuePairs::colon().with_keywords(DETAIL_FIELDS),
        }
    }
}

impl CommandParser for SlotStatusParser {
    fn key(&self) -> &'static str {
        KEY
    }

    fn co_blocks(&self) -> &'static [&'static str] {
        &[SUMMARY_COMMAND]
    }

    fn parse_block(&self, block: &Block, ctx: &ParseContext<'_>) -> Result<Vec<ParsedRecord>> {
        let summary = SlotSummary::parse(&ctx.companion(SUMMARY_COMMAND)?.output);

        let mut record = self.details.extract(&block.output);
        let card_type = match record.get_str("Type") {
            Some(t) => t.trim_start_matches('*').trim().to_string(),
            None => {
                return Err(Error::parse(
                    KEY,
                    format!("'{}' output has no Type field", block.command_line),
                ));
            }
        };
        let Some(slot) = record.get_str("Slot").map(str::to_string) else {
            return Err(Error::parse(
                KEY,
                format!("'{}' output has no Slot field", block.command_line),
            ));
        };
        record.insert("Type", card_type.as_str());

        let (component, status) = match summary.find(&card_type, &slot) {
            Some(entry) => (entry.component.as_str(), entry.status.as_str()),
            None => ("", ""),
        };
        record.prepend("Component", component);
        record.insert("Slots Status", status);
        record.insert("Chassis", summary.chassis.as_str());

        Ok(vec![record])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::parse_blocks;

    const SUMMARY: &str = "\
MXK 1419
Cards
  1: MXK GPON-4 OLT (RUNNING)
  2: MXK GPON-4 OLT (NOT PROV)
 m1:*MXK-MC-TOP (RUNNING)
Uplinks
  a:*MXK 8X10G UPLINK (RUNNING+TRAFFIC)
";

    const SLOT_2: &str = "\
MXK 1419
Type            : MXK GPON-4 OLT
Card Version    : 800-02589-02-A
EEPROM Version  : 1
Serial #        : 14311457
Shelf           : 1
Slot            : 2
ROM Version     : MXK 3.4.2.144.007
Software Version: MXK 3.4.2.272
State           : RUNNING
Mode            : FUNCTIONAL
Heartbeat last  : FRI MAR 22 09:19:01 2024
Uptime          : 3 days, 16 hours, 14 minutes
";

    const SLOT_M1: &str = "\
Type            :*MXK-MC-TOP, 14U MGMT W/ TOP
Shelf           : 1
Slot            : m1
Mode            : FUNCTIONAL
";

    #[test]
    fn test_detail_block_is_enriched_from_summary() {
        let records = parse_blocks(
            &SlotStatusParser::default(),
            &[("slots", SUMMARY), ("slots 2", SLOT_2)],
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.keys().next(), Some("Component"));
        assert_eq!(record.get_str("Component"), Some("Cards"));
        assert_eq!(record.get_str("Slots Status"), Some("NOT PROV"));
        assert_eq!(record.get_str("Chassis"), Some("MXK 1419"));
        assert_eq!(record.get_str("Type"), Some("MXK GPON-4 OLT"));
        assert_eq!(record.get_str("Uptime"), Some("3 days, 16 hours, 14 minutes"));
        assert!(!record.contains_key("Heartbeat last"));
    }

    #[test]
    fn test_type_is_stripped_and_matched_on_leading_part() {
        let records = parse_blocks(
            &SlotStatusParser::default(),
            &[("slots m1", SLOT_M1), ("slots", SUMMARY)],
        )
        .unwrap();

        assert_eq!(records[0].get_str("Type"), Some("MXK-MC-TOP, 14U MGMT W/ TOP"));
        assert_eq!(records[0].get_str("Component"), Some("Cards"));
        assert_eq!(records[0].get_str("Slots Status"), Some("RUNNING"));
    }

    #[test]
    fn test_summary_block_emits_no_records() {
        let records =
            parse_blocks(&SlotStatusParser::default(), &[("slots", SUMMARY)]).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_summary_is_recoverable() {
        let err = parse_blocks(&SlotStatusParser::default(), &[("slots 2", SLOT_2)]).unwrap_err();
        assert!(matches!(err, Error::MissingCoBlock { ref command, .. } if command == "slots"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_missing_slot_field_is_parse_error() {
        let err = parse_blocks(
            &SlotStatusParser::default(),
            &[("slots", SUMMARY), ("slots 7", "Type : MXK GPON-4 OLT\n")],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_unknown_card_type_leaves_summary_fields_empty() {
        let records = parse_blocks(
            &SlotStatusParser::default(),
            &[("slots", SUMMARY), ("slots 9", "Type : MXK ADSL-48\nSlot : 9\n")],
        )
        .unwrap();
        assert_eq!(records[0].get_str("Component"), Some(""));
        assert_eq!(records[0].get_str("Slots Status"), Some(""));
        assert_eq!(records[0].get_str("Chassis"), Some("MXK 1419"));
    }

    #[test]
    fn test_summary_parse() {
        let summary = SlotSummary::parse(SUMMARY);
        assert_eq!(summary.chassis, "MXK 1419");
        assert_eq!(summary.entries.len(), 4);
        assert_eq!(summary.entries[3].component, "Uplinks");
        assert_eq!(summary.entries[3].card_type, "MXK 8X10G UPLINK");
        assert_eq!(summary.entries[3].status, "RUNNING+TRAFFIC");
    }
}
