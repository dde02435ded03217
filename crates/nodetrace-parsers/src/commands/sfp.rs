//! `sfp show <interface>` transceiver inventory.

use crate::error::Result;
use crate::extract::KeyValuePairs;
use crate::traits::{CommandParser, ParseContext};
use chrono::NaiveDate;
use nodetrace_types::{Block, FieldValue, ParsedRecord};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

pub const KEY: &str = "SFP Inventory";

const MANUFACTURING_DATE: &str = "Manufacturing Date";

const INTEGER_FIELDS: &[&str] = &[
    "Fiber Link Length (km)",
    "Fiber Link Length (100m)",
    "Nominal Bit Rate (Gbps)",
];

static INTERFACE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Interface\s+(\S+)").unwrap());

/// Reformat a device `ddmmyy` date.
pub fn parse_ddmmyy(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 6 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%d%m%y").ok()
}

#[derive(Debug)]
pub struct SfpParser {
    fields: KeyValuePairs,
}

impl Default for SfpParser {
    fn default() -> Self {
        Self {
            fields: KeyValuePairs::space_run(),
        }
    }
}

impl CommandParser for SfpParser {
    fn key(&self) -> &'static str {
        KEY
    }

    fn parse_block(&self, block: &Block, _ctx: &ParseContext<'_>) -> Result<Vec<ParsedRecord>> {
        let mut lines = block.lines().skip_while(|l| l.trim().is_empty());
        let first = lines.next().unwrap_or_default();
        let Some(caps) = INTERFACE_LINE.captures(first) else {
            warn!(
                key = KEY,
                command = %block.command_line,
                line = %first.trim(),
                "no interface line, dropping block"
            );
            return Ok(Vec::new());
        };
        let interface = caps[1].to_string();

        let rest: Vec<&str> = lines.collect();
        let mut record = self.fields.extract(&rest.join("\n"));
        record.prepend("Interface", interface.as_str());

        if let Some(raw) = record.get_str(MANUFACTURING_DATE).map(str::to_string) {
            match parse_ddmmyy(&raw) {
                Some(date) => record.insert(MANUFACTURING_DATE, date),
                None => {
                    warn!(
                        key = KEY,
                        interface = %interface,
                        value = %raw,
                        "unparseable manufacturing date, dropping record"
                    );
                    return Ok(Vec::new());
                }
            }
        }

        for name in INTEGER_FIELDS {
            if let Some(n) = record.get(name).and_then(FieldValue::as_i64) {
                record.insert(*name, n);
            }
        }

        Ok(vec![record])
    }
}
