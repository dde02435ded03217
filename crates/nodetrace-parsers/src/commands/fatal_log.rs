use crate::error::Result;
use crate::extract::{KeyValuePairs, SectionSplitter};
use crate::traits::{CommandParser, ParseContext};
use nodetrace_types::{Block, FieldValue, ParsedRecord};
use regex::Regex;
use std::sync::LazyLock;

pub const KEY: &str = "Fatal Log";

const FIELDS: &[&str] = &[
    "Date", "Time", "Card", "Slot", "Task", "Reason", "Error", "Version", "PC",
];

static RECORD_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(?:Fatal\s+)?[Rr]ecord\s*#\s*(\d+)").unwrap());

/// Fault records from `fatal show`, one per `Record #N` section.
#[derive(Debug)]
pub struct FatalLogParser {
    sections: SectionSplitter,
    fields: KeyValuePairs,
}

impl Default for FatalLogParser {
    fn default() -> Self {
        Self {
            sections: SectionSplitter::new(&RECORD_HEADER),
            fields: KeyValuePairs::colon().with_keywords(FIELDS),
        }
    }
}

impl CommandParser for FatalLogParser {
    fn key(&self) -> &'static str {
        KEY
    }

    fn parse_block(&self, block: &Block, _ctx: &ParseContext<'_>) -> Result<Vec<ParsedRecord>> {
        let mut records = Vec::new();
        for section in self.sections.split(&block.output) {
            let mut record = self.fields.extract(section.content);
            if record.is_empty() {
                continue;
            }
            let number = section.header(1).unwrap_or_default();
            let number = match number.parse::<i64>() {
                Ok(n) => FieldValue::Integer(n),
                Err(_) => FieldValue::text(number),
            };
            record.prepend("Record #", number);
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::parse_blocks;

    const OUTPUT: &str = "\
Fatal Record #1
  Date   : 03/20/2024
  Time   : 11:02:33
  Card   : MXK GPON-4 OLT
  Slot   : 3
  Task   : tNetTask
  Reason : Watchdog timeout
Fatal Record #2
  (record cleared)
Fatal Record #3
  Task   : tShell
  Error  : 0x0000000c
";

    #[test]
    fn test_records_numbered_and_empty_sections_dropped() {
        let records = parse_blocks(&FatalLogParser::default(), &[("fatal show", OUTPUT)]).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].keys().next(), Some("Record #"));
        assert_eq!(records[0].get("Record #"), Some(&FieldValue::Integer(1)));
        assert_eq!(records[0].get_str("Time"), Some("11:02:33"));
        assert_eq!(records[0].get_str("Reason"), Some("Watchdog timeout"));
        assert_eq!(records[1].get("Record #"), Some(&FieldValue::Integer(3)));
        assert_eq!(records[1].get_str("Error"), Some("0x0000000c"));
    }

    #[test]
    fn test_no_records() {
        let records =
            parse_blocks(&FatalLogParser::default(), &[("fatal show", "No fatal records\n")]).unwrap();
        assert!(records.is_empty());
    }
}
