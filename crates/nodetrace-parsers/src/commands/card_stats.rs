use crate::error::Result;
use crate::traits::{CommandParser, ParseContext};
use nodetrace_types::{Block, FieldValue, ParsedRecord};
use regex::Regex;
use std::sync::LazyLock;

pub const KEY: &str = "Card Stats";

/// Heading lines at the top of every `card stats` block.
const HEADER_LINES: usize = 4;

static CARD_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(\S+)\s+(\d+)\s+(\d+)\s+([\d.]+)\s+(\d+)\s+(\d+)\s+(\d+)\s+(\S+)\s+(\S+)\s+(.+?)\s*$",
    )
    .unwrap()
});

#[derive(Clone, Copy)]
enum Column {
    Text,
    Integer,
    Float,
}

const COLUMNS: &[(&str, Column)] = &[
    ("Slot", Column::Text),
    ("CPU Idle %", Column::Integer),
    ("CPU Usage %", Column::Integer),
    ("Memory Util %", Column::Float),
    ("Memory Used KB", Column::Integer),
    ("Memory Peak KB", Column::Integer),
    ("Memory Avail KB", Column::Integer),
    ("Status", Column::Text),
    ("Uptime", Column::Text),
    ("Software Version", Column::Text),
];

/// Per-card CPU, memory and uptime from `card stats`.
#[derive(Debug, Default)]
pub struct CardStatsParser;

impl CommandParser for CardStatsParser {
    fn key(&self) -> &'static str {
        KEY
    }

    fn parse_block(&self, block: &Block, _ctx: &ParseContext<'_>) -> Result<Vec<ParsedRecord>> {
        let records = block
            .lines()
            .skip(HEADER_LINES)
            .filter_map(|line| CARD_ROW.captures(line))
            .map(|caps| {
                let mut record = ParsedRecord::new();
                for (i, (name, column)) in COLUMNS.iter().enumerate() {
                    let raw = caps.get(i + 1).map_or("", |m| m.as_str());
                    record.insert(*name, typed(raw, *column));
                }
                record
            })
            .collect();
        Ok(records)
    }
}

fn typed(raw: &str, column: Column) -> FieldValue {
    let parsed = match column {
        Column::Text => None,
        Column::Integer => raw.parse::<i64>().ok().map(FieldValue::Integer),
        Column::Float => raw.parse::<f64>().ok().map(FieldValue::Float),
    };
    parsed.unwrap_or_else(|| FieldValue::text(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::parse_blocks;

    const OUTPUT: &str = "\
                                             -------------- Memory (KB) -------------
          cpu %   cpu %   Memory
Slot      idle    usage   util%    used      peak      avail     Status   uptime       Software version
----      -----   -----   ------   -------   -------   -------   ------   ----------   ----------------
1         97      3       18.1     187536    189240    849576    OK       3:16:14:02   MXK 3.4.2.272
a         88      12      31.40    324112    330772    707000    OK       3:16:13:40   MXK 3.4.2.272
";

    #[test]
    fn test_positional_rows() {
        let records = parse_blocks(&CardStatsParser, &[("card stats", OUTPUT)]).unwrap();

        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert_eq!(first.get_str("Slot"), Some("1"));
        assert_eq!(first.get("CPU Idle %"), Some(&FieldValue::Integer(97)));
        assert_eq!(first.get("Memory Util %"), Some(&FieldValue::Float(18.1)));
        assert_eq!(first.get("Memory Avail KB"), Some(&FieldValue::Integer(849576)));
        assert_eq!(first.get_str("Uptime"), Some("3:16:14:02"));
        assert_eq!(first.get_str("Software Version"), Some("MXK 3.4.2.272"));
        assert_eq!(records[1].get_str("Slot"), Some("a"));
    }

    #[test]
    fn test_header_lines_skipped_by_position() {
        // A data-looking row inside the heading area is still skipped.
        let output = "x 1 1 1 1 1 1 OK 1 v\n\n\n\n2 50 50 1.0 1 2 3 OK 0:00:01:00 MXK 3\n";
        let records = parse_blocks(&CardStatsParser, &[("card stats", output)]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_str("Slot"), Some("2"));
    }
}
