use crate::error::Result;
use crate::extract::FixedColumns;
use crate::traits::{CommandParser, ParseContext};
use nodetrace_types::{Block, ParsedRecord};

pub const KEY: &str = "Alarms";

/// `alarm show` table; rows keyed by the table's own header tokens.
#[derive(Debug, Default)]
pub struct AlarmsParser {
    table: FixedColumns,
}

impl CommandParser for AlarmsParser {
    fn key(&self) -> &'static str {
        KEY
    }

    fn parse_block(&self, block: &Block, _ctx: &ParseContext<'_>) -> Result<Vec<ParsedRecord>> {
        Ok(self.table.extract(&block.output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::parse_blocks;

    #[test]
    fn test_alarm_rows() {
        let output = "\
************ Central Alarm Manager ************
ResourceId          AlarmType          AlarmSeverity
------------------- ------------------ -------------
1-3-1-0/gponolt     los                critical
1-a-4-0/eth         linkDown           major
";
        let records = parse_blocks(&AlarmsParser::default(), &[("alarm show", output)]).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get_str("ResourceId"), Some("1-3-1-0/gponolt"));
        assert_eq!(records[0].get_str("AlarmSeverity"), Some("critical"));
        assert_eq!(records[1].get_str("AlarmType"), Some("linkDown"));
    }

    #[test]
    fn test_no_table_is_empty_not_error() {
        let records =
            parse_blocks(&AlarmsParser::default(), &[("alarm show", "No alarms active\n")]).unwrap();
        assert!(records.is_empty());
    }
}
