use crate::error::Result;
use crate::extract::KeyValuePairs;
use crate::traits::{CommandParser, ParseContext};
use nodetrace_types::{Block, ParsedRecord};

pub const KEY: &str = "HW Inventory Backplane";

/// Full `shelfctrl eeprom show` dump, one record per block.
#[derive(Debug)]
pub struct BackplaneParser {
    fields: KeyValuePairs,
}

impl Default for BackplaneParser {
    fn default() -> Self {
        Self {
            fields: KeyValuePairs::colon(),
        }
    }
}

impl CommandParser for BackplaneParser {
    fn key(&self) -> &'static str {
        KEY
    }

    fn parse_block(&self, block: &Block, _ctx: &ParseContext<'_>) -> Result<Vec<ParsedRecord>> {
        let record = self.fields.extract(&block.output);
        if record.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![record])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::parse_blocks;

    #[test]
    fn test_full_dump() {
        let output = "\
EEPROM contents : for slot 0
EEPROM_ID       : 06 -- BACKPLANE
Size            : 054
SerialNum       : 12822670
Feature bits modification date: 0/0/2000 00:00:00
";
        let records =
            parse_blocks(&BackplaneParser::default(), &[("shelfctrl eeprom show 0", output)]).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), 5);
        assert_eq!(records[0].get_str("EEPROM_ID"), Some("06 -- BACKPLANE"));
        assert_eq!(
            records[0].get_str("Feature bits modification date"),
            Some("0/0/2000 00:00:00")
        );
    }
}
