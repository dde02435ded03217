use crate::error::{Error, Result};
use crate::merge::collapse_whitespace;
use crate::traits::{CommandParser, ParseContext};
use chrono::NaiveDateTime;
use nodetrace_types::{Block, FieldValue, ParsedRecord};

pub const KEY: &str = "Card ROM Version";

const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// `romversion <card>`: a version line followed by a build timestamp line.
#[derive(Debug, Default)]
pub struct RomVersionParser;

impl CommandParser for RomVersionParser {
    fn key(&self) -> &'static str {
        KEY
    }

    fn parse_block(&self, block: &Block, _ctx: &ParseContext<'_>) -> Result<Vec<ParsedRecord>> {
        let Some(card) = block.command_tokens().nth(1) else {
            return Err(Error::parse(
                KEY,
                format!("'{}' names no card", block.command_line),
            ));
        };
        let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());
        let (Some(version), Some(timestamp)) = (lines.next(), lines.next()) else {
            return Ok(Vec::new());
        };

        let timestamp = collapse_whitespace(timestamp);
        let timestamp = match NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT) {
            Ok(dt) => FieldValue::DateTime(dt),
            Err(_) => FieldValue::Text(timestamp),
        };

        Ok(vec![
            ParsedRecord::new()
                .with("Card", card)
                .with("ROM Version", version)
                .with("Timestamp", timestamp),
        ])
    }
}
