//! `showline` output: one section per shelf/slot[/port], one row per port range.
//!
//! ```text
//! shelf = 1, slot = 3, line type = GPONOLT
//! port       status
//! ---------- --------------
//! 1-4        ACTV
//! ```

use crate::error::Result;
use crate::extract::{SectionSplitter, is_dashed};
use crate::traits::{CommandParser, ParseContext};
use nodetrace_types::{Block, ParsedRecord};
use regex::Regex;
use std::sync::LazyLock;

pub const KEY: &str = "Line Status";

static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"shelf = (\d+),\s*slot = (\w+)(?:,\s*port = (\d+))?,\s*line type = (\w+)")
        .unwrap()
});

static PORT_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+-\d+|\d+)\s+(.+)$").unwrap());

#[derive(Debug)]
pub struct LineStatusParser {
    sections: SectionSplitter,
}

impl Default for LineStatusParser {
    fn default() -> Self {
        Self {
            sections: SectionSplitter::new(&SECTION_HEADER),
        }
    }
}

impl CommandParser for LineStatusParser {
    fn key(&self) -> &'static str {
        KEY
    }

    fn parse_block(&self, block: &Block, _ctx: &ParseContext<'_>) -> Result<Vec<ParsedRecord>> {
        let mut records = Vec::new();

        for section in self.sections.split(&block.output) {
            let shelf = section.header(1).unwrap_or_default();
            let slot = section.header(2).unwrap_or_default();
            let port = section.header(3).unwrap_or_default();
            let line_type = section.header(4).unwrap_or_default();

            // Column headings never start with a port number, so the row
            // pattern alone separates them from data.
            for line in section.content.lines().map(str::trim) {
                if line.is_empty() || is_dashed(line) {
                    continue;
                }
                if let Some(caps) = PORT_ROW.captures(line) {
                    records.push(
                        ParsedRecord::new()
                            .with("Shelf", shelf)
                            .with("Slot", slot)
                            .with("Port", port)
                            .with("Line Type", line_type)
                            .with("Port Range", &caps[1])
                            .with("Status", &caps[2]),
                    );
                }
            }
        }

        Ok(records)
    }
}
