//! Command parsers, one per canonical command key.

pub mod alarms;
pub mod backplane;
pub mod card_stats;
pub mod fatal_log;
pub mod gpon_stats;
pub mod line_status;
pub mod rom_version;
pub mod sfp;
pub mod slot_status;

pub use alarms::AlarmsParser;
pub use backplane::BackplaneParser;
pub use card_stats::CardStatsParser;
pub use fatal_log::FatalLogParser;
pub use gpon_stats::GponStatsParser;
pub use line_status::LineStatusParser;
pub use rom_version::RomVersionParser;
pub use sfp::SfpParser;
pub use slot_status::SlotStatusParser;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::error::Result;
    use crate::traits::CommandParser;
    use nodetrace_types::{Block, CommandBlocks, ParsedRecord};

    /// Run `parser` over blocks built from `(command_line, output)` pairs, merged.
    pub fn parse_blocks(
        parser: &dyn CommandParser,
        blocks: &[(&str, &str)],
    ) -> Result<Vec<ParsedRecord>> {
        let blocks: CommandBlocks = blocks
            .iter()
            .map(|(command, output)| Block::with_output(*command, *output))
            .collect();
        Ok(parser.parse(&blocks, true)?.into_records())
    }
}
