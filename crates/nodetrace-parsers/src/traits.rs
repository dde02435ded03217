use crate::error::{Error, Result};
use crate::merge::normalize_record;
use nodetrace_types::{Block, CommandBlocks, ParseOutput, ParsedRecord};
use tracing::debug;

/// Parsing strategy for one canonical command key.
///
/// Responsibilities:
/// - Declare the canonical key it handles
/// - Declare companion command lines it reads but does not emit records for
/// - Turn one block of device output into zero or more records
///
/// Implementations are stateless; one instance may parse any number of
/// transcripts.
pub trait CommandParser: Send + Sync {
    /// Canonical key this parser is registered under (e.g. "Slot Status")
    fn key(&self) -> &'static str;

    /// Command lines of this key that are required context rather than
    /// record sources. Absent co-blocks fail the whole key.
    fn co_blocks(&self) -> &'static [&'static str] {
        &[]
    }

    /// Parse a single block. Structural violations return `Error::Parse`.
    fn parse_block(&self, block: &Block, ctx: &ParseContext<'_>) -> Result<Vec<ParsedRecord>>;

    /// Parse every record-bearing block of this key.
    ///
    /// With `merge`, records of all command lines are concatenated in block
    /// order; otherwise they stay keyed by command line.
    fn parse(&self, blocks: &CommandBlocks, merge: bool) -> Result<ParseOutput> {
        let ctx = ParseContext::split(self.key(), self.co_blocks(), blocks)?;

        let mut keyed = Vec::with_capacity(ctx.primary.len());
        for block in &ctx.primary {
            let records: Vec<ParsedRecord> = self
                .parse_block(block, &ctx)?
                .into_iter()
                .map(normalize_record)
                .collect();
            debug!(
                key = self.key(),
                command = %block.command_line,
                records = records.len(),
                "parsed block"
            );
            keyed.push((block.command_line.clone(), records));
        }

        if merge {
            Ok(ParseOutput::Merged(crate::merge::merge(keyed)))
        } else {
            Ok(ParseOutput::Keyed(keyed))
        }
    }
}

/// Read-only view of a key's blocks, partitioned into record sources and
/// declared companions. The underlying `CommandBlocks` is never modified.
#[derive(Debug)]
pub struct ParseContext<'a> {
    key: &'static str,
    primary: Vec<&'a Block>,
    companions: Vec<&'a Block>,
}

impl<'a> ParseContext<'a> {
    pub fn split(
        key: &'static str,
        co_blocks: &[&str],
        blocks: &'a CommandBlocks,
    ) -> Result<Self> {
        let mut companions = Vec::with_capacity(co_blocks.len());
        for command in co_blocks {
            match blocks.get(command) {
                Some(block) => companions.push(block),
                None => {
                    return Err(Error::MissingCoBlock {
                        key: key.to_string(),
                        command: command.to_string(),
                    });
                }
            }
        }

        let primary = blocks
            .iter()
            .filter(|b| !co_blocks.iter().any(|c| *c == b.command_line))
            .collect();

        Ok(Self {
            key,
            primary,
            companions,
        })
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Companion block for `command`; only declared co-blocks are available.
    pub fn companion(&self, command: &str) -> Result<&'a Block> {
        self.companions
            .iter()
            .find(|b| b.command_line == command)
            .copied()
            .ok_or_else(|| Error::MissingCoBlock {
                key: self.key.to_string(),
                command: command.to_string(),
            })
    }
}
