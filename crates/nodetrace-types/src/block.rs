use serde::ser::{Serialize, SerializeMap, Serializer};

/// Accumulated output of one literal command invocation.
///
/// `output` is the exact concatenation of every output line that followed the
/// prompt, each terminated by `\n`. Repeated invocations of the same command
/// line append to the same block.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Block {
    pub command_line: String,
    pub output: String,
}

impl Block {
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
            output: String::new(),
        }
    }

    pub fn with_output(command_line: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
            output: output.into(),
        }
    }

    /// Append one output line (without its terminator).
    pub fn push_line(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.output.lines()
    }

    /// Whitespace-separated tokens of the command line.
    pub fn command_tokens(&self) -> std::str::SplitWhitespace<'_> {
        self.command_line.split_whitespace()
    }
}

/// Blocks of one canonical key, unique by command line, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBlocks {
    blocks: Vec<Block>,
}

impl CommandBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, command_line: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.command_line == command_line)
    }

    pub fn contains(&self, command_line: &str) -> bool {
        self.get(command_line).is_some()
    }

    /// Get the block for `command_line`, creating an empty one at the end if absent.
    pub fn entry(&mut self, command_line: &str) -> &mut Block {
        let idx = match self
            .blocks
            .iter()
            .position(|b| b.command_line == command_line)
        {
            Some(idx) => idx,
            None => {
                self.blocks.push(Block::new(command_line));
                self.blocks.len() - 1
            }
        };
        &mut self.blocks[idx]
    }

    /// Insert a fully built block; an existing block with the same command line
    /// receives the new output appended.
    pub fn insert(&mut self, block: Block) {
        let target = self.entry(&block.command_line);
        target.output.push_str(&block.output);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn command_lines(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.command_line.as_str())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl FromIterator<Block> for CommandBlocks {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        let mut blocks = CommandBlocks::new();
        for block in iter {
            blocks.insert(block);
        }
        blocks
    }
}

impl<'a> IntoIterator for &'a CommandBlocks {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

impl Serialize for CommandBlocks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.blocks.len()))?;
        for block in &self.blocks {
            map.serialize_entry(&block.command_line, &block.output)?;
        }
        map.end()
    }
}

/// Segmentation result for one transcript: canonical key -> blocks.
///
/// Keys iterate in the order they were first matched in the transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSet {
    entries: Vec<(String, CommandBlocks)>,
}

impl BlockSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&CommandBlocks> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, blocks)| blocks)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Get the blocks for `key`, registering the key if it has not been seen.
    pub fn entry(&mut self, key: &str) -> &mut CommandBlocks {
        let idx = match self.entries.iter().position(|(k, _)| k == key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key.to_string(), CommandBlocks::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandBlocks)> {
        self.entries.iter().map(|(k, b)| (k.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for BlockSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, blocks) in &self.entries {
            map.serialize_entry(key, blocks)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_reuses_existing_command_line() {
        let mut blocks = CommandBlocks::new();
        blocks.entry("slots 1").push_line("Type : A");
        blocks.entry("slots 2").push_line("Type : B");
        blocks.entry("slots 1").push_line("Shelf : 1");

        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks.get("slots 1").unwrap().output,
            "Type : A\nShelf : 1\n"
        );
        assert_eq!(
            blocks.command_lines().collect::<Vec<_>>(),
            vec!["slots 1", "slots 2"]
        );
    }

    #[test]
    fn test_block_set_preserves_first_seen_key_order() {
        let mut set = BlockSet::new();
        set.entry("Slot Status");
        set.entry("Alarms");
        set.entry("Slot Status");

        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["Slot Status", "Alarms"]);
    }

    #[test]
    fn test_block_set_serializes_as_nested_map() {
        let mut set = BlockSet::new();
        set.entry("Alarms").entry("alarm show").push_line("none");

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"Alarms":{"alarm show":"none\n"}}"#);
    }
}
