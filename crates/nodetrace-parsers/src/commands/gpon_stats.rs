use crate::error::{Error, Result};
use crate::traits::{CommandParser, ParseContext};
use nodetrace_types::{Block, FieldValue, ParsedRecord};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

pub const KEY: &str = "GPON Subport Statistics";

static METRIC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<metric>.+?)\s*\[(?P<subport>subport \d+)\]\s*[:=]\s*(?P<value>\d+)\s*$")
        .unwrap()
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// `gpon stats <shelf>/<slot>` counters, accumulated into one record per subport.
///
/// ```text
/// Upstream BIP units [subport 1] : 0
/// FEC corrected bytes [subport 1] : 1024
/// ```
#[derive(Debug, Default)]
pub struct GponStatsParser;

/// `"gpon stats 1/3"` -> `"1/3"`.
fn slot_from_command(command_line: &str) -> Option<String> {
    let mut numbers = NUMBER.find_iter(command_line).map(|m| m.as_str());
    let shelf = numbers.next()?;
    let slot = numbers.next()?;
    Some(format!("{shelf}/{slot}"))
}

impl CommandParser for GponStatsParser {
    fn key(&self) -> &'static str {
        KEY
    }

    fn parse_block(&self, block: &Block, _ctx: &ParseContext<'_>) -> Result<Vec<ParsedRecord>> {
        let Some(slot) = slot_from_command(&block.command_line) else {
            return Err(Error::parse(
                KEY,
                format!("no shelf/slot in command '{}'", block.command_line),
            ));
        };

        let mut subports: Vec<(String, ParsedRecord)> = Vec::new();
        for caps in block.lines().filter_map(|line| METRIC_LINE.captures(line)) {
            let subport = &caps["subport"];
            let value = match caps["value"].parse::<i64>() {
                Ok(n) => FieldValue::Integer(n),
                Err(_) => {
                    warn!(
                        key = KEY,
                        slot = %slot,
                        subport = %subport,
                        metric = &caps["metric"],
                        value = &caps["value"],
                        "counter exceeds i64, keeping as text"
                    );
                    FieldValue::text(&caps["value"])
                }
            };

            let idx = match subports.iter().position(|(s, _)| s == subport) {
                Some(idx) => idx,
                None => {
                    let record = ParsedRecord::new()
                        .with("Slot", slot.as_str())
                        .with("Sub Port", subport);
                    subports.push((subport.to_string(), record));
                    subports.len() - 1
                }
            };
            subports[idx].1.insert(&caps["metric"], value);
        }

        Ok(subports.into_iter().map(|(_, record)| record).collect())
    }
}
