//! Single-pass transcript segmentation into per-command blocks.

use crate::catalog::PatternCatalog;
use crate::error::{Error, Result};
use nodetrace_types::BlockSet;
use std::path::Path;
use tracing::debug;

/// Prompt token that marks a command line in captured sessions.
pub const DEFAULT_PROMPT_SENTINEL: &str = "AUTO>";

/// Groups transcript output lines into blocks routed by the pattern catalog.
///
/// A line starting with the sentinel (bit-exact, column 0) is a prompt line;
/// its trimmed remainder is the command line. Every other line belongs to the
/// blocks of all canonical keys the last prompt activated.
#[derive(Debug, Clone)]
pub struct Segmenter<'a> {
    catalog: &'a PatternCatalog,
    sentinel: &'a str,
}

impl<'a> Segmenter<'a> {
    pub fn new(catalog: &'a PatternCatalog) -> Self {
        Self {
            catalog,
            sentinel: DEFAULT_PROMPT_SENTINEL,
        }
    }

    pub fn with_sentinel(catalog: &'a PatternCatalog, sentinel: &'a str) -> Self {
        Self { catalog, sentinel }
    }

    /// Read the whole transcript and segment it.
    ///
    /// The file handle lives only inside the read call. Invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn segment_file(&self, path: &Path) -> Result<BlockSet> {
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        let blocks = self.segment_str(&text);
        debug!(
            path = %path.display(),
            keys = blocks.len(),
            "segmented transcript"
        );
        Ok(blocks)
    }

    pub fn segment_str(&self, text: &str) -> BlockSet {
        let mut blocks = BlockSet::new();
        let mut active_keys: Vec<&str> = Vec::new();
        let mut command_line = String::new();

        for line in text.lines() {
            if let Some(rest) = line.strip_prefix(self.sentinel) {
                active_keys.clear();
                command_line = rest.trim().to_string();

                for key in self.catalog.keys_for(&command_line) {
                    blocks.entry(key).entry(&command_line);
                    active_keys.push(key);
                }

                if active_keys.is_empty() {
                    debug!(command = %command_line, "no catalog pattern for command, skipping output");
                }
            } else if !active_keys.is_empty() {
                for key in &active_keys {
                    blocks.entry(key).entry(&command_line).push_line(line);
                }
            }
        }

        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PatternCatalog, default_catalog};

    fn catalog() -> PatternCatalog {
        default_catalog()
    }

    #[test]
    fn test_output_is_exact_line_concatenation() {
        let catalog = catalog();
        let seg = Segmenter::new(&catalog);
        let text = "AUTO> alarm show\nline one\n  line two  \n\nline four\nAUTO> exit\nignored\n";

        let blocks = seg.segment_str(text);
        let alarms = blocks.get("Alarms").unwrap();
        assert_eq!(
            alarms.get("alarm show").unwrap().output,
            "line one\n  line two  \n\nline four\n"
        );
    }

    #[test]
    fn test_unmatched_prompt_yields_empty_block_set() {
        let catalog = catalog();
        let seg = Segmenter::new(&catalog);
        let blocks = seg.segment_str("AUTO> bridge show\nvlan 100\nvlan 200\n");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_lines_before_first_prompt_are_discarded() {
        let catalog = catalog();
        let seg = Segmenter::new(&catalog);
        let blocks = seg.segment_str("banner\nlogin: admin\nAUTO> card stats\nrow\n");
        assert_eq!(
            blocks.get("Card Stats").unwrap().get("card stats").unwrap().output,
            "row\n"
        );
    }

    #[test]
    fn test_repeated_command_accumulates_into_one_block() {
        let catalog = catalog();
        let seg = Segmenter::new(&catalog);
        let text = "AUTO> alarm show\nfirst\nAUTO> slots\nMXK 1419\nAUTO> alarm show\nsecond\n";

        let blocks = seg.segment_str(text);
        let alarms = blocks.get("Alarms").unwrap();
        assert_eq!(alarms.len(), 1);
        assert_eq!(alarms.get("alarm show").unwrap().output, "first\nsecond\n");
    }

    #[test]
    fn test_one_command_line_feeds_every_matching_key() {
        let catalog = PatternCatalog::from_entries([
            ("Card Stats", vec!["card stats*"]),
            ("Card Summary", vec!["card*"]),
        ])
        .unwrap();
        let seg = Segmenter::new(&catalog);
        let blocks = seg.segment_str("AUTO> card stats\n1 97 3\n");

        assert_eq!(blocks.len(), 2);
        for key in ["Card Stats", "Card Summary"] {
            assert_eq!(
                blocks.get(key).unwrap().get("card stats").unwrap().output,
                "1 97 3\n"
            );
        }
    }

    #[test]
    fn test_prompt_without_output_still_registers_block() {
        let catalog = catalog();
        let seg = Segmenter::new(&catalog);
        let blocks = seg.segment_str("AUTO> fatal show\nAUTO> logout\n");
        let fatal = blocks.get("Fatal Log").unwrap();
        assert_eq!(fatal.get("fatal show").unwrap().output, "");
    }

    #[test]
    fn test_sentinel_must_start_line() {
        let catalog = catalog();
        let seg = Segmenter::new(&catalog);
        let blocks = seg.segment_str(" AUTO> alarm show\nrow\n");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_custom_sentinel() {
        let catalog = catalog();
        let seg = Segmenter::with_sentinel(&catalog, "zSH>");
        let blocks = seg.segment_str("zSH> slots\nMXK 1419\nAUTO> slots 1\nType : x\n");
        let slots = blocks.get("Slot Status").unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(
            slots.get("slots").unwrap().output,
            "MXK 1419\nAUTO> slots 1\nType : x\n"
        );
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        let catalog = catalog();
        let seg = Segmenter::new(&catalog);
        let text = "AUTO> slots\nMXK\nAUTO> slots 1\nType : A\nAUTO> alarm show\nx\n";
        assert_eq!(seg.segment_str(text), seg.segment_str(text));
    }

    #[test]
    fn test_crlf_file_segments_like_lf() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("log_10.0.0.2.txt");
        std::fs::write(&path, "AUTO> alarm show\r\nrow one\r\nrow two\r\nAUTO> exit\r\n").unwrap();

        let catalog = catalog();
        let blocks = Segmenter::new(&catalog).segment_file(&path).unwrap();
        let alarms = blocks.get("Alarms").unwrap();
        assert_eq!(alarms.len(), 1);
        assert_eq!(
            alarms.get("alarm show").unwrap().output,
            "row one\nrow two\n"
        );
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("log_10.0.0.3.txt");
        let mut bytes = b"AUTO> fatal show\nTask: tCard".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b"\nAUTO> alarm show\nlos\n");
        std::fs::write(&path, bytes).unwrap();

        let catalog = catalog();
        let blocks = Segmenter::new(&catalog).segment_file(&path).unwrap();
        assert_eq!(
            blocks.get("Fatal Log").unwrap().get("fatal show").unwrap().output,
            "Task: tCard\u{fffd}\u{fffd}\n"
        );
        assert_eq!(
            blocks.get("Alarms").unwrap().get("alarm show").unwrap().output,
            "los\n"
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let catalog = catalog();
        let seg = Segmenter::new(&catalog);
        let err = seg
            .segment_file(Path::new("/nonexistent/log_10.0.0.1.txt"))
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(!err.is_recoverable());
    }
}
