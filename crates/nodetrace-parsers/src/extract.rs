//! Stateless extraction primitives shared by the command parsers.
//!
//! Parsers hold these as values and call them on block output; none of them
//! fail. Malformed lines are skipped.

use nodetrace_types::ParsedRecord;
use regex::{Captures, Regex};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    /// First `:` on the line
    Colon,
    /// First run of two or more spaces, after trimming the line
    SpaceRun,
}

/// Key-value extraction, one pair per line.
///
/// Pairs with an empty key or empty value are dropped. With a keyword filter,
/// a pair is kept only when its key contains one of the keywords
/// (case-insensitive).
#[derive(Debug, Clone, Copy)]
pub struct KeyValuePairs {
    separator: Separator,
    keywords: &'static [&'static str],
}

impl KeyValuePairs {
    pub const fn colon() -> Self {
        Self {
            separator: Separator::Colon,
            keywords: &[],
        }
    }

    pub const fn space_run() -> Self {
        Self {
            separator: Separator::SpaceRun,
            keywords: &[],
        }
    }

    pub const fn with_keywords(mut self, keywords: &'static [&'static str]) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn extract(&self, text: &str) -> ParsedRecord {
        let mut record = ParsedRecord::new();
        for line in text.lines() {
            if let Some((key, value)) = self.split_line(line)
                && self.accepts(key)
            {
                record.insert(key, value);
            }
        }
        record
    }

    /// Split one line into a trimmed, non-empty `(key, value)` pair.
    pub fn split_line<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let (key, value) = match self.separator {
            Separator::Colon => line.split_once(':')?,
            Separator::SpaceRun => line.trim().split_once("  ")?,
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            None
        } else {
            Some((key, value))
        }
    }

    fn accepts(&self, key: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let key = key.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| key.contains(&keyword.to_lowercase()))
    }
}

/// Table with a header line directly above a dashed separator line.
///
/// Column boundaries are the character offsets where header tokens start;
/// the last column runs to the end of the line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedColumns;

impl FixedColumns {
    /// One record per data row. No header/separator pair yields no records.
    pub fn extract(&self, text: &str) -> Vec<ParsedRecord> {
        let lines: Vec<&str> = text.lines().collect();
        let Some(header_idx) = lines.windows(2).position(|pair| {
            !pair[0].trim().is_empty() && !is_dashed(pair[0]) && is_dashed(pair[1])
        }) else {
            return Vec::new();
        };

        let columns = header_columns(lines[header_idx]);
        lines[header_idx + 2..]
            .iter()
            .filter(|line| !line.trim().is_empty() && !is_dashed(line))
            .map(|line| slice_row(line, &columns))
            .collect()
    }
}

/// `(name, start offset in chars)` for each whitespace-separated header token.
fn header_columns(header: &str) -> Vec<(String, usize)> {
    let mut columns = Vec::new();
    let mut current: Option<(String, usize)> = None;
    for (offset, ch) in header.chars().enumerate() {
        if ch.is_whitespace() {
            if let Some(column) = current.take() {
                columns.push(column);
            }
        } else {
            match current.as_mut() {
                Some((name, _)) => name.push(ch),
                None => current = Some((ch.to_string(), offset)),
            }
        }
    }
    columns.extend(current);
    columns
}

fn slice_row(line: &str, columns: &[(String, usize)]) -> ParsedRecord {
    let chars: Vec<char> = line.chars().collect();
    let mut record = ParsedRecord::new();
    for (i, (name, start)) in columns.iter().enumerate() {
        let start = if i == 0 { 0 } else { (*start).min(chars.len()) };
        let end = columns
            .get(i + 1)
            .map_or(chars.len(), |(_, next)| (*next).min(chars.len()));
        let value: String = chars[start..end.max(start)].iter().collect();
        record.insert(name.as_str(), value.trim());
    }
    record
}

/// True for lines made only of dashes and whitespace, with at least one dash.
pub fn is_dashed(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c == '-' || c.is_whitespace())
}

/// One delimited sub-record: the delimiter match and the text up to the next one.
#[derive(Debug)]
pub struct Section<'a> {
    pub captures: Captures<'a>,
    pub content: &'a str,
}

impl<'a> Section<'a> {
    /// Capture group `i` of the delimiter match.
    pub fn header(&self, i: usize) -> Option<&'a str> {
        self.captures.get(i).map(|m| m.as_str())
    }
}

/// Splits text into ordered sections on a delimiter regex.
/// Text before the first delimiter is discarded.
#[derive(Debug, Clone, Copy)]
pub struct SectionSplitter {
    delimiter: &'static LazyLock<Regex>,
}

impl SectionSplitter {
    pub const fn new(delimiter: &'static LazyLock<Regex>) -> Self {
        Self { delimiter }
    }

    pub fn split<'a>(&self, text: &'a str) -> Vec<Section<'a>> {
        let mut headers: Vec<(Captures<'a>, usize, usize)> = Vec::new();
        for captures in self.delimiter.captures_iter(text) {
            let Some((start, end)) = captures.get(0).map(|m| (m.start(), m.end())) else {
                continue;
            };
            headers.push((captures, start, end));
        }

        let next_starts: Vec<usize> = headers
            .iter()
            .skip(1)
            .map(|(_, start, _)| *start)
            .chain(std::iter::once(text.len()))
            .collect();

        headers
            .into_iter()
            .zip(next_starts)
            .map(|((captures, _, end), next)| Section {
                captures,
                content: &text[end..next],
            })
            .collect()
    }
}
