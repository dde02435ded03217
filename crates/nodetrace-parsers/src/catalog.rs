//! Pattern catalog: canonical command key -> raw command-line patterns.
//!
//! A pattern is a literal command string, or a prefix ending in [`WILDCARD`]
//! meaning "this prefix, optionally followed by a parameter".

use crate::commands;
use crate::error::{Error, Result};
use crate::registry::ParserRegistry;

pub const WILDCARD: char = '*';

/// Expand wildcard patterns so both the parameterized and bare forms are present.
///
/// `"slots*"` yields `["slots*", "slots"]`. Literal patterns pass through.
pub fn expand<S: AsRef<str>>(patterns: &[S]) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::with_capacity(patterns.len() * 2);
    for pattern in patterns {
        let pattern = pattern.as_ref();
        if !expanded.iter().any(|p| p == pattern) {
            expanded.push(pattern.to_string());
        }
        if let Some(bare) = pattern.strip_suffix(WILDCARD)
            && !expanded.iter().any(|p| p == bare)
        {
            expanded.push(bare.to_string());
        }
    }
    expanded
}

/// True iff `command_line` equals some pattern, or starts with some pattern
/// minus its last character.
///
/// The prefix rule applies to every pattern, literal ones included, so a
/// literal `"slots"` also claims `"slot 1"`.
pub fn matches<S: AsRef<str>>(command_line: &str, patterns: &[S]) -> bool {
    patterns.iter().any(|pattern| {
        let pattern = pattern.as_ref();
        command_line == pattern || command_line.starts_with(without_last_char(pattern))
    })
}

fn without_last_char(s: &str) -> &str {
    match s.char_indices().next_back() {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Expanded pattern set for one canonical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<String>,
}

impl PatternSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            patterns: expand(patterns),
        }
    }

    pub fn matches(&self, command_line: &str) -> bool {
        matches(command_line, &self.patterns)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// Static configuration routing command lines to canonical keys.
///
/// Built once at startup and read-only afterwards. Iteration follows
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternCatalog {
    entries: Vec<(String, PatternSet)>,
}

impl PatternCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from raw `(key, patterns)` entries.
    ///
    /// Empty pattern strings are rejected: with the prefix rule they would
    /// claim every command line.
    pub fn from_entries<K, S>(entries: impl IntoIterator<Item = (K, Vec<S>)>) -> Result<Self>
    where
        K: Into<String>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();
        for (key, patterns) in entries {
            catalog.set(key, &patterns)?;
        }
        Ok(catalog)
    }

    /// Insert or replace the patterns of `key`. Replacing keeps the key's position.
    pub fn set<S: AsRef<str>>(&mut self, key: impl Into<String>, patterns: &[S]) -> Result<()> {
        let key = key.into();
        if patterns.is_empty() {
            return Err(Error::Configuration(format!(
                "catalog key '{}' has no patterns",
                key
            )));
        }
        if patterns.iter().any(|p| p.as_ref().trim().is_empty()) {
            return Err(Error::Configuration(format!(
                "catalog key '{}' has an empty pattern",
                key
            )));
        }

        let set = PatternSet::new(patterns);
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = set,
            None => self.entries.push((key, set)),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&PatternSet> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, p)| p)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatternSet)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// Canonical keys whose patterns claim `command_line`, in catalog order.
    pub fn keys_for(&self, command_line: &str) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(_, patterns)| patterns.matches(command_line))
            .map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Startup consistency check: every catalog key must have a registered parser.
    pub fn ensure_registered(&self, registry: &ParserRegistry) -> Result<()> {
        let unknown: Vec<&str> = self.keys().filter(|k| !registry.contains(k)).collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(Error::Configuration(format!(
                "catalog references command keys with no registered parser: {}",
                unknown.join(", ")
            )))
        }
    }
}

/// Command patterns for the built-in parsers.
pub fn default_catalog() -> PatternCatalog {
    let mut catalog = PatternCatalog::new();
    for (key, patterns) in DEFAULT_PATTERNS {
        catalog.entries.push((key.to_string(), PatternSet::new(patterns)));
    }
    catalog
}

const DEFAULT_PATTERNS: &[(&str, &[&str])] = &[
    (commands::line_status::KEY, &["showline *"]),
    (commands::slot_status::KEY, &["slots*"]),
    (commands::sfp::KEY, &["sfp show *"]),
    (commands::fatal_log::KEY, &["fatal show*"]),
    (commands::rom_version::KEY, &["romversion *"]),
    (commands::alarms::KEY, &["alarm show*"]),
    (commands::backplane::KEY, &["shelfctrl eeprom show*"]),
    (commands::gpon_stats::KEY, &["gpon stats *"]),
    (commands::card_stats::KEY, &["card stats*"]),
];
