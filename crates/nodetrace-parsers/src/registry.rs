use crate::commands;
use crate::error::{Error, Result};
use crate::traits::CommandParser;
use nodetrace_types::{BlockSet, ParseOutput};

type ParserFactory = fn() -> Box<dyn CommandParser>;

/// One row of the parser table.
#[derive(Debug, Clone, Copy)]
pub struct ParserRegistration {
    pub key: &'static str,
    pub description: &'static str,
    factory: ParserFactory,
}

impl ParserRegistration {
    pub const fn new(key: &'static str, description: &'static str, factory: ParserFactory) -> Self {
        Self {
            key,
            description,
            factory,
        }
    }

    pub fn create(&self) -> Box<dyn CommandParser> {
        (self.factory)()
    }
}

fn boxed<P: CommandParser + Default + 'static>() -> Box<dyn CommandParser> {
    Box::new(P::default())
}

const BUILTIN_PARSERS: &[ParserRegistration] = &[
    ParserRegistration::new(
        commands::line_status::KEY,
        "Per-port line status from showline",
        boxed::<commands::LineStatusParser>,
    ),
    ParserRegistration::new(
        commands::slot_status::KEY,
        "Card details per slot, cross-referenced with the slots summary",
        boxed::<commands::SlotStatusParser>,
    ),
    ParserRegistration::new(
        commands::sfp::KEY,
        "SFP transceiver inventory per interface",
        boxed::<commands::SfpParser>,
    ),
    ParserRegistration::new(
        commands::fatal_log::KEY,
        "Fatal/fault records",
        boxed::<commands::FatalLogParser>,
    ),
    ParserRegistration::new(
        commands::rom_version::KEY,
        "Boot ROM version and build time per card",
        boxed::<commands::RomVersionParser>,
    ),
    ParserRegistration::new(
        commands::alarms::KEY,
        "Active alarms table",
        boxed::<commands::AlarmsParser>,
    ),
    ParserRegistration::new(
        commands::backplane::KEY,
        "Backplane EEPROM dump",
        boxed::<commands::BackplaneParser>,
    ),
    ParserRegistration::new(
        commands::gpon_stats::KEY,
        "GPON counters per subport",
        boxed::<commands::GponStatsParser>,
    ),
    ParserRegistration::new(
        commands::card_stats::KEY,
        "CPU, memory and uptime per card",
        boxed::<commands::CardStatsParser>,
    ),
];

/// Canonical key -> parser strategy.
///
/// Built once at startup from an explicit table; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ParserRegistry {
    entries: Vec<ParserRegistration>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in parser.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_PARSERS.to_vec(),
        }
    }

    /// Add a parser. Each canonical key may be registered exactly once.
    pub fn register(&mut self, registration: ParserRegistration) -> Result<()> {
        if self.contains(registration.key) {
            return Err(Error::Configuration(format!(
                "parser for '{}' registered twice",
                registration.key
            )));
        }
        self.entries.push(registration);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|r| r.key == key)
    }

    pub fn get_parser(&self, key: &str) -> Result<Box<dyn CommandParser>> {
        self.entries
            .iter()
            .find(|r| r.key == key)
            .map(ParserRegistration::create)
            .ok_or_else(|| Error::ParserNotFound {
                key: key.to_string(),
            })
    }

    /// Dispatch the blocks of `key` to its parser.
    pub fn parse_key(&self, key: &str, blocks: &BlockSet, merge: bool) -> Result<ParseOutput> {
        let parser = self.get_parser(key)?;
        match blocks.get(key) {
            Some(command_blocks) => parser.parse(command_blocks, merge),
            None => Ok(ParseOutput::from_keyed(Vec::new(), merge)),
        }
    }

    pub fn registrations(&self) -> &[ParserRegistration] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|r| r.key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for dyn CommandParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandParser")
            .field("key", &self.key())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keys_are_unique() {
        let registry = ParserRegistry::builtin();
        let mut keys: Vec<&str> = registry.keys().collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn test_each_parser_reports_its_registered_key() {
        let registry = ParserRegistry::builtin();
        for registration in registry.registrations() {
            assert_eq!(registration.create().key(), registration.key);
        }
    }

    #[test]
    fn test_unknown_key_is_recoverable_parser_not_found() {
        let registry = ParserRegistry::builtin();
        let err = registry.get_parser("Bridge Table").unwrap_err();
        assert!(matches!(err, Error::ParserNotFound { ref key } if key == "Bridge Table"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ParserRegistry::builtin();
        let again = registry.registrations()[0];
        assert!(matches!(
            registry.register(again),
            Err(Error::Configuration(_))
        ));
    }
}
