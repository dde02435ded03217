use crate::{Error, Result};
use nodetrace_parsers::{DEFAULT_PROMPT_SENTINEL, PatternCatalog, default_catalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DATABASE_FILE: &str = "nodetrace.db";
pub const CONFIG_FILE: &str = "config.toml";

/// Environment override for the data directory.
pub const DATA_DIR_ENV: &str = "NODETRACE_PATH";

/// Where `config.toml` and the record store live.
///
/// `--data-dir` wins, then a non-empty `NODETRACE_PATH`, then the platform
/// data directory, then `~/.nodetrace`.
pub fn resolve_data_dir(explicit: Option<&str>) -> Result<PathBuf> {
    let from_env = std::env::var(DATA_DIR_ENV).ok().filter(|p| !p.is_empty());
    if let Some(path) = explicit.map(str::to_string).or(from_env) {
        return Ok(expand_tilde(&path));
    }

    dirs::data_dir()
        .map(|dir| dir.join("nodetrace"))
        .or_else(|| dirs::home_dir().map(|home| home.join(".nodetrace")))
        .ok_or_else(|| {
            Error::Config(format!(
                "no data directory: pass --data-dir or set {DATA_DIR_ENV}"
            ))
        })
}

/// `~/olt.db` -> `$HOME/olt.db`; other paths unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/").zip(dirs::home_dir()) {
        Some((rest, home)) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Runtime settings, read from `config.toml` in the data directory.
///
/// ```toml
/// prompt_sentinel = "AUTO>"
/// database = "~/.nodetrace/nodetrace.db"
///
/// [catalog]
/// "Slot Status" = ["slots*", "slot show*"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_sentinel")]
    pub prompt_sentinel: String,

    /// Database file; defaults to `nodetrace.db` inside the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Per-key pattern lists replacing or extending the built-in catalog.
    #[serde(default)]
    pub catalog: BTreeMap<String, Vec<String>>,
}

fn default_sentinel() -> String {
    DEFAULT_PROMPT_SENTINEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt_sentinel: default_sentinel(),
            database: None,
            catalog: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        if config.prompt_sentinel.is_empty() {
            return Err(Error::Config("prompt_sentinel must not be empty".to_string()));
        }
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        match &self.database {
            Some(path) => expand_tilde(path),
            None => data_dir.join(DATABASE_FILE),
        }
    }

    /// Built-in catalog with this config's `[catalog]` entries applied.
    pub fn pattern_catalog(&self) -> Result<PatternCatalog> {
        let mut catalog = default_catalog();
        for (key, patterns) in &self.catalog {
            catalog.set(key.as_str(), patterns.as_slice())?;
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodetrace_parsers::commands::slot_status;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.prompt_sentinel, "AUTO>");
        assert!(config.catalog.is_empty());
        assert_eq!(
            config.database_path(Path::new("/data")),
            PathBuf::from("/data/nodetrace.db")
        );
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::load_from(&temp_dir.path().join("nonexistent.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config {
            prompt_sentinel: "OLT>".to_string(),
            database: Some("/var/lib/nodetrace/olt.db".to_string()),
            ..Config::default()
        };
        config
            .catalog
            .insert("Slot Status".to_string(), vec!["slots*".to_string()]);

        config.save_to(&config_path)?;
        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[catalog]\n\"Slot Status\" = [\"slot show*\"]\n")?;

        let config = Config::load_from(&config_path)?;
        assert_eq!(config.prompt_sentinel, "AUTO>");

        let catalog = config.pattern_catalog()?;
        assert_eq!(catalog.len(), default_catalog().len());
        let patterns = catalog.get(slot_status::KEY).map(|p| p.patterns().to_vec());
        assert_eq!(
            patterns,
            Some(vec!["slot show*".to_string(), "slot show".to_string()])
        );
        Ok(())
    }

    #[test]
    fn test_invalid_toml_is_config_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "prompt_sentinel = [")?;

        assert!(matches!(
            Config::load_from(&config_path),
            Err(Error::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let mut config = Config::default();
        config
            .catalog
            .insert("Alarms".to_string(), vec!["  ".to_string()]);
        assert!(matches!(config.pattern_catalog(), Err(Error::Parser(_))));
    }

    #[test]
    fn test_explicit_data_dir_wins() -> Result<()> {
        assert_eq!(
            resolve_data_dir(Some("/srv/nodetrace"))?,
            PathBuf::from("/srv/nodetrace")
        );
        Ok(())
    }

    #[test]
    fn test_expand_tilde_uses_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/olt.db"), home.join("olt.db"));
        }
        assert_eq!(expand_tilde("~olt.db"), PathBuf::from("~olt.db"));
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("relative/db"), PathBuf::from("relative/db"));
        assert_eq!(expand_tilde("/abs/db"), PathBuf::from("/abs/db"));
    }
}
