use anyhow::{Context as _, Result};
use nodetrace_index::Database;
use nodetrace_runtime::{Config, Pipeline};
use once_cell::sync::OnceCell;
use std::path::PathBuf;

/// Lazily loaded state shared by the command handlers.
pub struct ExecutionContext {
    data_dir: PathBuf,
    config_path: PathBuf,
    config: OnceCell<Config>,
    pipeline: OnceCell<Pipeline>,
    db: OnceCell<Database>,
}

impl ExecutionContext {
    pub fn new(data_dir: PathBuf, config_path: Option<PathBuf>) -> Self {
        let config_path = config_path.unwrap_or_else(|| Config::default_path(&data_dir));
        Self {
            data_dir,
            config_path,
            config: OnceCell::new(),
            pipeline: OnceCell::new(),
            db: OnceCell::new(),
        }
    }

    pub fn config(&self) -> Result<&Config> {
        self.config.get_or_try_init(|| {
            Config::load_from(&self.config_path)
                .with_context(|| format!("failed to load {}", self.config_path.display()))
        })
    }

    pub fn pipeline(&self) -> Result<&Pipeline> {
        self.pipeline
            .get_or_try_init(|| Ok(Pipeline::new(self.config()?)?))
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        Ok(self.config()?.database_path(&self.data_dir))
    }

    pub fn db(&self) -> Result<&Database> {
        self.db.get_or_try_init(|| self.open_database())
    }

    pub fn db_mut(&mut self) -> Result<&mut Database> {
        if self.db.get().is_none() {
            let db = self.open_database()?;
            let _ = self.db.set(db);
        }
        self.db
            .get_mut()
            .ok_or_else(|| anyhow::anyhow!("database is not open"))
    }

    fn open_database(&self) -> Result<Database> {
        let db_path = self.db_path()?;
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        Database::open(&db_path).with_context(|| format!("failed to open {}", db_path.display()))
    }
}
