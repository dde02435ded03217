use crate::types::{LogLevel, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nodetrace")]
#[command(about = "Extract structured records from access-node CLI transcripts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory holding config.toml and the database
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Config file (default: <data-dir>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse transcripts and print the extracted records
    Parse {
        /// Transcript files or directories (*.txt, *.log)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Group records by command line instead of flattening them
        #[arg(long)]
        keyed: bool,

        /// Only output this command key
        #[arg(long)]
        key: Option<String>,
    },

    /// Parse transcripts and store the records in the database
    Ingest {
        /// Transcript files or directories (*.txt, *.log)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Node identity (default: derived from each file name)
        #[arg(long)]
        node: Option<String>,
    },

    /// List command keys, their parsers and command patterns
    Catalog,

    /// Show the summary report of stored nodes
    Summary {
        #[arg(long)]
        node: Option<String>,
    },
}
