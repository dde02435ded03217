use clap::ValueEnum;

/// How extracted records and summaries are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented `field: value` listing per node and command key
    Plain,
    /// Pretty-printed JSON, one object per transcript or node
    Json,
    /// One CSV table per command key
    Csv,
}

/// Verbosity of the stderr diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    /// Unreadable transcripts only
    Error,
    /// Also skipped command keys and rejected records
    Warn,
    /// Also a summary line per transcript and node
    Info,
    /// Also per-key record counts and segmentation
    Debug,
    Trace,
}

impl LogLevel {
    /// `EnvFilter` directive used when `NODETRACE_LOG` is unset.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
