use crate::types::LogLevel;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NODETRACE_LOG";

/// Install the stderr subscriber. `NODETRACE_LOG` takes precedence over `--log-level`.
pub fn init(level: LogLevel) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
