mod args;
mod commands;
pub mod context;
mod handlers;
pub mod inputs;
pub mod logging;
pub mod output;
pub mod types;

pub use args::{Cli, Commands};
pub use commands::run;
