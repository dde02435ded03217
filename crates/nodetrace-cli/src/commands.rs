use super::args::{Cli, Commands};
use super::handlers;
use crate::context::ExecutionContext;
use anyhow::Result;
use nodetrace_runtime::resolve_data_dir;

pub fn run(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    let mut ctx = ExecutionContext::new(data_dir, cli.config);

    match cli.command {
        Commands::Parse { files, keyed, key } => {
            handlers::parse::handle(&ctx, &files, keyed, key.as_deref(), cli.format)
        }
        Commands::Ingest { files, node } => handlers::ingest::handle(&mut ctx, &files, node),
        Commands::Catalog => handlers::catalog::handle(&ctx, cli.format),
        Commands::Summary { node } => handlers::summary::handle(&ctx, node, cli.format),
    }
}
