use crate::context::ExecutionContext;
use crate::output;
use crate::types::OutputFormat;
use anyhow::{Result, bail};
use nodetrace_index::SummaryRow;
use serde::Serialize;

#[derive(Serialize)]
struct NodeSummary {
    node: String,
    rows: Vec<SummaryRow>,
}

pub fn handle(ctx: &ExecutionContext, node: Option<String>, format: OutputFormat) -> Result<()> {
    let db = ctx.db()?;

    let nodes = match node {
        Some(node) => {
            if db.get_node(&node)?.is_none() {
                bail!("node '{}' has not been ingested", node);
            }
            vec![node]
        }
        None => db.list_nodes()?.into_iter().map(|n| n.node).collect(),
    };

    let mut summaries = Vec::with_capacity(nodes.len());
    for node in nodes {
        let rows = db.node_summary(&node)?;
        summaries.push(NodeSummary { node, rows });
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Csv => {
            let tables = summaries
                .iter()
                .map(|s| output::summary_csv(&s.rows))
                .collect::<Result<Vec<_>>>()?;
            print!("{}", tables.join("\n"));
        }
        OutputFormat::Plain => {
            if summaries.is_empty() {
                println!("No nodes ingested yet.");
            }
            let plain: Vec<String> = summaries
                .iter()
                .map(|s| output::summary_plain(&s.node, &s.rows))
                .collect();
            print!("{}", plain.join("\n"));
        }
    }
    Ok(())
}
