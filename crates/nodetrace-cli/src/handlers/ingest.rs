use crate::context::ExecutionContext;
use crate::inputs::expand_inputs;
use anyhow::{Context as _, Result, bail};
use nodetrace_index::IngestReport;
use nodetrace_runtime::ingest_extraction;
use nodetrace_types::NodeId;
use std::path::PathBuf;

pub fn handle(ctx: &mut ExecutionContext, files: &[PathBuf], node: Option<String>) -> Result<()> {
    let files = expand_inputs(files);
    let outcomes = ctx.pipeline()?.process_batch(&files);
    let db = ctx.db_mut()?;

    let mut total = IngestReport::default();
    let mut ingested = 0;
    let mut unreadable = 0;
    let mut store_error = None;
    for outcome in outcomes {
        let extraction = match outcome.result {
            Ok(extraction) => extraction,
            Err(err) => {
                println!("{}: {}", outcome.path.display(), err);
                unreadable += 1;
                continue;
            }
        };

        let node = node
            .as_deref()
            .map(NodeId::from)
            .unwrap_or_else(|| extraction.node_id());
        let report = match ingest_extraction(db, &node, &extraction) {
            Ok(report) => report,
            Err(err) => {
                println!("{}: not stored", node);
                store_error = Some(err);
                break;
            }
        };
        println!(
            "{}: {} inserted, {} duplicate, {} failed",
            node, report.inserted, report.duplicates, report.failed
        );
        for failure in &extraction.failures {
            println!("  {} skipped: {}", failure.key, failure.error);
        }
        ingested += 1;
        total += report;
    }

    println!(
        "Ingested {} transcript(s): {} inserted, {} duplicate, {} failed",
        ingested, total.inserted, total.duplicates, total.failed
    );

    if let Some(err) = store_error {
        return Err(err).context("ingestion stopped");
    }
    if unreadable > 0 {
        bail!("{} of {} transcripts could not be read", unreadable, files.len());
    }
    Ok(())
}
