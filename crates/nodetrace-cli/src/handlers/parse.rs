use crate::context::ExecutionContext;
use crate::inputs::expand_inputs;
use crate::output;
use crate::types::OutputFormat;
use anyhow::{Result, bail};
use nodetrace_runtime::Pipeline;
use std::path::PathBuf;

pub fn handle(
    ctx: &ExecutionContext,
    files: &[PathBuf],
    keyed: bool,
    key: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let keyed_pipeline;
    let pipeline = if keyed {
        keyed_pipeline = Pipeline::new(ctx.config()?)?.keyed();
        &keyed_pipeline
    } else {
        ctx.pipeline()?
    };

    if let Some(key) = key
        && pipeline.catalog().get(key).is_none()
    {
        bail!("unknown command key '{}'", key);
    }

    let files = expand_inputs(files);
    let mut extractions = Vec::new();
    let mut unreadable = 0;
    for outcome in pipeline.process_batch(&files) {
        match outcome.result {
            Ok(extraction) => extractions.push(extraction),
            Err(_) => unreadable += 1,
        }
    }

    let rendered = match format {
        OutputFormat::Json => output::extractions_json(&extractions, key)?,
        OutputFormat::Csv => output::extractions_csv(&extractions, key)?,
        OutputFormat::Plain => output::extractions_plain(&extractions, key),
    };
    print!("{}", rendered);
    if format == OutputFormat::Json {
        println!();
    }

    if unreadable > 0 {
        bail!("{} of {} transcripts could not be read", unreadable, files.len());
    }
    Ok(())
}
