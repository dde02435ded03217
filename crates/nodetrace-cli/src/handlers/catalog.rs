use crate::context::ExecutionContext;
use crate::types::OutputFormat;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct CatalogEntry<'a> {
    key: &'a str,
    description: &'a str,
    patterns: &'a [String],
}

pub fn handle(ctx: &ExecutionContext, format: OutputFormat) -> Result<()> {
    let pipeline = ctx.pipeline()?;
    let entries: Vec<CatalogEntry<'_>> = pipeline
        .catalog()
        .iter()
        .map(|(key, patterns)| CatalogEntry {
            key,
            description: pipeline
                .registry()
                .registrations()
                .iter()
                .find(|r| r.key == key)
                .map(|r| r.description)
                .unwrap_or_default(),
            patterns: patterns.patterns(),
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(["Command Key", "Description", "Patterns"])?;
            for entry in &entries {
                let patterns = entry.patterns.join(" | ");
                writer.write_record([entry.key, entry.description, patterns.as_str()])?;
            }
            writer.flush()?;
        }
        OutputFormat::Plain => {
            let width = entries.iter().map(|e| e.key.len()).max().unwrap_or(0);
            for entry in &entries {
                println!(
                    "{:<width$}  {}  ({})",
                    entry.key,
                    entry.patterns.join(", "),
                    entry.description
                );
            }
        }
    }
    Ok(())
}
