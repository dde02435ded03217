//! Rendering of extractions and summaries for stdout.

use anyhow::Result;
use nodetrace_index::SummaryRow;
use nodetrace_runtime::Extraction;
use nodetrace_types::{ParseOutput, ParsedRecord};
use serde::Serialize;

#[derive(Serialize)]
struct ExtractionView<'a> {
    file: String,
    node: String,
    keys: Vec<KeyView<'a>>,
    failures: Vec<FailureView<'a>>,
}

#[derive(Serialize)]
struct KeyView<'a> {
    key: &'a str,
    records: &'a ParseOutput,
}

#[derive(Serialize)]
struct FailureView<'a> {
    key: &'a str,
    error: String,
}

fn wants(filter: Option<&str>, key: &str) -> bool {
    filter.is_none_or(|f| f == key)
}

pub fn extractions_json(extractions: &[Extraction], key: Option<&str>) -> Result<String> {
    let views: Vec<ExtractionView<'_>> = extractions
        .iter()
        .map(|extraction| ExtractionView {
            file: extraction.path.display().to_string(),
            node: extraction.node_id().to_string(),
            keys: extraction
                .outputs
                .iter()
                .filter(|o| wants(key, &o.key))
                .map(|o| KeyView {
                    key: &o.key,
                    records: &o.output,
                })
                .collect(),
            failures: extraction
                .failures
                .iter()
                .filter(|f| wants(key, &f.key))
                .map(|f| FailureView {
                    key: &f.key,
                    error: f.error.to_string(),
                })
                .collect(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&views)?)
}

/// One CSV table per file and key, separated by a blank line.
///
/// The header is the first record's field names; later records are projected
/// onto it, missing fields left empty.
pub fn extractions_csv(extractions: &[Extraction], key: Option<&str>) -> Result<String> {
    let mut tables = Vec::new();
    for extraction in extractions {
        for output in extraction.outputs.iter().filter(|o| wants(key, &o.key)) {
            let records = output.output.clone().into_records();
            if !records.is_empty() {
                tables.push(records_csv(&records)?);
            }
        }
    }
    Ok(tables.join("\n"))
}

pub fn records_csv(records: &[ParsedRecord]) -> Result<String> {
    let Some(first) = records.first() else {
        return Ok(String::new());
    };
    let header: Vec<&str> = first.keys().collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header)?;
    for record in records {
        writer.write_record(header.iter().map(|field| {
            record
                .get(field)
                .map(ToString::to_string)
                .unwrap_or_default()
        }))?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub fn extractions_plain(extractions: &[Extraction], key: Option<&str>) -> String {
    let mut out = String::new();
    for extraction in extractions {
        out.push_str(&format!(
            "{} ({})\n",
            extraction.node_id(),
            extraction.path.display()
        ));

        for output in extraction.outputs.iter().filter(|o| wants(key, &o.key)) {
            match &output.output {
                ParseOutput::Merged(records) => {
                    out.push_str(&format!("  {} [{}]\n", output.key, records.len()));
                    push_records(&mut out, records, "    ");
                }
                ParseOutput::Keyed(groups) => {
                    out.push_str(&format!("  {}\n", output.key));
                    for (command, records) in groups {
                        out.push_str(&format!("    {} [{}]\n", command, records.len()));
                        push_records(&mut out, records, "      ");
                    }
                }
            }
        }

        for failure in extraction.failures.iter().filter(|f| wants(key, &f.key)) {
            out.push_str(&format!("  {} FAILED: {}\n", failure.key, failure.error));
        }
    }
    out
}

fn push_records(out: &mut String, records: &[ParsedRecord], indent: &str) {
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for (field, value) in record.iter() {
            out.push_str(&format!("{indent}{field}: {value}\n"));
        }
    }
}

pub fn summary_plain(node: &str, rows: &[SummaryRow]) -> String {
    let width = rows.iter().map(|r| r.info_type.len()).max().unwrap_or(0);
    let mut out = format!("{node}\n");
    for row in rows {
        out.push_str(&format!("  {:<width$}  {}\n", row.info_type, row.data));
    }
    out
}

pub fn summary_csv(rows: &[SummaryRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    finish(writer)
}
