//! End-to-end extraction over a captured session transcript.

use nodetrace_parsers::{Error, ParserRegistry, Segmenter, default_catalog};
use nodetrace_types::{FieldValue, ParseOutput};
use std::io::Write;
use std::path::Path;

const SAMPLE: &str = "tests/samples/log_172.16.114.24.txt";

#[test]
fn test_block_set_keys_follow_transcript_order() -> anyhow::Result<()> {
    let catalog = default_catalog();
    let blocks = Segmenter::new(&catalog).segment_file(Path::new(SAMPLE))?;

    let keys: Vec<&str> = blocks.keys().collect();
    insta::assert_snapshot!(keys.join("\n"), @r"
    Slot Status
    Line Status
    SFP Inventory
    Fatal Log
    Card ROM Version
    Alarms
    HW Inventory Backplane
    GPON Subport Statistics
    Card Stats
    ");

    let slots = blocks.get("Slot Status").unwrap();
    assert_eq!(
        slots.command_lines().collect::<Vec<_>>(),
        vec!["slots", "slots 1", "slots 3", "slots m1"]
    );
    Ok(())
}

#[test]
fn test_every_present_key_parses() -> anyhow::Result<()> {
    let catalog = default_catalog();
    let registry = ParserRegistry::builtin();
    let blocks = Segmenter::new(&catalog).segment_file(Path::new(SAMPLE))?;

    let mut counts = Vec::new();
    for key in blocks.keys() {
        let output = registry.parse_key(key, &blocks, true)?;
        counts.push(format!("{key}: {}", output.record_count()));
    }

    insta::assert_snapshot!(counts.join("\n"), @r"
    Slot Status: 3
    Line Status: 2
    SFP Inventory: 2
    Fatal Log: 1
    Card ROM Version: 1
    Alarms: 2
    HW Inventory Backplane: 1
    GPON Subport Statistics: 2
    Card Stats: 3
    ");
    Ok(())
}

#[test]
fn test_merged_equals_flattened_keyed_for_every_parser() -> anyhow::Result<()> {
    let catalog = default_catalog();
    let registry = ParserRegistry::builtin();
    let blocks = Segmenter::new(&catalog).segment_file(Path::new(SAMPLE))?;

    for key in blocks.keys() {
        let merged = registry.parse_key(key, &blocks, true)?;
        let keyed = registry.parse_key(key, &blocks, false)?;

        assert!(matches!(merged, ParseOutput::Merged(_)), "{key}");
        assert!(matches!(keyed, ParseOutput::Keyed(_)), "{key}");
        assert_eq!(merged, keyed.flatten(), "{key}");
    }
    Ok(())
}

#[test]
fn test_keyed_output_excludes_co_block() -> anyhow::Result<()> {
    let catalog = default_catalog();
    let registry = ParserRegistry::builtin();
    let blocks = Segmenter::new(&catalog).segment_file(Path::new(SAMPLE))?;

    let ParseOutput::Keyed(keyed) = registry.parse_key("Slot Status", &blocks, false)? else {
        panic!("expected keyed output");
    };
    let command_lines: Vec<&str> = keyed.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(command_lines, vec!["slots 1", "slots 3", "slots m1"]);

    // The segmented input is left untouched.
    assert!(blocks.get("Slot Status").unwrap().contains("slots"));
    Ok(())
}

#[test]
fn test_records_serialize_as_ordered_objects() -> anyhow::Result<()> {
    let catalog = default_catalog();
    let registry = ParserRegistry::builtin();
    let blocks = Segmenter::new(&catalog).segment_file(Path::new(SAMPLE))?;

    let records = registry
        .parse_key("SFP Inventory", &blocks, true)?
        .into_records();
    let json = serde_json::to_value(&records[0])?;

    assert_eq!(json["Interface"], "1-a-2-0");
    assert_eq!(json["Manufacturing Date"], "2022-06-21");
    assert_eq!(json["Nominal Bit Rate (Gbps)"], 10);
    assert!(serde_json::to_string(&records[0])?.starts_with(r#"{"Interface":"1-a-2-0","#));
    Ok(())
}

#[test]
fn test_slot_status_without_summary_fails_only_that_key() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        "AUTO> slots 1\nType : MXK GPON-4 OLT\nSlot : 1\nAUTO> romversion 1\nMXK 3.4\nThu Mar 21 14:05:11 2024\n"
    )?;

    let catalog = default_catalog();
    let registry = ParserRegistry::builtin();
    let blocks = Segmenter::new(&catalog).segment_file(file.path())?;

    let err = registry
        .parse_key("Slot Status", &blocks, true)
        .unwrap_err();
    assert!(matches!(err, Error::MissingCoBlock { .. }));
    assert!(err.is_recoverable());

    let rom = registry.parse_key("Card ROM Version", &blocks, true)?;
    let records = rom.into_records();
    assert_eq!(records.len(), 1);
    assert!(matches!(
        records[0].get("Timestamp"),
        Some(FieldValue::DateTime(_))
    ));
    Ok(())
}

#[test]
fn test_unmatched_transcript_is_empty_not_error() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "AUTO> bridge show")?;
    writeln!(file, "vlan 100 untagged 1-a-2-0")?;

    let catalog = default_catalog();
    let blocks = Segmenter::new(&catalog).segment_file(file.path())?;
    assert!(blocks.is_empty());
    Ok(())
}
