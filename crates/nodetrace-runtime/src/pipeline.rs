//! Per-file extraction: segment once, dispatch every present key, isolate failures.

use crate::config::Config;
use crate::{Error, Result};
use nodetrace_index::{Database, IngestReport};
use nodetrace_parsers::{PatternCatalog, ParserRegistry, Segmenter};
use nodetrace_types::{NodeId, ParseOutput};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span, warn};

/// Parsed output of one canonical key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyOutput {
    pub key: String,
    pub output: ParseOutput,
}

/// A canonical key whose parser failed; the rest of the file was still processed.
#[derive(Debug)]
pub struct KeyFailure {
    pub key: String,
    pub error: nodetrace_parsers::Error,
}

/// Everything extracted from one transcript.
#[derive(Debug)]
pub struct Extraction {
    pub path: PathBuf,
    /// Outputs in catalog key order.
    pub outputs: Vec<KeyOutput>,
    pub failures: Vec<KeyFailure>,
}

impl Extraction {
    pub fn record_count(&self) -> usize {
        self.outputs.iter().map(|o| o.output.record_count()).sum()
    }

    pub fn get(&self, key: &str) -> Option<&ParseOutput> {
        self.outputs.iter().find(|o| o.key == key).map(|o| &o.output)
    }

    /// Node identity derived from the transcript file name.
    pub fn node_id(&self) -> NodeId {
        node_id_from_path(&self.path)
    }
}

/// Outcome of one file in a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<Extraction>,
}

/// Catalog, registry and segmentation settings, validated once and then
/// shared read-only across any number of transcripts.
#[derive(Debug)]
pub struct Pipeline {
    catalog: PatternCatalog,
    registry: ParserRegistry,
    prompt_sentinel: String,
    merge: bool,
}

impl Pipeline {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_registry(config, ParserRegistry::builtin())
    }

    /// Build with a caller-supplied registry. Fails before any transcript is
    /// read if the catalog names a key the registry cannot parse.
    pub fn with_registry(config: &Config, registry: ParserRegistry) -> Result<Self> {
        if config.prompt_sentinel.is_empty() {
            return Err(Error::Config("prompt_sentinel must not be empty".to_string()));
        }
        let catalog = config.pattern_catalog()?;
        catalog.ensure_registered(&registry)?;

        Ok(Self {
            catalog,
            registry,
            prompt_sentinel: config.prompt_sentinel.clone(),
            merge: true,
        })
    }

    /// Keep records grouped per command line instead of flattening them.
    pub fn keyed(mut self) -> Self {
        self.merge = false;
        self
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    pub fn process_file(&self, path: &Path) -> Result<Extraction> {
        let span = info_span!("transcript", path = %path.display());
        let _enter = span.enter();

        let segmenter = Segmenter::with_sentinel(&self.catalog, &self.prompt_sentinel);
        let blocks = segmenter.segment_file(path)?;

        let mut outputs = Vec::new();
        let mut failures = Vec::new();

        for key in self.catalog.keys().filter(|k| blocks.contains_key(k)) {
            match self.registry.parse_key(key, &blocks, self.merge) {
                Ok(output) => {
                    debug!(key = %key, records = output.record_count(), "parsed key");
                    outputs.push(KeyOutput {
                        key: key.to_string(),
                        output,
                    });
                }
                Err(err) if err.is_recoverable() => {
                    warn!(key = %key, error = %err, "skipping key");
                    failures.push(KeyFailure {
                        key: key.to_string(),
                        error: err,
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }

        let extraction = Extraction {
            path: path.to_path_buf(),
            outputs,
            failures,
        };
        info!(
            keys = extraction.outputs.len(),
            records = extraction.record_count(),
            failures = extraction.failures.len(),
            "processed transcript"
        );
        Ok(extraction)
    }

    /// Process files independently; one unreadable file does not stop the others.
    pub fn process_batch<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<FileOutcome> {
        paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                let result = self.process_file(path);
                if let Err(err) = &result {
                    error!(path = %path.display(), error = %err, "failed to process transcript");
                }
                FileOutcome {
                    path: path.to_path_buf(),
                    result,
                }
            })
            .collect()
    }
}

/// Store every key of `extraction` under `node`.
pub fn ingest_extraction(
    db: &mut Database,
    node: &NodeId,
    extraction: &Extraction,
) -> Result<IngestReport> {
    let mut report = IngestReport::default();
    for KeyOutput { key, output } in &extraction.outputs {
        let records = output.clone().into_records();
        report += db.ingest(node, key, &records)?;
    }
    info!(
        node = %node,
        inserted = report.inserted,
        duplicates = report.duplicates,
        failed = report.failed,
        "ingested transcript"
    );
    Ok(report)
}

/// Node identity from a transcript file name.
///
/// `log_172.16.114.24.txt` yields `172.16.114.24`; any other name yields its
/// file stem.
pub fn node_id_from_path(path: &Path) -> NodeId {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(rest) = stem.strip_prefix("log_")
        && !rest.is_empty()
    {
        return NodeId::new(rest);
    }
    NodeId::new(stem)
}
