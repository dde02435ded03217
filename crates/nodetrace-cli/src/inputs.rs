use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const TRANSCRIPT_EXTENSIONS: &[&str] = &["txt", "log"];

/// Expand directory arguments into the transcripts below them, sorted by name.
///
/// Other paths pass through unchanged, so a missing file is reported by the
/// pipeline like any other unreadable transcript.
pub fn expand_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.file_type().is_file())
                    .map(|entry| entry.into_path())
                    .filter(|p| is_transcript(p)),
            );
        } else {
            files.push(path.clone());
        }
    }
    files
}

fn is_transcript(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TRANSCRIPT_EXTENSIONS.contains(&ext))
}
