use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use super::types::SourceDocument;
use crate::ingest::discover_documents;

/// First file named exactly `name` anywhere under `dir` (depth-first, name-sorted).
pub fn find_file(dir: &Path, name: &str) -> Option<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| entry.file_type().is_file() && entry.file_name() == name)
        .map(|entry| entry.into_path())
}

/// Documents under `dir` with a matching extension, one per distinct base name.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_documents<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Vec<SourceDocument> {
    let paths = match discover_documents(dir, extensions) {
        Ok(paths) => paths,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Cannot list source documents");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            seen.insert(name.clone()).then_some(SourceDocument {
                name,
                path: Some(path),
            })
        })
        .collect()
}

/// Appends the "Source Documents" footer listing `sources` by name.
pub fn annotate(text: &str, sources: &[SourceDocument]) -> String {
    let names: String = sources.iter().map(|s| format!("\n{}", s.name)).collect();
    format!("{text}\n\nSource Documents:{names}\n")
}
