use std::path::Path;

use tracing::warn;

use crate::core::record::AnnotationRecord;

/// Collect annotation records from files and folders.
///
/// Each JSON file holds one record object. Folders are scanned
/// non-recursively for `*.json`. Missing paths and unreadable or unparsable
/// files are warned about and skipped; input discovery is best-effort, the
/// usable-input check happens later in the classifier.
pub fn collect_records(paths: &[impl AsRef<Path>]) -> Vec<AnnotationRecord> {
    let mut records = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Path {} not found", path.display());
        } else if path.is_file() {
            if let Some(record) = read_record(path) {
                records.push(record);
            }
        } else {
            records.extend(read_folder(path));
        }
    }
    records
}

fn read_record(path: &Path) -> Option<AnnotationRecord> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!("Cannot read file {}: {err}", path.display());
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!("Cannot parse file {}: {err}", path.display());
            None
        }
    }
}

fn read_folder(dir: &Path) -> Vec<AnnotationRecord> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Cannot list folder {}: {err}", dir.display());
            return Vec::new();
        }
    };
    let mut paths: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    paths.sort();
    paths.iter().filter_map(|path| read_record(path)).collect()
}
