//! Raw batch loading from a directory of per-state JSON files.
//!
//! Acquisition scripts write one JSON array of records per geography
//! (`north_carolina.json`, `ohio.json`, ...) plus a `pull_summary.json`
//! manifest that is not a batch. Files load in sorted filename order so
//! repeated runs see the same input order — the deduplicator's survivor
//! choice depends on it.

use std::path::{Path, PathBuf};

use anyhow::Context;

use dmap_core::Record;
use dmap_pipeline::RawBatch;

const SUMMARY_FILE: &str = "pull_summary.json";

/// Load every `*.json` batch file under `raw_dir`.
///
/// An unreadable or unparseable batch file is fatal for the run —
/// partial input would silently skew dedup and the statistics report.
pub(crate) fn load_batches(raw_dir: &Path) -> anyhow::Result<Vec<RawBatch>> {
    let entries = std::fs::read_dir(raw_dir)
        .with_context(|| format!("failed to read raw directory {}", raw_dir.display()))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to list raw directory {}", raw_dir.display()))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if path.file_name().and_then(|n| n.to_str()) == Some(SUMMARY_FILE) {
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    let mut batches = Vec::with_capacity(paths.len());
    for path in paths {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read batch file {}", path.display()))?;
        let records: Vec<Record> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse batch file {}", path.display()))?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");
        batches.push(RawBatch {
            state: state_label(stem),
            records,
        });
    }

    Ok(batches)
}

/// Derive the human source label from a batch file stem:
/// `"north_carolina"` → `"North Carolina"`.
fn state_label(stem: &str) -> String {
    stem.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            let first = chars
                .next()
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_default();
            format!("{first}{}", chars.as_str().to_lowercase())
        })
        .collect::<Vec<_>>()
        .join(" ")
}
