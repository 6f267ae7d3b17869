//! Output writing for a cleaning run: the cleaned record set and stats
//! report as pretty JSON, plus a CSV summary for eyeballing in a
//! spreadsheet.

use std::path::{Path, PathBuf};

use anyhow::Context;

use dmap_core::Record;
use dmap_pipeline::CleanStats;

pub(crate) struct OutputPaths {
    pub records: PathBuf,
    pub stats: PathBuf,
    pub csv: PathBuf,
}

/// Write all three output files into `out_dir`, creating it if needed.
/// `stamp` is the run timestamp embedded in the filenames.
pub(crate) fn write_outputs(
    out_dir: &Path,
    stamp: &str,
    records: &[Record],
    stats: &CleanStats,
) -> anyhow::Result<OutputPaths> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    let records_path = out_dir.join(format!("all_providers_{stamp}.json"));
    let records_json =
        serde_json::to_vec_pretty(records).context("failed to serialize cleaned records")?;
    std::fs::write(&records_path, records_json)
        .with_context(|| format!("failed to write {}", records_path.display()))?;

    let stats_path = out_dir.join(format!("cleaning_stats_{stamp}.json"));
    let stats_json =
        serde_json::to_vec_pretty(stats).context("failed to serialize cleaning stats")?;
    std::fs::write(&stats_path, stats_json)
        .with_context(|| format!("failed to write {}", stats_path.display()))?;

    let csv_path = out_dir.join(format!("all_providers_{stamp}.csv"));
    std::fs::write(&csv_path, render_csv(records))
        .with_context(|| format!("failed to write {}", csv_path.display()))?;

    Ok(OutputPaths {
        records: records_path,
        stats: stats_path,
        csv: csv_path,
    })
}

fn render_csv(records: &[Record]) -> String {
    let mut out = String::from(
        "name,phone,website,website_status,city,state,rating,reviews,quality_score\n",
    );

    for record in records {
        let website_status = match (&record.website_check, record.has_website()) {
            (Some(check), _) => check.verdict(),
            (None, true) => "unchecked".to_owned(),
            (None, false) => "no_url".to_owned(),
        };

        let number = |value: Option<String>| value.unwrap_or_default();

        out.push_str(&format!(
            "\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",{},{},{}\n",
            sanitize(record.name.as_deref().unwrap_or("")),
            sanitize(record.phone.as_deref().unwrap_or("")),
            sanitize(record.website.as_deref().unwrap_or("")),
            website_status,
            sanitize(&extra_text(record, "city")),
            sanitize(&extra_text(record, "state")),
            number(record.rating.map(|r| r.to_string())),
            number(record.review_count.map(|n| n.to_string())),
            number(record.quality_score.map(|s| s.to_string())),
        ));
    }

    out
}

/// Quoted CSV fields are sanitized rather than escaped: commas become
/// spaces and double quotes become single quotes, the same policy the
/// downstream spreadsheet import already expects.
fn sanitize(value: &str) -> String {
    value.replace(',', " ").replace('"', "'")
}

fn extra_text(record: &Record, key: &str) -> String {
    record
        .extra
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_owned()
}
