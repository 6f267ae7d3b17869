//! The `clean` command: load raw batches, run the cleaning pipeline,
//! and write the cleaned record set, stats report, and CSV summary.

use std::time::Duration;

use anyhow::Context;

use dmap_core::{load_policy, AppConfig, Policy, Record};
use dmap_pipeline::{
    CleanStats, HttpProbe, Pipeline, RawBatch, UrlProbe, WebsiteValidator,
};

use crate::{ingest, output};

/// Run the full cleaning pipeline over the configured raw directory.
///
/// When `dry_run` is `true`, prints the batches that would be processed
/// and returns before any network traffic. When `skip_validation` is
/// `true`, stops after the synchronous classify/dedupe/score phase.
///
/// # Errors
///
/// Returns an error for collaborator-level failures only: unreadable
/// configuration, an unreadable or unparseable batch file, or an output
/// directory that cannot be written. Per-record and per-probe problems
/// are absorbed into the statistics report.
pub(crate) async fn run_clean(
    config: &AppConfig,
    dry_run: bool,
    skip_validation: bool,
) -> anyhow::Result<()> {
    let policy = match &config.policy_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading keyword policy");
            load_policy(path)
                .with_context(|| format!("failed to load policy from {}", path.display()))?
        }
        None => Policy::default(),
    };

    let batches = ingest::load_batches(&config.raw_dir)?;
    if batches.is_empty() {
        anyhow::bail!(
            "no raw batch files found in {}",
            config.raw_dir.display()
        );
    }

    if dry_run {
        println!("dry-run: would clean {} batch(es):", batches.len());
        for batch in &batches {
            println!("  {:<20} {:>6} records", batch.state, batch.records.len());
        }
        return Ok(());
    }

    let total_raw: usize = batches.iter().map(|b| b.records.len()).sum();
    println!(
        "Cleaning {} records from {} batch(es)...",
        total_raw,
        batches.len()
    );

    let probe = HttpProbe::new(config.probe_timeout_secs, &config.probe_user_agent)?;
    let validator = WebsiteValidator::new(
        probe,
        Duration::from_secs(config.probe_timeout_secs),
        config.probe_concurrency,
    );
    let pipeline = Pipeline::new(policy, validator);

    let (records, stats) = if skip_validation {
        pipeline.clean(batches)
    } else {
        run_with_progress(&pipeline, batches).await
    };

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M").to_string();
    let paths = output::write_outputs(&config.out_dir, &stamp, &records, &stats)?;

    print_summary(&stats);
    println!("Saved:");
    println!("  {}", paths.records.display());
    println!("  {}", paths.stats.display());
    println!("  {}", paths.csv.display());

    Ok(())
}

/// Drive the pipeline while printing incremental validation progress.
/// The progress handle never blocks the run; it just samples the count
/// of settled probes once a second.
async fn run_with_progress<P: UrlProbe + Sync>(
    pipeline: &Pipeline<P>,
    batches: Vec<RawBatch>,
) -> (Vec<Record>, CleanStats) {
    let progress = pipeline.progress();
    let run = pipeline.run(batches);
    tokio::pin!(run);

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick fires immediately; swallow it so the first printed
    // count is meaningful.
    ticker.tick().await;

    loop {
        tokio::select! {
            result = &mut run => break result,
            _ = ticker.tick() => {
                println!("  validated {} websites so far...", progress.completed());
            }
        }
    }
}

fn print_summary(stats: &CleanStats) {
    println!("Cleaning summary:");
    println!("  raw records:      {}", stats.total_raw);
    println!("  after filtering:  {}", stats.total_after_filter);
    println!("  duplicates:       {}", stats.duplicates_removed);
    println!("  clean records:    {}", stats.total_clean);
    if stats.websites_checked > 0 {
        println!(
            "  websites checked: {} ({} reachable, {} unreachable)",
            stats.websites_checked, stats.websites_reachable, stats.websites_unreachable
        );
    }
    if !stats.removed.is_empty() {
        println!("  removals by reason:");
        for (reason, count) in &stats.removed {
            println!("    {count:>5}  {reason}");
        }
    }
}
