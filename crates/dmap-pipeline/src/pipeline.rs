//! Pipeline orchestration: classify → dedupe → score → validate.
//!
//! The orchestrator performs no rule logic and no network work of its
//! own — it sequences the stages, tags provenance, tallies statistics,
//! and keeps the output deterministically ordered. The synchronous
//! classify/dedupe/score phase must run strictly in input order (the
//! deduplicator's survivor choice depends on it); only the website
//! validation phase is concurrent.

use dmap_core::{Policy, Record};

use crate::classify::{Classification, Classifier};
use crate::dedupe::Deduper;
use crate::score::score;
use crate::stats::CleanStats;
use crate::validate::{UrlProbe, ValidationProgress, WebsiteValidator};

/// One per-geography input batch as loaded from a source.
#[derive(Debug, Clone)]
pub struct RawBatch {
    /// Source label, e.g. `"North Carolina"`.
    pub state: String,
    pub records: Vec<Record>,
}

/// Full cleaning pipeline over a [`UrlProbe`] transport.
pub struct Pipeline<P> {
    classifier: Classifier,
    platform_domains: Vec<String>,
    validator: WebsiteValidator<P>,
}

impl<P: UrlProbe + Sync> Pipeline<P> {
    #[must_use]
    pub fn new(policy: Policy, validator: WebsiteValidator<P>) -> Self {
        let platform_domains = policy.platform_domains.clone();
        Self {
            classifier: Classifier::new(policy),
            platform_domains,
            validator,
        }
    }

    /// Progress handle for the validation phase.
    #[must_use]
    pub fn progress(&self) -> ValidationProgress {
        self.validator.progress()
    }

    /// Run the synchronous phase: classification with per-source
    /// tallies, cross-batch deduplication, scoring, and a stable sort
    /// by descending quality score.
    ///
    /// Rejected records survive only as counts in the returned stats.
    #[must_use]
    pub fn clean(&self, batches: Vec<RawBatch>) -> (Vec<Record>, CleanStats) {
        let mut stats = CleanStats::default();
        let mut kept: Vec<Record> = Vec::new();

        for batch in batches {
            let RawBatch { state, records } = batch;
            let batch_raw = records.len();
            stats.total_raw += batch_raw;

            let mut batch_kept = 0usize;
            for mut record in records {
                match self.classifier.classify(&record) {
                    Classification::Keep => {
                        record.source_state = Some(state.clone());
                        batch_kept += 1;
                        kept.push(record);
                    }
                    Classification::Reject(reason) => {
                        stats.record_rejection(&state, reason.label());
                    }
                }
            }

            let state_stats = stats.by_state.entry(state).or_default();
            state_stats.raw += batch_raw;
            state_stats.kept += batch_kept;
        }

        stats.total_after_filter = kept.len();

        // Dedup runs over the whole accumulated batch, across sources.
        let outcome = Deduper::new(self.platform_domains.clone()).dedupe(kept);
        stats.duplicates_removed = outcome.duplicates;
        stats.total_clean = outcome.survivors.len();

        let mut survivors = outcome.survivors;
        for record in &mut survivors {
            // Always recomputed fresh; stale scores from a previous run
            // are overwritten, never trusted.
            record.quality_score = Some(score(record));
        }
        sort_by_score_desc(&mut survivors);

        (survivors, stats)
    }

    /// Run the whole pipeline: the synchronous phase above, then
    /// concurrent website validation over the records that have a
    /// website, with the rest merged back untouched.
    pub async fn run(&self, batches: Vec<RawBatch>) -> (Vec<Record>, CleanStats) {
        let (records, mut stats) = self.clean(batches);

        let (with_sites, without_sites): (Vec<Record>, Vec<Record>) =
            records.into_iter().partition(Record::has_website);
        stats.websites_checked = with_sites.len();

        let mut validated = self.validator.validate(with_sites).await;
        for record in &validated {
            if let Some(check) = &record.website_check {
                if check.reachable {
                    stats.websites_reachable += 1;
                } else {
                    stats.websites_unreachable += 1;
                    *stats
                        .unreachable_by_verdict
                        .entry(check.verdict())
                        .or_insert(0) += 1;
                }
            }
        }

        validated.extend(without_sites);
        sort_by_score_desc(&mut validated);

        (validated, stats)
    }
}

/// Stable descending sort by quality score; ties keep their existing
/// relative order. Scores are finite (rounded two-decimal values), so
/// the comparison is total in practice.
fn sort_by_score_desc(records: &mut [Record]) {
    records.sort_by(|a, b| {
        let a_score = a.quality_score.unwrap_or(0.0);
        let b_score = b.quality_score.unwrap_or(0.0);
        b_score
            .partial_cmp(&a_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
