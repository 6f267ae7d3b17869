//! Aggregate statistics for one cleaning run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Run-level statistics emitted next to the cleaned record set.
///
/// Maps are `BTreeMap` so serialized reports are deterministically
/// ordered and diffable between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanStats {
    /// Records read across all input batches.
    pub total_raw: usize,
    /// Classifier rejections, keyed by reason label.
    pub removed: BTreeMap<String, usize>,
    /// Records surviving classification, before dedup.
    pub total_after_filter: usize,
    /// Records dropped as duplicates.
    pub duplicates_removed: usize,
    /// Final record count after dedup.
    pub total_clean: usize,
    /// Per-source breakdown, keyed by source/state label.
    pub by_state: BTreeMap<String, StateStats>,
    /// Records that had a website and were probed.
    pub websites_checked: usize,
    /// Probed records whose site answered with status < 400.
    pub websites_reachable: usize,
    /// Probed records whose site did not.
    pub websites_unreachable: usize,
    /// Unreachable tally keyed by verdict label
    /// (`"unreachable:404"`, `"unreachable:timeout"`, ...).
    pub unreachable_by_verdict: BTreeMap<String, usize>,
}

/// One input source's subtotals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateStats {
    pub raw: usize,
    pub kept: usize,
    pub removed: BTreeMap<String, usize>,
}

impl CleanStats {
    /// Tally one classifier rejection against the overall and per-source
    /// counters.
    pub fn record_rejection(&mut self, state: &str, label: String) {
        *self.removed.entry(label.clone()).or_insert(0) += 1;
        let state_stats = self.by_state.entry(state.to_owned()).or_default();
        *state_stats.removed.entry(label).or_insert(0) += 1;
    }
}
