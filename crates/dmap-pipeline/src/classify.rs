//! Rule-based accept/reject classification of raw provider records.
//!
//! The rules form an ordered decision list evaluated top to bottom with
//! the first match winning. Order is load-bearing: the later keyword
//! rules are coarser supersets of the earlier structural rules, so a
//! permanently closed Home Depot must report `closed_permanently`, not
//! `big_box_retailer`.

use dmap_core::{BusinessStatus, Policy, Record};

/// Outcome of classifying one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Record passes every rule and proceeds to deduplication.
    Keep,
    /// Record is dropped; the reason is tallied in the run statistics.
    Reject(RejectReason),
}

impl Classification {
    #[must_use]
    pub fn is_keep(&self) -> bool {
        matches!(self, Classification::Keep)
    }
}

/// Why a record was rejected. Keyword rules carry the matched substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    MissingName,
    MissingContact,
    MissingAddress,
    ClosedPermanently,
    BigBoxRetailer(String),
    NationalChain(String),
    JunkRemovalOnly(String),
    NonDumpster(String),
}

impl RejectReason {
    /// Statistics key for this rejection, e.g. `"big_box_retailer:lowes"`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::MissingName => "missing_name".to_owned(),
            Self::MissingContact => "missing_contact".to_owned(),
            Self::MissingAddress => "missing_address".to_owned(),
            Self::ClosedPermanently => "closed_permanently".to_owned(),
            Self::BigBoxRetailer(m) => format!("big_box_retailer:{m}"),
            Self::NationalChain(m) => format!("national_chain:{m}"),
            Self::JunkRemovalOnly(m) => format!("junk_removal_only:{m}"),
            Self::NonDumpster(m) => format!("non_dumpster:{m}"),
        }
    }
}

/// Classifier over a fixed keyword [`Policy`].
///
/// The policy is immutable for the classifier's lifetime; running with a
/// different policy set (another business vertical, say) means building
/// another classifier, not mutating shared lists.
pub struct Classifier {
    policy: Policy,
}

impl Classifier {
    #[must_use]
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    /// Classify one record. Total: every record gets exactly one outcome.
    ///
    /// Rules, in order: missing name → missing contact (no phone AND no
    /// website) → missing address → permanently closed → big-box
    /// retailer name → national chain name → junk-removal-only brand
    /// (category says junk removal, not dumpster) → non-dumpster
    /// keyword in name or category → keep.
    #[must_use]
    pub fn classify(&self, record: &Record) -> Classification {
        use Classification::{Keep, Reject};

        if !record.has_name() {
            return Reject(RejectReason::MissingName);
        }
        if !record.has_phone() && !record.has_website() {
            return Reject(RejectReason::MissingContact);
        }
        if !record.has_address() {
            return Reject(RejectReason::MissingAddress);
        }
        if matches!(
            record.business_status,
            Some(BusinessStatus::ClosedPermanently)
        ) {
            return Reject(RejectReason::ClosedPermanently);
        }

        // All keyword matching is case-insensitive substring matching;
        // policy entries are lowercased at load time.
        let name = record.name.as_deref().unwrap_or("").to_lowercase();
        let category = record.category.as_deref().unwrap_or("").to_lowercase();

        if let Some(m) = first_match(&name, &self.policy.big_box_retailers) {
            return Reject(RejectReason::BigBoxRetailer(m));
        }
        if let Some(m) = first_match(&name, &self.policy.national_chains) {
            return Reject(RejectReason::NationalChain(m));
        }
        if category.contains("junk removal") && !category.contains("dumpster") {
            if let Some(m) = first_match(&name, &self.policy.junk_removal_brands) {
                return Reject(RejectReason::JunkRemovalOnly(m));
            }
        }
        if let Some(m) = self
            .policy
            .non_dumpster_keywords
            .iter()
            .find(|kw| name.contains(kw.as_str()) || category.contains(kw.as_str()))
        {
            return Reject(RejectReason::NonDumpster(m.clone()));
        }

        Keep
    }
}

fn first_match(haystack: &str, needles: &[String]) -> Option<String> {
    needles
        .iter()
        .find(|needle| haystack.contains(needle.as_str()))
        .cloned()
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
