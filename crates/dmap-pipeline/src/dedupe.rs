//! Cross-source duplicate detection over normalized comparison keys.
//!
//! A listing pulled for two neighboring cities, or present in two
//! directory sources, shows up as near-identical records that share a
//! phone number, an address, or a website domain. The deduplicator
//! scans the accepted batch strictly in input order and keeps the first
//! record to introduce each key.
//!
//! The policy is greedy, not transitive: a record judged duplicate by
//! one key does not register its remaining keys, so two records that
//! only chain through a dropped middle record both survive. Which
//! record survives a cluster therefore depends on input order — an
//! externally observable property that downstream consumers rely on.

use std::collections::HashMap;

use dmap_core::Record;

use crate::normalize::{extract_domain, normalize_address, normalize_phone};

/// A phone key is usable only as a full 10-digit US number.
const PHONE_KEY_LEN: usize = 10;

/// Address keys shorter than this are too generic to identify a
/// business (bare street numbers, city-only strings).
const MIN_ADDRESS_KEY_LEN: usize = 15;

/// Result of one deduplication pass.
#[derive(Debug)]
pub struct DedupOutcome {
    /// Survivors in their original relative order.
    pub survivors: Vec<Record>,
    /// How many records were dropped as duplicates.
    pub duplicates: usize,
}

/// Duplicate detector scoped to a single pipeline run.
///
/// The three key tables live on the instance and die with it; repeated
/// runs in tests or a long-lived service never observe each other's
/// keys. Table values record the `place_id` of the key's introducing
/// record as provenance for debugging.
pub struct Deduper {
    platform_domains: Vec<String>,
    seen_phones: HashMap<String, Option<String>>,
    seen_addresses: HashMap<String, Option<String>>,
    seen_domains: HashMap<String, Option<String>>,
}

impl Deduper {
    /// `platform_domains` are listing-platform domains (already
    /// lowercased) that never count as a domain key.
    #[must_use]
    pub fn new(platform_domains: Vec<String>) -> Self {
        Self {
            platform_domains,
            seen_phones: HashMap::new(),
            seen_addresses: HashMap::new(),
            seen_domains: HashMap::new(),
        }
    }

    /// Scan `records` in order, keeping the first record for every key.
    ///
    /// Consumes the deduper: the key tables are one run's state.
    /// Determinism depends only on the input order — the tables are
    /// only ever probed for membership, never iterated.
    #[must_use]
    pub fn dedupe(mut self, records: Vec<Record>) -> DedupOutcome {
        let mut survivors = Vec::with_capacity(records.len());
        let mut duplicates = 0usize;

        for record in records {
            if self.is_duplicate(&record) {
                duplicates += 1;
            } else {
                survivors.push(record);
            }
        }

        DedupOutcome {
            survivors,
            duplicates,
        }
    }

    /// Check the record's keys in fixed order (phone, address, domain).
    /// Any hit makes it a duplicate and nothing is registered; only a
    /// surviving record enters its keys into the tables.
    fn is_duplicate(&mut self, record: &Record) -> bool {
        let phone_key = Some(normalize_phone(record.phone.as_deref().unwrap_or("")))
            .filter(|digits| digits.len() == PHONE_KEY_LEN);

        let address_key = Some(normalize_address(record.address.as_deref().unwrap_or("")))
            .filter(|addr| addr.len() > MIN_ADDRESS_KEY_LEN);

        let domain_key = Some(extract_domain(record.website.as_deref().unwrap_or("")))
            .filter(|domain| {
                !domain.is_empty() && !self.platform_domains.iter().any(|p| p == domain)
            });

        if phone_key
            .as_ref()
            .is_some_and(|key| self.seen_phones.contains_key(key))
        {
            return true;
        }
        if address_key
            .as_ref()
            .is_some_and(|key| self.seen_addresses.contains_key(key))
        {
            return true;
        }
        if domain_key
            .as_ref()
            .is_some_and(|key| self.seen_domains.contains_key(key))
        {
            return true;
        }

        // No key matched: this record is its clusters' survivor and all
        // of its keys enter the tables.
        if let Some(key) = phone_key {
            self.seen_phones.insert(key, record.place_id.clone());
        }
        if let Some(key) = address_key {
            self.seen_addresses.insert(key, record.place_id.clone());
        }
        if let Some(key) = domain_key {
            self.seen_domains.insert(key, record.place_id.clone());
        }

        false
    }
}
