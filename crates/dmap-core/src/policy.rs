use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Keyword policy driving the classifier and the dedup domain exclusion.
///
/// All matching in the pipeline is case-insensitive substring matching,
/// so entries are normalized to lowercase at load time. An empty list is
/// valid and simply disables the corresponding rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Hardware/big-box chains that resell dumpster services.
    pub big_box_retailers: Vec<String>,
    /// National waste haulers tracked separately with first-party data.
    pub national_chains: Vec<String>,
    /// Junk-removal-only brands (no roll-off rental).
    pub junk_removal_brands: Vec<String>,
    /// Adjacent-but-wrong verticals: storage, moving, portable toilets,
    /// septic, and similar.
    pub non_dumpster_keywords: Vec<String>,
    /// Listing-platform domains that must never act as a dedup key; a
    /// shared facebook.com page does not make two businesses one.
    pub platform_domains: Vec<String>,
}

impl Default for Policy {
    fn default() -> Self {
        let list = |items: &[&str]| items.iter().map(|s| (*s).to_owned()).collect();
        Self {
            big_box_retailers: list(&[
                "home depot",
                "lowe's",
                "lowes",
                "menards",
                "ace hardware",
                "true value",
                "harbor freight",
                "northern tool",
            ]),
            national_chains: list(&[
                "waste management",
                "republic services",
                "waste connections",
                "advanced disposal",
                "casella",
                "gfl environmental",
                "waste industries",
                "rumpke",
                "waste pro",
            ]),
            junk_removal_brands: list(&[
                "junk removal",
                "junk hauling",
                "1-800-got-junk",
                "college hunks",
                "junkluggers",
                "junk king",
            ]),
            non_dumpster_keywords: list(&[
                "portable toilet",
                "porta potty",
                "porta-potty",
                "portaloo",
                "storage unit",
                "self storage",
                "mini storage",
                "moving company",
                "movers",
                "u-haul",
                "penske",
                "septic",
                "grease trap",
                "portable restroom",
            ]),
            platform_domains: list(&["facebook.com", "yelp.com", "google.com"]),
        }
    }
}

/// Load and validate a keyword policy from a YAML file.
///
/// Lists omitted from the file fall back to the built-in defaults for
/// that list; entries are lowercased after validation.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_policy(path: &Path) -> Result<Policy, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PolicyFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let policy: Policy = serde_yaml::from_str(&content)?;
    validate_policy(&policy)?;

    Ok(normalize_policy(policy))
}

fn validate_policy(policy: &Policy) -> Result<(), ConfigError> {
    let lists = [
        ("big_box_retailers", &policy.big_box_retailers),
        ("national_chains", &policy.national_chains),
        ("junk_removal_brands", &policy.junk_removal_brands),
        ("non_dumpster_keywords", &policy.non_dumpster_keywords),
        ("platform_domains", &policy.platform_domains),
    ];

    for (list_name, entries) in lists {
        for entry in entries {
            if entry.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{list_name} contains an empty entry"
                )));
            }
        }
    }

    Ok(())
}

fn normalize_policy(policy: Policy) -> Policy {
    let lower = |entries: Vec<String>| {
        entries
            .into_iter()
            .map(|e| e.trim().to_lowercase())
            .collect()
    };
    Policy {
        big_box_retailers: lower(policy.big_box_retailers),
        national_chains: lower(policy.national_chains),
        junk_removal_brands: lower(policy.junk_removal_brands),
        non_dumpster_keywords: lower(policy.non_dumpster_keywords),
        platform_domains: lower(policy.platform_domains),
    }
}
