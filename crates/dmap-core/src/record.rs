//! Provider record model for directory-scraped business listings.
//!
//! ## Observed input shape
//!
//! Raw batches come from places-API exports where every record is a flat
//! JSON object. Field names vary between export versions: review and
//! photo counts appear as `reviews`/`photos_count` in older pulls and as
//! `review_count`/`photo_count` in newer ones — serde aliases accept
//! both. Any field this model does not know about (city, state, zip,
//! subtypes, working hours, ...) is preserved verbatim through the
//! flattened `extra` map so cleaning never loses data.
//!
//! `business_status` is a free string in the source (`"OPERATIONAL"`,
//! `"CLOSED_PERMANENTLY"`, occasionally `"CLOSED_TEMPORARILY"` or other
//! values); unknown values round-trip unchanged instead of being
//! collapsed to a catch-all.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One candidate business listing, as scraped plus pipeline annotations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-form phone string, e.g. `"+1 (415) 555-0100"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Free-form postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Website URL; may lack a scheme (`"example.com"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Free-text category or comma-joined category list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_status: Option<BusinessStatus>,

    /// Star rating, 0–5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(
        default,
        alias = "reviews",
        skip_serializing_if = "Option::is_none"
    )]
    pub review_count: Option<u64>,

    #[serde(
        default,
        alias = "photos_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo_count: Option<u64>,

    /// Directory-level "claimed/verified" flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,

    /// External listing identifier. Used only as provenance when a dedup
    /// table records which record introduced a key — never as a dedup
    /// key itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,

    /// Completeness/trust score attached by the scorer, 0.00–1.00.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,

    /// Which geography batch this record came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_state: Option<String>,

    /// Reachability verdict attached by the website validator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_check: Option<WebsiteCheck>,

    /// Every input field this model does not know about, preserved as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    /// `true` when `name` is present and non-empty.
    #[must_use]
    pub fn has_name(&self) -> bool {
        Self::present(&self.name)
    }

    /// `true` when `phone` is present and non-empty.
    #[must_use]
    pub fn has_phone(&self) -> bool {
        Self::present(&self.phone)
    }

    /// `true` when `address` is present and non-empty.
    #[must_use]
    pub fn has_address(&self) -> bool {
        Self::present(&self.address)
    }

    /// `true` when `website` is present and non-empty.
    #[must_use]
    pub fn has_website(&self) -> bool {
        Self::present(&self.website)
    }

    // Presence means a non-empty string; a whitespace-only value counts
    // as present, matching how the upstream exports distinguish "field
    // scraped" from "field missing".
    fn present(field: &Option<String>) -> bool {
        field.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Operating status reported by the directory.
///
/// Serialized in the source's SCREAMING_SNAKE_CASE form; values outside
/// the two statuses the pipeline cares about are carried through
/// unmodified in [`BusinessStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BusinessStatus {
    Operational,
    ClosedPermanently,
    Other(String),
}

impl From<String> for BusinessStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OPERATIONAL" => Self::Operational,
            "CLOSED_PERMANENTLY" => Self::ClosedPermanently,
            _ => Self::Other(s),
        }
    }
}

impl From<BusinessStatus> for String {
    fn from(status: BusinessStatus) -> Self {
        match status {
            BusinessStatus::Operational => "OPERATIONAL".to_owned(),
            BusinessStatus::ClosedPermanently => "CLOSED_PERMANENTLY".to_owned(),
            BusinessStatus::Other(s) => s,
        }
    }
}

/// Outcome of probing one record's website for reachability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteCheck {
    /// The URL actually probed (scheme prepended when the stored value
    /// had none).
    pub url: String,

    /// HTTP status code, or a symbolic status when no response arrived.
    pub status: ProbeStatus,

    /// `true` when a response with status < 400 was obtained.
    pub reachable: bool,

    /// Final URL after redirects, when a response was obtained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
}

impl WebsiteCheck {
    /// Verdict label used for statistics aggregation: `"reachable"`,
    /// `"unreachable:404"`, `"unreachable:timeout"`,
    /// `"unreachable:no_url"`, or `"unreachable:<error-class>"`.
    #[must_use]
    pub fn verdict(&self) -> String {
        if self.reachable {
            return "reachable".to_owned();
        }
        match &self.status {
            ProbeStatus::Code(code) => format!("unreachable:{code}"),
            ProbeStatus::Timeout => "unreachable:timeout".to_owned(),
            ProbeStatus::NoUrl => "unreachable:no_url".to_owned(),
            ProbeStatus::Error(class) => format!("unreachable:{class}"),
        }
    }
}

/// Status of a single reachability probe.
///
/// Serializes as a bare integer for HTTP statuses and as a string for
/// symbolic outcomes (`"timeout"`, `"no_url"`, `"error:<class>"`), the
/// shape downstream consumers of the validated JSON already expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    /// An HTTP response arrived with this status code.
    Code(u16),
    /// The probe exceeded its per-request timeout.
    Timeout,
    /// The record had no URL to probe.
    NoUrl,
    /// The request failed before a response; carries an error class such
    /// as `connect` or `redirect`.
    Error(String),
}

impl Serialize for ProbeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProbeStatus::Code(code) => serializer.serialize_u16(*code),
            ProbeStatus::Timeout => serializer.serialize_str("timeout"),
            ProbeStatus::NoUrl => serializer.serialize_str("no_url"),
            ProbeStatus::Error(class) => {
                serializer.collect_str(&format_args!("error:{class}"))
            }
        }
    }
}

impl<'de> Deserialize<'de> for ProbeStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u16),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Code(code) => ProbeStatus::Code(code),
            Raw::Text(s) => match s.as_str() {
                "timeout" => ProbeStatus::Timeout,
                "no_url" => ProbeStatus::NoUrl,
                other => ProbeStatus::Error(
                    other.strip_prefix("error:").unwrap_or(other).to_owned(),
                ),
            },
        })
    }
}
