//! End-to-end tests for the full cleaning pipeline over a fake probe.

use std::time::Duration;

use serde_json::json;

use dmap_core::{Policy, Record};
use dmap_pipeline::{
    Pipeline, ProbeError, ProbeResponse, RawBatch, UrlProbe, WebsiteValidator,
};

/// Probe that answers 200 for every URL without touching the network.
struct AlwaysUpProbe;

impl UrlProbe for AlwaysUpProbe {
    async fn probe(&self, url: &str) -> Result<ProbeResponse, ProbeError> {
        Ok(ProbeResponse {
            status: 200,
            final_url: url.to_owned(),
        })
    }
}

fn pipeline() -> Pipeline<AlwaysUpProbe> {
    let validator = WebsiteValidator::new(AlwaysUpProbe, Duration::from_secs(5), 4);
    Pipeline::new(Policy::default(), validator)
}

fn record(fields: serde_json::Value) -> Record {
    serde_json::from_value(fields).expect("valid test record")
}

#[tokio::test]
async fn three_record_batch_end_to_end() {
    // One record missing a name, one phone-duplicate of an earlier
    // record, one valid and unique.
    let batch = RawBatch {
        state: "North Carolina".to_owned(),
        records: vec![
            record(json!({
                "name": "Ajax Dumpster Rental",
                "phone": "(919) 555-0101",
                "address": "400 Quarry Road East, Raleigh",
                "website": "https://ajaxdumpsters.com",
                "rating": 4.9,
                "review_count": 80
            })),
            record(json!({
                "phone": "555-0199",
                "address": "1 Nameless Way, Raleigh"
            })),
            record(json!({
                "name": "Ajax Dumpsters (Durham)",
                "phone": "+1 919 555 0101",
                "address": "77 Somewhere Else Entirely, Durham"
            })),
        ],
    };

    let (records, stats) = pipeline().run(vec![batch]).await;

    assert_eq!(records.len(), 2, "expected 2 clean records, got {records:?}");
    assert_eq!(stats.total_raw, 3);
    assert_eq!(stats.removed.get("missing_name"), Some(&1));
    assert_eq!(stats.total_after_filter, 2);
    assert_eq!(stats.duplicates_removed, 1);
    assert_eq!(stats.total_clean, 2);

    // The earlier-indexed record of the duplicate pair survives.
    let survivor_names: Vec<_> = records
        .iter()
        .map(|r| r.name.as_deref().unwrap_or(""))
        .collect();
    assert!(survivor_names.contains(&"Ajax Dumpster Rental"));
    assert!(!survivor_names.contains(&"Ajax Dumpsters (Durham)"));

    let per_state = stats.by_state.get("North Carolina").unwrap();
    assert_eq!(per_state.raw, 3);
    assert_eq!(per_state.kept, 2);
    assert_eq!(per_state.removed.get("missing_name"), Some(&1));
}

#[tokio::test]
async fn survivors_are_tagged_with_their_source_state() {
    let batch = RawBatch {
        state: "Ohio".to_owned(),
        records: vec![record(json!({
            "name": "Buckeye Bins",
            "phone": "6145550142",
            "address": "9 Long Warehouse Road, Columbus"
        }))],
    };

    let (records, _) = pipeline().run(vec![batch]).await;
    assert_eq!(records[0].source_state.as_deref(), Some("Ohio"));
}

#[tokio::test]
async fn dedup_spans_batches_not_just_one_source() {
    let make_batch = |state: &str, name: &str| RawBatch {
        state: state.to_owned(),
        records: vec![record(json!({
            "name": name,
            "phone": "9195550101",
            "address": format!("400 Quarry Road East, {state}")
        }))],
    };

    let (records, stats) = pipeline()
        .run(vec![
            make_batch("North Carolina", "Ajax Raleigh"),
            make_batch("Virginia", "Ajax Richmond"),
        ])
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(stats.duplicates_removed, 1);
    assert_eq!(records[0].name.as_deref(), Some("Ajax Raleigh"));
}

#[tokio::test]
async fn records_without_websites_bypass_validation_untouched() {
    let batch = RawBatch {
        state: "Ohio".to_owned(),
        records: vec![
            record(json!({
                "name": "Sited",
                "phone": "6145550142",
                "address": "9 Long Warehouse Road, Columbus",
                "website": "https://sited.example.com"
            })),
            record(json!({
                "name": "Unsited",
                "phone": "6145550143",
                "address": "11 Long Warehouse Road, Columbus"
            })),
        ],
    };

    let (records, stats) = pipeline().run(vec![batch]).await;

    let sited = records
        .iter()
        .find(|r| r.name.as_deref() == Some("Sited"))
        .unwrap();
    let unsited = records
        .iter()
        .find(|r| r.name.as_deref() == Some("Unsited"))
        .unwrap();

    assert!(sited.website_check.is_some());
    assert!(unsited.website_check.is_none());
    assert_eq!(stats.websites_checked, 1);
    assert_eq!(stats.websites_reachable, 1);
    assert_eq!(stats.websites_unreachable, 0);
}

#[tokio::test]
async fn output_is_sorted_by_descending_score_with_stable_ties() {
    let batch = RawBatch {
        state: "Ohio".to_owned(),
        records: vec![
            // Low score: name + phone + address only.
            record(json!({
                "name": "Sparse",
                "phone": "6145550141",
                "address": "100 First Industrial Court, Columbus"
            })),
            // High score: everything populated.
            record(json!({
                "name": "Rich",
                "phone": "6145550142",
                "address": "200 Second Industrial Court, Columbus",
                "website": "https://rich.example.com",
                "verified": true,
                "business_status": "OPERATIONAL",
                "review_count": 90,
                "rating": 4.9,
                "photo_count": 40
            })),
            // Ties with "Sparse"; must stay after it (input order).
            record(json!({
                "name": "Sparse Too",
                "phone": "6145550143",
                "address": "300 Third Industrial Court, Columbus"
            })),
        ],
    };

    let (records, _) = pipeline().run(vec![batch]).await;

    let names: Vec<_> = records
        .iter()
        .map(|r| r.name.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(names, ["Rich", "Sparse", "Sparse Too"]);

    let scores: Vec<f64> = records
        .iter()
        .map(|r| r.quality_score.unwrap_or(0.0))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn stale_annotations_are_recomputed_not_inherited() {
    // A record arriving with a quality_score already set (say, from a
    // previous run's output) gets a fresh score.
    let mut stale = record(json!({
        "name": "Ajax",
        "phone": "9195550101",
        "address": "400 Quarry Road East, Raleigh"
    }));
    stale.quality_score = Some(0.99);

    let batch = RawBatch {
        state: "North Carolina".to_owned(),
        records: vec![stale],
    };

    let (records, _) = pipeline().run(vec![batch]).await;
    // name + phone + address = 3 / 8.5 = 0.35294... → 0.35
    assert!((records[0].quality_score.unwrap() - 0.35).abs() < f64::EPSILON);
}

#[tokio::test]
async fn clean_alone_skips_validation() {
    let batch = RawBatch {
        state: "Ohio".to_owned(),
        records: vec![record(json!({
            "name": "Sited",
            "phone": "6145550142",
            "address": "9 Long Warehouse Road, Columbus",
            "website": "https://sited.example.com"
        }))],
    };

    let (records, stats) = pipeline().clean(vec![batch]);
    assert_eq!(records.len(), 1);
    assert!(records[0].website_check.is_none());
    assert_eq!(stats.websites_checked, 0);
    assert_eq!(stats.total_clean, 1);
}
