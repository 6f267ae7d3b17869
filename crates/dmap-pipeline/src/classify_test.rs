use dmap_core::Policy;
use serde_json::json;

use super::*;

fn classifier() -> Classifier {
    Classifier::new(Policy::default())
}

/// A record that passes every rule.
fn keepable() -> Record {
    serde_json::from_value(json!({
        "name": "Ajax Dumpster Rental",
        "phone": "+1 (919) 555-0144",
        "address": "12 Quarry Rd, Raleigh, NC",
        "website": "https://ajaxdumpsters.com",
        "category": "Dumpster rental service",
        "business_status": "OPERATIONAL"
    }))
    .expect("valid test record")
}

fn with(field: &str, value: serde_json::Value) -> Record {
    let mut raw = serde_json::to_value(keepable()).unwrap();
    raw[field] = value;
    serde_json::from_value(raw).unwrap()
}

// -----------------------------------------------------------------------
// Structural rules (1–4)
// -----------------------------------------------------------------------

#[test]
fn keeps_a_complete_record() {
    assert_eq!(classifier().classify(&keepable()), Classification::Keep);
}

#[test]
fn rejects_missing_name() {
    let record = with("name", json!(null));
    assert_eq!(
        classifier().classify(&record),
        Classification::Reject(RejectReason::MissingName)
    );
    let record = with("name", json!(""));
    assert_eq!(
        classifier().classify(&record),
        Classification::Reject(RejectReason::MissingName)
    );
}

#[test]
fn rejects_missing_contact_only_when_both_phone_and_website_absent() {
    let mut record = keepable();
    record.phone = None;
    record.website = None;
    assert_eq!(
        classifier().classify(&record),
        Classification::Reject(RejectReason::MissingContact)
    );

    // Either contact channel alone is enough.
    let mut record = keepable();
    record.phone = None;
    assert_eq!(classifier().classify(&record), Classification::Keep);
    let mut record = keepable();
    record.website = Some(String::new());
    assert_eq!(classifier().classify(&record), Classification::Keep);
}

#[test]
fn rejects_missing_address() {
    let mut record = keepable();
    record.address = None;
    assert_eq!(
        classifier().classify(&record),
        Classification::Reject(RejectReason::MissingAddress)
    );
}

#[test]
fn rejects_closed_permanently() {
    let record = with("business_status", json!("CLOSED_PERMANENTLY"));
    assert_eq!(
        classifier().classify(&record),
        Classification::Reject(RejectReason::ClosedPermanently)
    );
}

#[test]
fn unknown_business_status_is_not_closed() {
    let record = with("business_status", json!("CLOSED_TEMPORARILY"));
    assert_eq!(classifier().classify(&record), Classification::Keep);
}

// -----------------------------------------------------------------------
// Keyword rules (5–8)
// -----------------------------------------------------------------------

#[test]
fn rejects_big_box_retailer_case_insensitively() {
    let record = with("name", json!("THE HOME DEPOT #4512"));
    assert_eq!(
        classifier().classify(&record),
        Classification::Reject(RejectReason::BigBoxRetailer("home depot".to_owned()))
    );
}

#[test]
fn rejects_national_chain() {
    let record = with("name", json!("Waste Management of Durham"));
    assert_eq!(
        classifier().classify(&record),
        Classification::Reject(RejectReason::NationalChain("waste management".to_owned()))
    );
}

#[test]
fn rejects_junk_removal_brand_when_category_is_junk_removal_only() {
    let mut record = with("name", json!("Junk King Raleigh"));
    record.category = Some("Junk removal service".to_owned());
    assert_eq!(
        classifier().classify(&record),
        Classification::Reject(RejectReason::JunkRemovalOnly("junk king".to_owned()))
    );
}

#[test]
fn keeps_junk_removal_brand_when_category_also_mentions_dumpster() {
    let mut record = with("name", json!("Junk King Raleigh"));
    record.category = Some("Junk removal service, Dumpster rental service".to_owned());
    assert_eq!(classifier().classify(&record), Classification::Keep);
}

#[test]
fn junk_removal_rule_needs_a_brand_match_in_the_name() {
    let mut record = keepable();
    record.category = Some("Junk removal service".to_owned());
    // Name matches no junk-removal brand, and "junk removal" is not a
    // non-dumpster keyword, so the record is kept.
    assert_eq!(classifier().classify(&record), Classification::Keep);
}

#[test]
fn rejects_non_dumpster_keyword_in_name() {
    let record = with("name", json!("Raleigh Septic Specialists"));
    assert_eq!(
        classifier().classify(&record),
        Classification::Reject(RejectReason::NonDumpster("septic".to_owned()))
    );
}

#[test]
fn rejects_non_dumpster_keyword_in_category() {
    let mut record = keepable();
    record.category = Some("Self storage facility".to_owned());
    assert_eq!(
        classifier().classify(&record),
        Classification::Reject(RejectReason::NonDumpster("self storage".to_owned()))
    );
}

// -----------------------------------------------------------------------
// Rule priority
// -----------------------------------------------------------------------

#[test]
fn closed_permanently_wins_over_big_box_name() {
    let mut record = with("name", json!("Home Depot Tool Rental"));
    record.business_status =
        serde_json::from_value(json!("CLOSED_PERMANENTLY")).unwrap();
    assert_eq!(
        classifier().classify(&record),
        Classification::Reject(RejectReason::ClosedPermanently)
    );
}

#[test]
fn missing_name_wins_over_everything() {
    let mut record = keepable();
    record.name = None;
    record.phone = None;
    record.website = None;
    record.address = None;
    assert_eq!(
        classifier().classify(&record),
        Classification::Reject(RejectReason::MissingName)
    );
}

#[test]
fn big_box_wins_over_national_chain() {
    // A pathological name matching both lists: rule 5 fires first.
    let record = with("name", json!("Lowes Waste Management Depot"));
    assert_eq!(
        classifier().classify(&record),
        Classification::Reject(RejectReason::BigBoxRetailer("lowes".to_owned()))
    );
}

// -----------------------------------------------------------------------
// Policy configurability
// -----------------------------------------------------------------------

#[test]
fn empty_keyword_lists_reject_nothing() {
    let policy = Policy {
        big_box_retailers: vec![],
        national_chains: vec![],
        junk_removal_brands: vec![],
        non_dumpster_keywords: vec![],
        ..Policy::default()
    };
    let classifier = Classifier::new(policy);

    let record = with("name", json!("Home Depot Septic & Storage"));
    assert_eq!(classifier.classify(&record), Classification::Keep);
}

#[test]
fn custom_policy_list_is_honored() {
    let policy = Policy {
        national_chains: vec!["megahaul".to_owned()],
        ..Policy::default()
    };
    let classifier = Classifier::new(policy);
    let record = with("name", json!("MegaHaul of Raleigh"));
    assert_eq!(
        classifier.classify(&record),
        Classification::Reject(RejectReason::NationalChain("megahaul".to_owned()))
    );
}

#[test]
fn reject_labels() {
    assert_eq!(RejectReason::MissingName.label(), "missing_name");
    assert_eq!(RejectReason::MissingContact.label(), "missing_contact");
    assert_eq!(RejectReason::MissingAddress.label(), "missing_address");
    assert_eq!(RejectReason::ClosedPermanently.label(), "closed_permanently");
    assert_eq!(
        RejectReason::BigBoxRetailer("lowes".to_owned()).label(),
        "big_box_retailer:lowes"
    );
    assert_eq!(
        RejectReason::NonDumpster("septic".to_owned()).label(),
        "non_dumpster:septic"
    );
}
