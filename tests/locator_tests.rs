use dom_locator::locator::record::LOCATOR_VERSION;
use dom_locator::{Locator, LocatorError, LocatorRecord, StabilityLevel, find_element_by_xpath};
use serde_json::{Value, json};

use crate::common::fixtures::{by_attr, checkout_page, el, menu_page, page, product_page, text};

mod common;

// =========================================================================
// Record contents
// =========================================================================

#[test]
fn submit_button_records_as_tier_a() {
    let doc = checkout_page();
    let button = by_attr(&doc, "data-testid", "submit-btn");
    let record = Locator::default().generate_locator(&doc, button);

    assert_eq!(record.stability_level, StabilityLevel::A);
    assert_eq!(record.tag, "button");
    assert_eq!(record.attribute("data-testid"), Some("submit-btn"));
    assert_eq!(record.attribute("aria-label"), Some("Submit Form"));
    assert_eq!(record.text.as_deref(), Some("Submit"));
    assert_eq!(record.role.as_deref(), Some("button"));
    assert_eq!(record.stable_classes, vec!["btn"], "sc-Ax9z is generated");
    assert_eq!(record.version, LOCATOR_VERSION);
    assert!(record.created_at > 0);
}

#[test]
fn test_id_always_wins_tier_a() {
    let doc = page(vec![
        el("div", json!({ "data-testid": "bare" }), vec![]),
        el("span", json!({ "data-cy": "with-text", "role": "note" }), vec![text("Hello")]),
    ]);
    let locator = Locator::default();
    for node in [by_attr(&doc, "data-testid", "bare"), by_attr(&doc, "data-cy", "with-text")] {
        assert_eq!(locator.generate_locator(&doc, node).stability_level, StabilityLevel::A);
    }
}

#[test]
fn role_and_text_is_tier_b_and_the_rest_tier_c() {
    let doc = page(vec![
        el("a", json!({ "href": "/home" }), vec![text("Home")]),
        el("div", json!({ "class": "panel" }), vec![]),
        el("span", json!({}), vec![text("Just text")]),
        el("div", json!({ "role": "button" }), vec![]),
        el("input", json!({ "name": "q" }), vec![]),
    ]);
    let locator = Locator::default();
    let tier = |tag: &str, i: usize| {
        locator
            .generate_locator(&doc, doc.get_elements_by_tag(tag)[i])
            .stability_level
    };

    assert_eq!(tier("a", 0), StabilityLevel::B);
    assert_eq!(tier("div", 0), StabilityLevel::C, "class only");
    assert_eq!(tier("span", 0), StabilityLevel::C, "text only");
    assert_eq!(tier("div", 1), StabilityLevel::C, "role only");
    assert_eq!(tier("input", 0), StabilityLevel::C, "supplementary attribute only");
}

#[test]
fn absent_signals_are_omitted_not_empty() {
    let doc = page(vec![el("section", json!({}), vec![el("div", json!({}), vec![])])]);
    let div = doc.get_elements_by_tag("div")[0];
    let record = Locator::default().generate_locator(&doc, div);

    assert_eq!(record.attributes, None);
    assert_eq!(record.role, None);
    assert_eq!(record.text, None);
    assert_eq!(record.xpath_fallback, None, "nothing stable to anchor on");
    assert_eq!(record.dom_depth, 3);
}

#[test]
fn fallback_path_resolves_to_the_recorded_node() {
    let doc = product_page();
    let locator = Locator::default();
    for button in doc.get_elements_by_tag("button") {
        let record = locator.generate_locator(&doc, button);
        let path = record.xpath_fallback.as_deref().expect("buttons have a path");
        assert_eq!(find_element_by_xpath(&doc, path), Some(button));
    }
}

// =========================================================================
// Serialization
// =========================================================================

#[test]
fn record_serializes_as_camel_case_json() {
    let doc = checkout_page();
    let button = by_attr(&doc, "data-testid", "submit-btn");
    let record = Locator::default().generate_locator(&doc, button);

    let value: Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
    assert_eq!(value["stabilityLevel"], "A");
    assert_eq!(value["attributes"]["data-testid"], "submit-btn");
    assert_eq!(value["positionHint"]["indexAmongSameTag"], 0);
    assert_eq!(value["domDepth"], 4);
    assert_eq!(value["version"], 1);
    assert!(value["xpathFallback"].is_string());
    assert!(value["createdAt"].is_u64());
    assert!(value.get("stable_classes").is_none());
    assert_eq!(value["stableClasses"], json!(["btn"]));

    let back = LocatorRecord::from_json(&record.to_json().unwrap()).unwrap();
    assert_eq!(back, record);
}

#[test]
fn optional_fields_may_be_missing_on_input() {
    let json = r#"{
        "tag": "li",
        "domDepth": 4,
        "positionHint": { "indexAmongSameTag": 1 },
        "xpathFallback": "//ul[@id=\"menu\"]/li[2]",
        "stabilityLevel": "C",
        "createdAt": 1700000000000,
        "version": 1
    }"#;
    let record = LocatorRecord::from_json(json).unwrap();
    assert!(record.stable_classes.is_empty());
    assert!(record.near_text.is_empty());
    assert_eq!(record.attributes, None);
    assert!(record.validate().is_ok());
}

#[test]
fn malformed_records_are_rejected() {
    assert!(matches!(
        LocatorRecord::from_json(r#"{"tag": "div"}"#),
        Err(LocatorError::JsonParse { .. })
    ));

    let doc = menu_page();
    let mut record = Locator::default().generate_locator(&doc, by_attr(&doc, "class", "active"));
    record.version = 2;
    assert!(matches!(
        record.validate(),
        Err(LocatorError::UnsupportedVersion { found: 2, expected: 1 })
    ));
}

// =========================================================================
// Fingerprints
// =========================================================================

#[test]
fn fingerprint_is_stable_across_recordings() {
    let doc = checkout_page();
    let button = by_attr(&doc, "data-testid", "submit-btn");
    let locator = Locator::default();

    let first = locator.generate_locator(&doc, button);
    let mut second = locator.generate_locator(&doc, button);
    second.created_at += 1000;

    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.fingerprint().len(), 40, "hex sha1");
}

#[test]
fn fingerprint_changes_with_identity() {
    let doc = product_page();
    let locator = Locator::default();
    let buttons = doc.get_elements_by_tag("button");
    let a = locator.generate_locator(&doc, buttons[0]);
    let h3 = locator.generate_locator(&doc, doc.get_elements_by_tag("h3")[0]);

    assert_ne!(a.fingerprint(), h3.fingerprint());
}
