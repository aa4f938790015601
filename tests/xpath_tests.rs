use dom_locator::xpath::evaluator::find_all_by_xpath;
use dom_locator::xpath::expr::{Predicate, XPath};
use dom_locator::{Document, DomTree, Locator, LocatorError, find_element_by_xpath};
use serde_json::json;

use crate::common::fixtures::{body, by_attr, el, menu_page, page, product_page, text, title_page};

mod common;

// =========================================================================
// Path synthesis
// =========================================================================

#[test]
fn heading_with_id_round_trips_without_wrapper_segments() {
    let doc = title_page();
    let h1 = by_attr(&doc, "id", "title");

    let path = Locator::default()
        .generate_xpath(&doc, h1)
        .expect("h1 with id should get a path");

    assert!(!path.starts_with("/html"), "path must not name html: {path}");
    assert!(!path.contains("body"), "path must not name body: {path}");
    assert!(path.contains("h1"), "path should contain an h1 segment: {path}");

    let found = find_element_by_xpath(&doc, &path).expect("path should resolve");
    assert_eq!(found, h1);
    assert_eq!(doc.own_text(found), "Test Page");
}

#[test]
fn id_anchor_stops_ascent() {
    let doc = title_page();
    let h1 = doc.get_element_by_id("title").unwrap();
    let path = Locator::default().generate_xpath(&doc, h1).unwrap();
    assert_eq!(path, r#"//h1[@id="title"]"#);
}

#[test]
fn class_segments_are_used_for_ancestors() {
    let doc = title_page();
    let p = doc.get_elements_by_tag("p")[0];
    let path = Locator::default().generate_xpath(&doc, p).unwrap();

    let token = |c: &str| format!(r#"[contains(concat(" ",normalize-space(@class)," ")," {c} ")]"#);
    assert_eq!(path, format!("//div{}/div{}/p", token("container"), token("content")));
    assert_eq!(find_element_by_xpath(&doc, &path), Some(p));
}

#[test]
fn repeated_siblings_fall_back_to_ordinal_under_a_stable_ancestor() {
    let doc = product_page();
    let buttons = doc.get_elements_by_tag("button");
    let locator = Locator::default();

    for button in buttons {
        let path = locator.generate_xpath(&doc, button).expect("button path");
        assert_eq!(find_element_by_xpath(&doc, &path), Some(button), "{path}");
    }

    let second = doc.get_elements_by_tag("button")[1];
    let path = locator.generate_xpath(&doc, second).unwrap();
    assert!(path.contains("div[2]"), "second card is picked by position: {path}");
}

#[test]
fn attribute_segment_used_when_classes_do_not_discriminate() {
    let doc = page(vec![el(
        "ul",
        json!({ "class": "list" }),
        vec![
            el("li", json!({ "class": "row", "data-testid": "row-a" }), vec![text("A")]),
            el("li", json!({ "class": "row", "data-testid": "row-b" }), vec![text("B")]),
        ],
    )]);
    let li = by_attr(&doc, "data-testid", "row-b");

    let path = Locator::default().generate_xpath(&doc, li).unwrap();
    assert!(path.ends_with(r#"li[@data-testid="row-b"]"#), "{path}");
    assert_eq!(find_element_by_xpath(&doc, &path), Some(li));
}

#[test]
fn purely_ordinal_structure_yields_no_path() {
    let doc = page(vec![el(
        "div",
        json!({}),
        vec![el("div", json!({}), vec![el("span", json!({}), vec![text("x")])])],
    )]);
    let span = doc.get_elements_by_tag("span")[0];
    assert_eq!(Locator::default().generate_xpath(&doc, span), None);
}

#[test]
fn only_hash_classes_count_as_no_feature() {
    let doc = page(vec![el(
        "div",
        json!({ "class": "css-1x92ab" }),
        vec![el("span", json!({ "class": "jsx-123456 sc-Ax9z" }), vec![text("x")])],
    )]);
    let span = doc.get_elements_by_tag("span")[0];
    assert_eq!(Locator::default().generate_xpath(&doc, span), None);
}

#[test]
fn synthesized_paths_never_mention_hash_classes() {
    let doc = page(vec![el(
        "section",
        json!({ "class": "hero css-1x92ab" }),
        vec![el(
            "a",
            json!({ "class": "cta hash-class-abc123def456", "href": "/go" }),
            vec![text("Go")],
        )],
    )]);
    let a = doc.get_elements_by_tag("a")[0];
    let path = Locator::default().generate_xpath(&doc, a).unwrap();

    for token in ["css-1x92ab", "hash-class-abc123def456"] {
        assert!(!path.contains(token), "{token} leaked into {path}");
    }
    assert_eq!(find_element_by_xpath(&doc, &path), Some(a));
}

#[test]
fn class_segment_matches_whole_tokens_only() {
    let doc = page(vec![el(
        "ul",
        json!({}),
        vec![
            el("li", json!({ "class": "item" }), vec![text("A")]),
            el("li", json!({ "class": "item-active" }), vec![text("B")]),
        ],
    )]);
    let first = doc.get_elements_by_tag("li")[0];

    let path = Locator::default()
        .generate_xpath(&doc, first)
        .expect("a unique stable class yields a path");
    let whole = r#"//li[contains(concat(" ",normalize-space(@class)," ")," item ")]"#;
    assert!(path.ends_with(&whole[1..]), "{path}");
    assert_eq!(find_element_by_xpath(&doc, &path), Some(first));

    assert_eq!(find_all_by_xpath(&doc, whole), vec![first]);
    assert_eq!(find_all_by_xpath(&doc, r#"//li[contains(@class,"item")]"#).len(), 2);
}

#[test]
fn repeated_structure_elsewhere_is_anchored_at_wrapper_depth() {
    let doc = page(vec![
        el(
            "section",
            json!({}),
            vec![el(
                "div",
                json!({}),
                vec![el("span", json!({ "class": "price" }), vec![text("1")])],
            )],
        ),
        el("div", json!({}), vec![el("span", json!({ "class": "price" }), vec![text("2")])]),
    ]);
    let spans = doc.get_elements_by_tag("span");
    let locator = Locator::default();

    let path = locator.generate_xpath(&doc, spans[1]).expect("second price gets a path");
    assert!(path.starts_with("/*/*/div/span"), "{path}");
    assert!(!path.contains("html") && !path.contains("body"), "{path}");
    assert_eq!(find_all_by_xpath(&doc, &path), vec![spans[1]]);

    let nested = locator.generate_xpath(&doc, spans[0]).expect("nested price gets a path");
    assert_eq!(find_all_by_xpath(&doc, &nested), vec![spans[0]]);
}

#[test]
fn wrapper_levels_have_no_path() {
    let doc = title_page();
    let locator = Locator::default();
    assert_eq!(locator.generate_xpath(&doc, doc.root().unwrap()), None);
    assert_eq!(locator.generate_xpath(&doc, body(&doc)), None);
}

#[test]
fn duplicate_ids_are_not_used_as_anchors() {
    let doc = page(vec![
        el("div", json!({ "class": "a" }), vec![el("span", json!({ "id": "dup" }), vec![])]),
        el("div", json!({ "class": "b" }), vec![el("span", json!({ "id": "dup" }), vec![])]),
    ]);
    let second = doc.get_elements_by_tag("span")[1];
    let path = Locator::default().generate_xpath(&doc, second).unwrap();
    assert!(path.contains(r#"," b ")"#), "{path}");
    assert_eq!(find_element_by_xpath(&doc, &path), Some(second));
}

#[test]
fn detached_nodes_have_no_path() {
    let mut doc = menu_page();
    let active = by_attr(&doc, "class", "active");
    doc.detach(active);
    assert_eq!(Locator::default().generate_xpath(&doc, active), None);
}

// =========================================================================
// Path evaluation
// =========================================================================

#[test]
fn absolute_paths_resolve_from_the_document() {
    let doc = menu_page();
    let li = find_element_by_xpath(&doc, "/html/body/nav/ul/li[3]").unwrap();
    assert_eq!(doc.own_text(li), "Contact");
}

#[test]
fn multiple_matches_return_first_in_document_order() {
    let doc = menu_page();
    let first = find_element_by_xpath(&doc, "//li").unwrap();
    assert_eq!(doc.own_text(first), "Home");
    assert_eq!(find_all_by_xpath(&doc, "//li").len(), 3);
}

#[test]
fn positions_count_per_parent_on_the_descendant_axis() {
    let doc = page(vec![
        el("ul", json!({}), vec![el("li", json!({}), vec![text("a1")]), el("li", json!({}), vec![text("a2")])]),
        el("ul", json!({}), vec![el("li", json!({}), vec![text("b1")]), el("li", json!({}), vec![text("b2")])]),
    ]);
    let texts: Vec<String> = find_all_by_xpath(&doc, "//li[2]")
        .into_iter()
        .map(|n| doc.own_text(n))
        .collect();
    assert_eq!(texts, vec!["a2", "b2"]);
}

#[test]
fn text_predicates_match_own_and_full_text() {
    let doc = page(vec![el(
        "p",
        json!({}),
        vec![text("Hello"), el("b", json!({}), vec![text("world")])],
    )]);
    let p = doc.get_elements_by_tag("p")[0];

    assert_eq!(find_element_by_xpath(&doc, r#"//p[text()="Hello"]"#), Some(p));
    assert_eq!(find_element_by_xpath(&doc, r#"//p[contains(text(),"ell")]"#), Some(p));
    assert_eq!(find_element_by_xpath(&doc, r#"//p[normalize-space()="Hello world"]"#), Some(p));
    assert_eq!(find_element_by_xpath(&doc, r#"//p[text()="Hello world"]"#), None);
}

#[test]
fn wildcard_and_attribute_presence() {
    let doc = menu_page();
    let active = by_attr(&doc, "class", "active");
    assert_eq!(find_element_by_xpath(&doc, "//*[@class]"), Some(active));
    assert_eq!(find_element_by_xpath(&doc, "//ul[@id='menu']/*[2]"), Some(active));
}

#[test]
fn malformed_or_empty_inputs_are_none() {
    let doc = menu_page();
    for bad in ["", "li", "//li[", "//li[0]", "//li[@id=unquoted]", "//li[foo()]"] {
        assert_eq!(find_element_by_xpath(&doc, bad), None, "{bad:?}");
    }
    assert_eq!(find_element_by_xpath(&Document::default(), "//li"), None);
}

#[test]
fn parse_errors_report_position() {
    let err = XPath::parse("//li[@id=").unwrap_err();
    match err {
        LocatorError::XPathSyntax { position, .. } => assert_eq!(position, 9),
        other => panic!("expected syntax error, got {other}"),
    }
}

#[test]
fn parsed_paths_render_canonically() {
    let path = XPath::parse("//div[ contains( @class , 'card' ) ]/li[ 2 ]").unwrap();
    assert_eq!(path.to_string(), r#"//div[contains(@class,"card")]/li[2]"#);
    assert_eq!(path.steps[1].predicates, vec![Predicate::Position(2)]);
}
