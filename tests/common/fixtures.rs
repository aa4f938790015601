use dom_locator::{Document, DomTree, NodeId};
use serde_json::{Value, json};

// ============================================================================
// Snapshot builders
// ============================================================================

pub fn el(tag: &str, attributes: Value, children: Vec<Value>) -> Value {
    json!({ "tag": tag, "attributes": attributes, "children": children })
}

pub fn text(t: &str) -> Value {
    json!({ "text": t })
}

/// `<html><head/><body>{body}</body></html>`
pub fn page(body: Vec<Value>) -> Document {
    let snapshot = el(
        "html",
        json!({}),
        vec![
            el("head", json!({}), vec![el("title", json!({}), vec![text("Fixture")])]),
            el("body", json!({}), body),
        ],
    );
    Document::from_value(snapshot).expect("fixture snapshot should parse")
}

pub fn body(doc: &Document) -> NodeId {
    doc.get_elements_by_tag("body")[0]
}

/// First element carrying `name="value"`.
pub fn by_attr(doc: &Document, name: &str, value: &str) -> NodeId {
    doc.elements()
        .into_iter()
        .find(|n| doc.attribute(*n, name) == Some(value))
        .unwrap_or_else(|| panic!("no element with {name}={value:?}"))
}

// ============================================================================
// Canned pages
// ============================================================================

/// Heading with an id inside two nested containers.
pub fn title_page() -> Document {
    page(vec![el(
        "div",
        json!({ "class": "container" }),
        vec![el(
            "div",
            json!({ "class": "content" }),
            vec![
                el("h1", json!({ "id": "title" }), vec![text("Test Page")]),
                el("p", json!({}), vec![text("Intro paragraph")]),
            ],
        )],
    )])
}

/// Checkout form with a test-id'd submit button.
pub fn checkout_page() -> Document {
    page(vec![el(
        "main",
        json!({}),
        vec![el(
            "form",
            json!({ "class": "checkout-form" }),
            vec![
                el("input", json!({ "name": "email", "type": "email" }), vec![]),
                el(
                    "button",
                    json!({ "data-testid": "submit-btn", "aria-label": "Submit Form", "class": "btn sc-Ax9z" }),
                    vec![text("Submit")],
                ),
            ],
        )],
    )])
}

/// Two product cards with identical "Buy Now" buttons.
pub fn product_page() -> Document {
    let card = |name: &str| {
        el(
            "div",
            json!({ "class": "card" }),
            vec![
                el("h3", json!({}), vec![text(name)]),
                el("button", json!({ "class": "buy-btn" }), vec![text("Buy Now")]),
            ],
        )
    };
    page(vec![el(
        "div",
        json!({ "class": "product-list" }),
        vec![card("Widget A"), card("Widget B")],
    )])
}

/// A menu list where one item is marked active.
pub fn menu_page() -> Document {
    page(vec![el(
        "nav",
        json!({}),
        vec![el(
            "ul",
            json!({ "id": "menu" }),
            vec![
                el("li", json!({}), vec![text("Home")]),
                el("li", json!({ "class": "active" }), vec![text("Products")]),
                el("li", json!({}), vec![text("Contact")]),
            ],
        )],
    )])
}
