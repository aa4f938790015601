//! Record an element of a document tree as a portable locator, and find the
//! same element again after the tree has changed.
//!
//! ```
//! use dom_locator::{Document, Locator};
//!
//! let doc = Document::from_json(r#"{"tag":"html","children":[{"tag":"body","children":[
//!     {"tag":"button","attributes":{"data-testid":"save"},"children":[{"text":"Save"}]}
//! ]}]}"#).unwrap();
//! let button = doc.get_elements_by_tag("button")[0];
//!
//! let locator = Locator::default();
//! let record = locator.generate_locator(&doc, button);
//! let found = locator.locate_node(&doc, &record).unwrap().map(|l| l.node);
//! assert_eq!(found, Some(button));
//! ```

pub mod cli;
pub mod config;
pub mod dom;
pub mod error;
pub mod locator;
pub mod signals;
pub mod trace;
pub mod xpath;

pub use config::LocatorConfig;
pub use dom::document::{Document, NodeId, SnapshotNode};
pub use dom::tree::DomTree;
pub use error::LocatorError;
pub use locator::Locator;
pub use locator::record::{LocatorRecord, StabilityLevel};
pub use locator::relocate::{Candidate, Located, Strategy};
pub use xpath::evaluator::find_element_by_xpath;
