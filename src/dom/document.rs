use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dom::tree::DomTree;
use crate::error::LocatorError;

/// Stable handle into a [`Document`]. Ids are never reused, so a handle
/// taken before a mutation still names the same element afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
enum Child {
    Element(NodeId),
    Text(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    attributes: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<Child>,
}

/// Serialized tree, as dumped by a browser-side extractor.
///
/// ```json
/// { "tag": "div", "attributes": { "class": "card" },
///   "children": [ { "text": "Hello" }, { "tag": "span" } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotNode {
    Text {
        text: String,
    },
    Element {
        tag: String,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<SnapshotNode>,
    },
}

/// In-memory, mutable element tree.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<ElementData>,
    root: Option<NodeId>,
}

impl Document {
    /// A document holding a single root element.
    pub fn new(root_tag: &str) -> Self {
        let mut doc = Document::default();
        let root = doc.create_element(root_tag, &[]);
        doc.root = Some(root);
        doc
    }

    pub fn from_json(json: &str) -> Result<Self, LocatorError> {
        let snapshot: SnapshotNode =
            serde_json::from_str(json).map_err(|source| LocatorError::JsonParse {
                context: "document snapshot".into(),
                source,
            })?;
        Ok(Self::from_snapshot(&snapshot))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, LocatorError> {
        let snapshot: SnapshotNode =
            serde_json::from_value(value).map_err(|source| LocatorError::JsonParse {
                context: "document snapshot".into(),
                source,
            })?;
        Ok(Self::from_snapshot(&snapshot))
    }

    /// Build a document from a snapshot. A text-only snapshot yields an
    /// empty document.
    pub fn from_snapshot(snapshot: &SnapshotNode) -> Self {
        let mut doc = Document::default();
        doc.root = doc.import(snapshot, None);
        doc
    }

    fn import(&mut self, snapshot: &SnapshotNode, parent: Option<NodeId>) -> Option<NodeId> {
        match snapshot {
            SnapshotNode::Text { text } => {
                if let Some(p) = parent {
                    self.append_text(p, text);
                }
                None
            }
            SnapshotNode::Element {
                tag,
                attributes,
                children,
            } => {
                let id = self.alloc(tag, attributes.clone());
                if let Some(p) = parent {
                    self.append_child(p, id);
                }
                for child in children {
                    self.import(child, Some(id));
                }
                Some(id)
            }
        }
    }

    /// Serialize the attached tree back into snapshot form.
    pub fn to_snapshot(&self) -> Option<SnapshotNode> {
        self.root.map(|r| self.export(r))
    }

    fn export(&self, id: NodeId) -> SnapshotNode {
        let data = &self.nodes[id.0];
        SnapshotNode::Element {
            tag: data.tag.clone(),
            attributes: data.attributes.clone(),
            children: data
                .children
                .iter()
                .map(|c| match c {
                    Child::Element(e) => self.export(*e),
                    Child::Text(t) => SnapshotNode::Text { text: t.clone() },
                })
                .collect(),
        }
    }

    fn alloc(&mut self, tag: &str, attributes: BTreeMap<String, String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ElementData {
            tag: tag.to_lowercase(),
            attributes,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let attrs = attributes
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.to_string()))
            .collect();
        self.alloc(tag, attrs)
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous position first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(Child::Element(child));
    }

    /// Insert `child` before `reference` (an element child of `parent`).
    /// Falls back to appending when `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        let children = &mut self.nodes[parent.0].children;
        let pos = children
            .iter()
            .position(|c| matches!(c, Child::Element(e) if *e == reference));
        match pos {
            Some(i) => children.insert(i, Child::Element(child)),
            None => children.push(Child::Element(child)),
        }
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        self.nodes[parent.0].children.push(Child::Text(text.to_string()));
    }

    /// Remove every text child of `node`, keeping element children.
    pub fn clear_text(&mut self, node: NodeId) {
        self.nodes[node.0]
            .children
            .retain(|c| matches!(c, Child::Element(_)));
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attributes
            .insert(name.to_lowercase(), value.to_string());
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.nodes[node.0].attributes.remove(&name.to_lowercase());
    }

    /// Unlink `node` from its parent. The subtree stays allocated but is no
    /// longer reachable from the root.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0]
                .children
                .retain(|c| !matches!(c, Child::Element(e) if *e == node));
        }
    }

    /// Convenience for tests and fixtures: build `<tag attrs>text</tag>` and
    /// append it under `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
        text: Option<&str>,
    ) -> NodeId {
        let id = self.create_element(tag, attributes);
        if let Some(t) = text {
            self.append_text(id, t);
        }
        self.append_child(parent, id);
        id
    }

    /// First element in document order with the given `id` attribute.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|n| self.attribute(*n, "id") == Some(id))
    }

    /// Every attached element with the given tag, in document order.
    pub fn get_elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_lowercase();
        self.elements()
            .into_iter()
            .filter(|n| self.tag(*n) == tag)
            .collect()
    }
}

impl DomTree for Document {
    type Node = NodeId;

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attributes.get(name).map(String::as_str)
    }

    fn attributes(&self, node: NodeId) -> Vec<(&str, &str)> {
        self.nodes[node.0]
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0]
            .children
            .iter()
            .filter_map(|c| match c {
                Child::Element(e) => Some(*e),
                Child::Text(_) => None,
            })
            .collect()
    }

    fn own_text(&self, node: NodeId) -> String {
        self.nodes[node.0]
            .children
            .iter()
            .filter_map(|c| match c {
                Child::Text(t) => Some(t.as_str()),
                Child::Element(_) => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
