use std::collections::BTreeMap;

use crate::config::{AttributeConfig, NearTextConfig};
use crate::dom::tree::DomTree;
use crate::signals::classes::ClassFilter;
use crate::signals::role::role_of;
use crate::signals::text::{normalize_text, truncate_chars};

/// Identity-relevant features of one element, read from the live tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeSignals {
    pub tag: String,
    pub id: Option<String>,
    /// Allow-listed attributes only.
    pub attributes: BTreeMap<String, String>,
    pub role: Option<String>,
    pub text: Option<String>,
    pub stable_classes: Vec<String>,
    pub near_text: Vec<String>,
    pub dom_depth: usize,
    pub index_among_same_tag: usize,
}

impl NodeSignals {
    pub fn has_strong_attribute(&self, config: &AttributeConfig) -> bool {
        self.attributes.keys().any(|k| config.is_strong(k))
    }
}

/// Reads signals upward from a node. Never searches the tree and never fails:
/// a missing signal is simply left empty.
pub struct SignalExtractor<'a> {
    pub attributes: &'a AttributeConfig,
    pub near_text: &'a NearTextConfig,
    pub classes: &'a ClassFilter,
}

impl<'a> SignalExtractor<'a> {
    pub fn extract<T: DomTree>(&self, tree: &T, node: T::Node) -> NodeSignals {
        NodeSignals {
            tag: tree.tag(node).to_lowercase(),
            id: tree
                .attribute(node, "id")
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
            attributes: self.identity_attributes(tree, node),
            role: role_of(tree, node),
            text: normalize_text(&tree.own_text(node)),
            stable_classes: self.stable_classes(tree, node),
            near_text: self.near_text(tree, node),
            dom_depth: tree.depth(node),
            index_among_same_tag: index_among_same_tag(tree, node),
        }
    }

    pub fn identity_attributes<T: DomTree>(
        &self,
        tree: &T,
        node: T::Node,
    ) -> BTreeMap<String, String> {
        tree.attributes(node)
            .into_iter()
            .filter(|(name, value)| self.attributes.is_identity(name) && !value.trim().is_empty())
            .map(|(name, value)| (name.to_string(), value.trim().to_string()))
            .collect()
    }

    pub fn stable_classes<T: DomTree>(&self, tree: &T, node: T::Node) -> Vec<String> {
        tree.attribute(node, "class")
            .map(|c| self.classes.stable_classes(c))
            .unwrap_or_default()
    }

    /// Parent's own text, then the previous and next element siblings' text.
    pub fn near_text<T: DomTree>(&self, tree: &T, node: T::Node) -> Vec<String> {
        let Some(parent) = tree.parent(node) else {
            return Vec::new();
        };

        let siblings = tree.children(parent);
        let pos = siblings.iter().position(|s| *s == node);
        let prev = pos.and_then(|i| i.checked_sub(1)).map(|i| siblings[i]);
        let next = pos.and_then(|i| siblings.get(i + 1).copied());

        let sources = [
            Some(tree.own_text(parent)),
            prev.map(|p| tree.text_content(p)),
            next.map(|n| tree.text_content(n)),
        ];

        let mut snippets: Vec<String> = Vec::new();
        for raw in sources.into_iter().flatten() {
            if snippets.len() >= self.near_text.max_snippets {
                break;
            }
            if let Some(text) = normalize_text(&raw) {
                let snippet = truncate_chars(&text, self.near_text.max_len);
                if !snippet.is_empty() && !snippets.contains(&snippet) {
                    snippets.push(snippet);
                }
            }
        }
        snippets
    }
}

/// Zero-based rank of `node` among its siblings sharing its tag.
pub fn index_among_same_tag<T: DomTree>(tree: &T, node: T::Node) -> usize {
    let Some(parent) = tree.parent(node) else {
        return 0;
    };
    let tag = tree.tag(node);
    tree.children(parent)
        .into_iter()
        .take_while(|s| *s != node)
        .filter(|s| tree.tag(*s) == tag)
        .count()
}
