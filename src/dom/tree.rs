use std::fmt::Debug;
use std::hash::Hash;

/// Read-only view of an element tree.
///
/// Everything the locator engine needs from a document: tags, attributes,
/// direct text, and parent/child links. Handles are plain values so a
/// caller can hold on to them across calls without borrowing the tree.
pub trait DomTree {
    type Node: Copy + Eq + Hash + Debug;

    /// The outermost element (`html` for a browser document).
    fn root(&self) -> Option<Self::Node>;

    /// Lower-case tag name.
    fn tag(&self, node: Self::Node) -> &str;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// All attributes in a deterministic order.
    fn attributes(&self, node: Self::Node) -> Vec<(&str, &str)>;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Element children only, in document order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Concatenated text of this node's own text children (not descendants).
    fn own_text(&self, node: Self::Node) -> String;

    /// Text of this node and every descendant element.
    fn text_content(&self, node: Self::Node) -> String {
        let mut text = self.own_text(node);
        for child in self.children(node) {
            text.push(' ');
            text.push_str(&self.text_content(child));
        }
        text
    }

    /// Descendants in pre-order (document order), excluding `node`.
    fn descendants(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(node).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    /// Every element reachable from the root, in document order.
    fn elements(&self) -> Vec<Self::Node> {
        match self.root() {
            Some(root) => {
                let mut all = vec![root];
                all.extend(self.descendants(root));
                all
            }
            None => Vec::new(),
        }
    }

    /// Ancestors from the parent upward.
    fn ancestors(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut current = self.parent(node);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// Number of ancestor elements between the root and `node`.
    fn depth(&self, node: Self::Node) -> usize {
        self.ancestors(node).len()
    }

    /// True when `node` is attached under the current root.
    fn is_connected(&self, node: Self::Node) -> bool {
        let top = self.ancestors(node).last().copied().unwrap_or(node);
        self.root() == Some(top)
    }
}
