use std::collections::{HashMap, HashSet};

use crate::dom::tree::DomTree;
use crate::signals::text::normalize_text;
use crate::xpath::expr::{Axis, NameTest, Predicate, Step, XPath};

/// Resolve `expression` to the first matching element in document order.
/// Malformed expressions and empty results are both `None`.
pub fn find_element_by_xpath<T: DomTree>(tree: &T, expression: &str) -> Option<T::Node> {
    let path = XPath::parse(expression).ok()?;
    path.evaluate(tree).into_iter().next()
}

/// Every element matched by `expression`, in document order.
pub fn find_all_by_xpath<T: DomTree>(tree: &T, expression: &str) -> Vec<T::Node> {
    match XPath::parse(expression) {
        Ok(path) => path.evaluate(tree),
        Err(_) => Vec::new(),
    }
}

impl XPath {
    pub fn evaluate<T: DomTree>(&self, tree: &T) -> Vec<T::Node> {
        let all = tree.elements();
        if all.is_empty() || self.steps.is_empty() {
            return Vec::new();
        }
        let order: HashMap<T::Node, usize> =
            all.iter().enumerate().map(|(i, n)| (*n, i)).collect();

        // `None` is the document node above the root element.
        let mut contexts: Vec<Option<T::Node>> = vec![None];

        for step in &self.steps {
            let mut next: Vec<T::Node> = Vec::new();
            let mut seen: HashSet<T::Node> = HashSet::new();

            for ctx in &contexts {
                let bases: Vec<Option<T::Node>> = match step.axis {
                    Axis::Child => vec![*ctx],
                    Axis::Descendant => {
                        let below = match ctx {
                            Some(n) => tree.descendants(*n),
                            None => all.clone(),
                        };
                        std::iter::once(*ctx).chain(below.into_iter().map(Some)).collect()
                    }
                };

                for base in bases {
                    let children = match base {
                        Some(n) => tree.children(n),
                        None => tree.root().into_iter().collect(),
                    };
                    for hit in step.select(tree, children) {
                        if seen.insert(hit) {
                            next.push(hit);
                        }
                    }
                }
            }

            next.sort_by_key(|n| order.get(n).copied().unwrap_or(usize::MAX));
            if next.is_empty() {
                return Vec::new();
            }
            contexts = next.into_iter().map(Some).collect();
        }

        contexts.into_iter().flatten().collect()
    }
}

impl Step {
    /// Filter one parent's element children through this step's name test
    /// and predicates. Positional predicates count within `children`.
    pub fn select<T: DomTree>(&self, tree: &T, children: Vec<T::Node>) -> Vec<T::Node> {
        let mut candidates: Vec<T::Node> = children
            .into_iter()
            .filter(|n| match &self.name {
                NameTest::Any => true,
                NameTest::Tag(t) => tree.tag(*n).eq_ignore_ascii_case(t),
            })
            .collect();

        for predicate in &self.predicates {
            candidates = match predicate {
                Predicate::Position(n) => n
                    .checked_sub(1)
                    .and_then(|i| candidates.get(i).copied())
                    .into_iter()
                    .collect(),
                other => candidates
                    .into_iter()
                    .filter(|node| other.matches(tree, *node))
                    .collect(),
            };
        }
        candidates
    }
}

impl Predicate {
    /// Non-positional predicate test against a single node.
    pub fn matches<T: DomTree>(&self, tree: &T, node: T::Node) -> bool {
        match self {
            Predicate::Position(_) => true,
            Predicate::HasAttribute(a) => tree.attribute(node, a).is_some(),
            Predicate::AttributeEquals(a, v) => tree.attribute(node, a) == Some(v.as_str()),
            Predicate::AttributeContains(a, v) => {
                tree.attribute(node, a).is_some_and(|actual| actual.contains(v.as_str()))
            }
            Predicate::AttributeToken(a, t) => tree
                .attribute(node, a)
                .is_some_and(|actual| actual.split_whitespace().any(|token| token == t.as_str())),
            Predicate::TextEquals(v) => {
                normalize_text(&tree.own_text(node)) == normalize_text(v)
            }
            Predicate::TextContains(v) => tree.own_text(node).contains(v.as_str()),
            Predicate::NormalizedTextEquals(v) => {
                normalize_text(&tree.text_content(node)).unwrap_or_default() == *v
            }
        }
    }
}
