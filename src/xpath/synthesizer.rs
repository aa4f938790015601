use crate::dom::tree::DomTree;
use crate::signals::extractor::{SignalExtractor, index_among_same_tag};
use crate::xpath::evaluator::find_all_by_xpath;
use crate::xpath::expr::{Axis, NameTest, Predicate, Step, XPath};

/// How a segment pins down its element, from most to least stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Id,
    Class,
    Attribute,
    Ordinal,
}

/// Builds a path that resolves back to exactly one element.
pub struct PathSynthesizer<'a> {
    pub signals: &'a SignalExtractor<'a>,
}

impl<'a> PathSynthesizer<'a> {
    /// Synthesize and self-verify a path for `node`.
    ///
    /// Returns `None` when the node is one of the two outermost wrapper
    /// levels, when every segment would be purely ordinal, or when the
    /// produced path does not resolve to `node` alone.
    ///
    /// Segments are only unique among siblings, so a `//` path can also
    /// match a copy of the same structure elsewhere. When ascent reached
    /// the wrappers, such a path is re-anchored under two wildcard steps
    /// (`/*/*/...`), which pins the top segment to the wrapper depth
    /// without naming either wrapper.
    pub fn generate<T: DomTree>(&self, tree: &T, node: T::Node) -> Option<String> {
        if !tree.is_connected(node) {
            return None;
        }

        let mut segments: Vec<Step> = Vec::new();
        let mut distinguishing = false;
        let mut anchored_on_id = false;
        let mut current = node;

        // Depth 0 and 1 are the document wrappers (html, body).
        while tree.depth(current) > 1 {
            let (step, kind) = self.segment(tree, current);
            segments.push(step);
            if kind != SegmentKind::Ordinal {
                distinguishing = true;
            }
            if kind == SegmentKind::Id {
                anchored_on_id = true;
                break;
            }
            current = tree.parent(current)?;
        }

        if segments.is_empty() || !distinguishing {
            return None;
        }

        segments.reverse();
        segments[0].axis = Axis::Descendant;
        let relative = XPath { steps: segments };
        let expression = relative.to_string();
        if resolves_to_only(tree, &expression, node) {
            return Some(expression);
        }
        if anchored_on_id {
            return None;
        }

        let mut steps = vec![wildcard(), wildcard()];
        steps.extend(relative.steps);
        steps[2].axis = Axis::Child;
        let expression = XPath { steps }.to_string();
        resolves_to_only(tree, &expression, node).then_some(expression)
    }

    /// Pick the most stable segment that singles `node` out among its
    /// siblings.
    pub fn segment<T: DomTree>(&self, tree: &T, node: T::Node) -> (Step, SegmentKind) {
        let tag = tree.tag(node);
        let siblings = tree
            .parent(node)
            .map(|p| tree.children(p))
            .unwrap_or_else(|| vec![node]);
        let unique = |step: &Step| step.select(tree, siblings.clone()) == vec![node];

        if let Some(id) = tree.attribute(node, "id") {
            if !id.trim().is_empty()
                && !self.signals.classes.is_hash_like(id)
                && is_unique_id(tree, id)
            {
                let step = Step::new(Axis::Child, tag)
                    .with(Predicate::AttributeEquals("id".into(), id.to_string()));
                return (step, SegmentKind::Id);
            }
        }

        let classes = self.signals.stable_classes(tree, node);
        if !classes.is_empty() {
            let step = classes.into_iter().fold(Step::new(Axis::Child, tag), |s, c| {
                s.with(Predicate::AttributeToken("class".into(), c))
            });
            if unique(&step) {
                return (step, SegmentKind::Class);
            }
        }

        let attributes = self.signals.identity_attributes(tree, node);
        for name in self.signals.attributes.all() {
            if let Some(value) = tree.attribute(node, name).filter(|_| attributes.contains_key(name)) {
                let step = Step::new(Axis::Child, tag)
                    .with(Predicate::AttributeEquals(name.to_string(), value.to_string()));
                if unique(&step) {
                    return (step, SegmentKind::Attribute);
                }
            }
        }

        let bare = Step::new(Axis::Child, tag);
        if unique(&bare) {
            return (bare, SegmentKind::Ordinal);
        }
        let position = index_among_same_tag(tree, node) + 1;
        (bare.with(Predicate::Position(position)), SegmentKind::Ordinal)
    }
}

fn wildcard() -> Step {
    Step {
        axis: Axis::Child,
        name: NameTest::Any,
        predicates: Vec::new(),
    }
}

fn resolves_to_only<T: DomTree>(tree: &T, expression: &str, node: T::Node) -> bool {
    find_all_by_xpath(tree, expression) == [node]
}

fn is_unique_id<T: DomTree>(tree: &T, id: &str) -> bool {
    tree.elements()
        .into_iter()
        .filter(|n| tree.attribute(*n, "id") == Some(id))
        .count()
        == 1
}
