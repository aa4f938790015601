use std::fmt;

use serde::Serialize;

use crate::config::ScoringWeights;
use crate::dom::tree::DomTree;
use crate::locator::record::LocatorRecord;
use crate::locator::scoring::{ScoreBreakdown, score_candidate};
use crate::signals::extractor::SignalExtractor;
use crate::signals::role::role_of;
use crate::signals::text::{normalize_text, text_similarity};
use crate::xpath::evaluator::find_element_by_xpath;

/// Minimum similarity for the text-only strategy: containment or better.
pub const FUZZY_TEXT_THRESHOLD: f32 = 0.7;

/// Which lookup strategy produced a single-best match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    Attribute { name: String },
    RoleText,
    FuzzyText,
    XPath,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Attribute { name } => write!(f, "attribute:{}", name),
            Strategy::RoleText => write!(f, "role+text"),
            Strategy::FuzzyText => write!(f, "fuzzy-text"),
            Strategy::XPath => write!(f, "xpath"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Located<N> {
    pub node: N,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<N> {
    pub node: N,
    pub score: f32,
    pub breakdown: ScoreBreakdown,
}

/// Re-identifies recorded elements in the current tree.
pub struct Relocator<'a> {
    pub signals: &'a SignalExtractor<'a>,
    pub weights: &'a ScoringWeights,
}

impl<'a> Relocator<'a> {
    /// Tiered single-best lookup: the first strategy yielding any candidate
    /// wins; document order breaks ties inside a strategy.
    pub fn locate<T: DomTree>(&self, tree: &T, record: &LocatorRecord) -> Option<Located<T::Node>> {
        let elements = tree.elements();
        if elements.is_empty() {
            return None;
        }

        self.by_strong_attribute(tree, &elements, record)
            .or_else(|| self.by_role_and_text(tree, &elements, record))
            .or_else(|| self.by_fuzzy_text(tree, &elements, record))
            .or_else(|| {
                let path = record.xpath_fallback.as_deref()?;
                find_element_by_xpath(tree, path).map(|node| Located {
                    node,
                    strategy: Strategy::XPath,
                })
            })
    }

    fn by_strong_attribute<T: DomTree>(
        &self,
        tree: &T,
        elements: &[T::Node],
        record: &LocatorRecord,
    ) -> Option<Located<T::Node>> {
        record
            .strong_attributes(self.signals.attributes)
            .find_map(|(name, value)| {
                let hits: Vec<T::Node> = elements
                    .iter()
                    .copied()
                    .filter(|n| tree.attribute(*n, name).map(str::trim) == Some(value))
                    .collect();
                prefer_tag(tree, &hits, &record.tag).map(|node| Located {
                    node,
                    strategy: Strategy::Attribute {
                        name: name.to_string(),
                    },
                })
            })
    }

    fn by_role_and_text<T: DomTree>(
        &self,
        tree: &T,
        elements: &[T::Node],
        record: &LocatorRecord,
    ) -> Option<Located<T::Node>> {
        let (role, text) = (record.role.as_deref()?, record.text.as_deref()?);
        let hits: Vec<T::Node> = elements
            .iter()
            .copied()
            .filter(|n| {
                role_of(tree, *n).as_deref() == Some(role)
                    && normalize_text(&tree.own_text(*n)).as_deref() == Some(text)
            })
            .collect();
        prefer_tag(tree, &hits, &record.tag).map(|node| Located {
            node,
            strategy: Strategy::RoleText,
        })
    }

    /// Only for records with no strong attribute and no role. Supplementary
    /// attributes (`title`, `name`, ...) never had a tier of their own, so
    /// they do not block this one.
    fn by_fuzzy_text<T: DomTree>(
        &self,
        tree: &T,
        elements: &[T::Node],
        record: &LocatorRecord,
    ) -> Option<Located<T::Node>> {
        let has_strong = record
            .strong_attributes(self.signals.attributes)
            .next()
            .is_some();
        if has_strong || record.role.is_some() {
            return None;
        }
        let wanted = record.text.as_deref()?;

        let mut best: Option<(T::Node, f32, bool)> = None;
        for node in elements.iter().copied() {
            let Some(text) = normalize_text(&tree.own_text(node)) else {
                continue;
            };
            let similarity = text_similarity(wanted, &text);
            if similarity < FUZZY_TEXT_THRESHOLD {
                continue;
            }
            let same_tag = tree.tag(node) == record.tag;
            let better = match best {
                None => true,
                Some((_, s, t)) => similarity > s || (similarity == s && same_tag && !t),
            };
            if better {
                best = Some((node, similarity, same_tag));
            }
        }

        best.map(|(node, _, _)| Located {
            node,
            strategy: Strategy::FuzzyText,
        })
    }

    /// Score every same-tag element that shares at least one identity signal
    /// with the record. Sorted by score, descending; document order on ties.
    pub fn locate_all<T: DomTree>(
        &self,
        tree: &T,
        record: &LocatorRecord,
        limit: usize,
    ) -> Vec<Candidate<T::Node>> {
        if limit == 0 || !record.has_identity_signals() {
            return Vec::new();
        }

        let mut candidates: Vec<Candidate<T::Node>> = tree
            .elements()
            .into_iter()
            .filter(|n| tree.tag(*n) == record.tag)
            .filter_map(|node| {
                let signals = self.signals.extract(tree, node);
                let breakdown =
                    score_candidate(record, &signals, self.weights, self.signals.attributes);
                (breakdown.identity() > 0.0).then(|| Candidate {
                    node,
                    score: breakdown.total(),
                    breakdown,
                })
            })
            .collect();

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(limit);
        candidates
    }
}

/// First hit carrying `tag`, else the first hit.
fn prefer_tag<T: DomTree>(tree: &T, hits: &[T::Node], tag: &str) -> Option<T::Node> {
    hits.iter()
        .copied()
        .find(|n| tree.tag(*n) == tag)
        .or_else(|| hits.first().copied())
}
