use serde::Serialize;

use crate::config::{AttributeConfig, ScoringWeights};
use crate::locator::record::LocatorRecord;
use crate::signals::extractor::NodeSignals;
use crate::signals::text::text_similarity;

/// Weighted contribution of each signal to a candidate's score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreBreakdown {
    pub strong_attribute: f32,
    pub attribute: f32,
    pub class_overlap: f32,
    pub role: f32,
    pub text: f32,
    pub near_text: f32,
    pub depth: f32,
    pub position: f32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f32 {
        self.identity() + self.depth + self.position
    }

    /// Everything except the positional closeness terms.
    pub fn identity(&self) -> f32 {
        self.strong_attribute
            + self.attribute
            + self.class_overlap
            + self.role
            + self.text
            + self.near_text
    }
}

pub fn score_candidate(
    record: &LocatorRecord,
    candidate: &NodeSignals,
    weights: &ScoringWeights,
    attributes: &AttributeConfig,
) -> ScoreBreakdown {
    let (strong, supplementary) = attribute_matches(record, candidate, attributes);

    ScoreBreakdown {
        strong_attribute: weights.strong_attribute * strong,
        attribute: weights.attribute * supplementary,
        class_overlap: weights.class_overlap * jaccard(&record.stable_classes, &candidate.stable_classes),
        role: match (&record.role, &candidate.role) {
            (Some(a), Some(b)) if a == b => weights.role,
            _ => 0.0,
        },
        text: match (&record.text, &candidate.text) {
            (Some(a), Some(b)) => weights.text * text_similarity(a, b),
            _ => 0.0,
        },
        near_text: weights.near_text * near_text_overlap(&record.near_text, &candidate.near_text),
        depth: weights.depth * closeness(record.dom_depth, candidate.dom_depth),
        position: weights.position
            * closeness(
                record.position_hint.index_among_same_tag,
                candidate.index_among_same_tag,
            ),
    }
}

/// Fraction of recorded strong / supplementary attributes whose value the
/// candidate carries unchanged.
fn attribute_matches(
    record: &LocatorRecord,
    candidate: &NodeSignals,
    config: &AttributeConfig,
) -> (f32, f32) {
    let Some(recorded) = &record.attributes else {
        return (0.0, 0.0);
    };

    let (mut strong_total, mut strong_hit) = (0usize, 0usize);
    let (mut other_total, mut other_hit) = (0usize, 0usize);
    for (name, value) in recorded {
        let hit = candidate.attributes.get(name) == Some(value);
        if config.is_strong(name) {
            strong_total += 1;
            strong_hit += hit as usize;
        } else {
            other_total += 1;
            other_hit += hit as usize;
        }
    }

    (ratio(strong_hit, strong_total), ratio(other_hit, other_total))
}

fn ratio(hit: usize, total: usize) -> f32 {
    if total == 0 { 0.0 } else { hit as f32 / total as f32 }
}

fn jaccard(a: &[String], b: &[String]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.iter().filter(|x| b.contains(x)).count();
    let union = a.len() + b.len() - shared;
    ratio(shared, union)
}

fn near_text_overlap(recorded: &[String], candidate: &[String]) -> f32 {
    if recorded.is_empty() {
        return 0.0;
    }
    let hits = recorded
        .iter()
        .filter(|r| {
            let r = r.to_lowercase();
            candidate.iter().any(|c| {
                let c = c.to_lowercase();
                c == r || c.contains(&r) || r.contains(&c)
            })
        })
        .count();
    ratio(hits, recorded.len())
}

/// 1.0 when equal, decaying with distance.
fn closeness(expected: usize, actual: usize) -> f32 {
    1.0 / (1.0 + expected.abs_diff(actual) as f32)
}
