use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::AttributeConfig;
use crate::dom::tree::DomTree;
use crate::locator::record::{LOCATOR_VERSION, LocatorRecord, PositionHint, StabilityLevel};
use crate::signals::extractor::{NodeSignals, SignalExtractor};
use crate::xpath::synthesizer::PathSynthesizer;

/// Assemble a locator record for `node` from its signals and a verified
/// fallback path.
pub fn build_record<T: DomTree>(
    extractor: &SignalExtractor<'_>,
    tree: &T,
    node: T::Node,
) -> LocatorRecord {
    let signals = extractor.extract(tree, node);
    let stability_level = classify_stability(&signals, extractor.attributes);
    let xpath_fallback = PathSynthesizer { signals: extractor }.generate(tree, node);

    LocatorRecord {
        tag: signals.tag,
        attributes: (!signals.attributes.is_empty()).then_some(signals.attributes),
        role: signals.role,
        text: signals.text,
        stable_classes: signals.stable_classes,
        near_text: signals.near_text,
        dom_depth: signals.dom_depth,
        position_hint: PositionHint {
            index_among_same_tag: signals.index_among_same_tag,
        },
        xpath_fallback,
        stability_level,
        created_at: now_ms(),
        version: LOCATOR_VERSION,
    }
}

/// First match wins: strong attribute → A, role and text → B, else C.
pub fn classify_stability(signals: &NodeSignals, config: &AttributeConfig) -> StabilityLevel {
    if signals.has_strong_attribute(config) {
        StabilityLevel::A
    } else if signals.role.is_some() && signals.text.is_some() {
        StabilityLevel::B
    } else {
        StabilityLevel::C
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
