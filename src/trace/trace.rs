use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::locator::record::LocatorRecord;
use crate::locator::relocate::Strategy;

/// One line of the JSONL operation trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub operation: String,

    pub record_fingerprint: Option<String>,
    pub stability_level: Option<String>,

    pub strategy: Option<String>,
    pub matched: bool,
    pub candidates: usize,
    pub best_score: Option<f32>,

    pub note: Option<String>,
}

impl TraceEvent {
    pub fn now(operation: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            operation: operation.to_string(),
            record_fingerprint: None,
            stability_level: None,
            strategy: None,
            matched: false,
            candidates: 0,
            best_score: None,
            note: None,
        }
    }

    pub fn with_record(mut self, record: &LocatorRecord) -> Self {
        self.record_fingerprint = Some(record.fingerprint());
        self.stability_level = Some(record.stability_level.to_string());
        self
    }

    pub fn with_strategy(mut self, strategy: &Strategy) -> Self {
        self.strategy = Some(strategy.to_string());
        self
    }

    pub fn with_matched(mut self, matched: bool) -> Self {
        self.matched = matched;
        self
    }

    pub fn with_candidates(mut self, count: usize, best_score: Option<f32>) -> Self {
        self.candidates = count;
        self.best_score = best_score;
        self
    }

    pub fn with_note(mut self, note: impl ToString) -> Self {
        self.note = Some(note.to_string());
        self
    }
}
