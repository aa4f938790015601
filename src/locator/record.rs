use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::config::AttributeConfig;
use crate::error::LocatorError;

/// Current record format version.
pub const LOCATOR_VERSION: u32 = 1;

/// Confidence tier of a record. `A` is the most durable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StabilityLevel {
    /// Carries a test-id or accessibility-label attribute
    A,
    /// Role and text, no strong attribute
    B,
    /// Everything else
    C,
}

impl fmt::Display for StabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StabilityLevel::A => "A",
            StabilityLevel::B => "B",
            StabilityLevel::C => "C",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionHint {
    pub index_among_same_tag: usize,
}

/// Portable fingerprint of one element. Plain data: no live references,
/// safe to store or send across processes and to use against a later,
/// different tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatorRecord {
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default)]
    pub stable_classes: Vec<String>,

    #[serde(default)]
    pub near_text: Vec<String>,

    pub dom_depth: usize,

    pub position_hint: PositionHint,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpath_fallback: Option<String>,

    pub stability_level: StabilityLevel,

    /// Unix epoch milliseconds
    pub created_at: u64,

    pub version: u32,
}

impl LocatorRecord {
    pub fn from_json(json: &str) -> Result<Self, LocatorError> {
        serde_json::from_str(json).map_err(|source| LocatorError::JsonParse {
            context: "locator record".into(),
            source,
        })
    }

    pub fn to_json(&self) -> Result<String, LocatorError> {
        serde_json::to_string_pretty(self).map_err(|source| LocatorError::JsonSerialize {
            context: "locator record".into(),
            source,
        })
    }

    /// Reject records this engine cannot interpret.
    pub fn validate(&self) -> Result<(), LocatorError> {
        if self.version != LOCATOR_VERSION {
            return Err(LocatorError::UnsupportedVersion {
                found: self.version,
                expected: LOCATOR_VERSION,
            });
        }
        Ok(())
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .as_ref()
            .and_then(|a| a.get(name))
            .map(String::as_str)
    }

    /// Recorded strong attributes, in configured priority order.
    pub fn strong_attributes<'a>(
        &'a self,
        config: &'a AttributeConfig,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        config
            .strong
            .iter()
            .filter_map(move |name| self.attribute(name).map(|v| (name.as_str(), v)))
    }

    /// True when the record holds anything besides tag and position.
    pub fn has_identity_signals(&self) -> bool {
        self.attributes.as_ref().is_some_and(|a| !a.is_empty())
            || self.role.is_some()
            || self.text.is_some()
            || !self.stable_classes.is_empty()
            || !self.near_text.is_empty()
    }

    /// SHA-1 over the identity-bearing content. Re-recording an unchanged
    /// element yields the same fingerprint regardless of `createdAt`.
    pub fn fingerprint(&self) -> String {
        let attributes = self
            .attributes
            .iter()
            .flatten()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(";");

        let canonical = format!(
            "{}|{}|{}|{}|{}",
            self.tag,
            attributes,
            self.role.as_deref().unwrap_or(""),
            self.text.as_deref().unwrap_or(""),
            self.stable_classes.join(" ")
        );

        let mut hasher = Sha1::new();
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
