use serde::{Deserialize, Serialize};

// ============================================================================
// Engine configuration (the `locator:` section of dom-locator.yaml)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LocatorConfig {
    #[serde(default)]
    pub attributes: AttributeConfig,
    #[serde(default)]
    pub classes: ClassConfig,
    #[serde(default)]
    pub near_text: NearTextConfig,
    #[serde(default)]
    pub weights: ScoringWeights,
}

/// Which attributes carry identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeConfig {
    /// Test-id and accessibility-label attributes. Any of these makes a
    /// record tier A. Order is lookup priority.
    #[serde(default = "default_strong")]
    pub strong: Vec<String>,

    /// Stable but weaker attributes: recorded and scored, never tier A.
    #[serde(default = "default_supplementary")]
    pub supplementary: Vec<String>,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            strong: default_strong(),
            supplementary: default_supplementary(),
        }
    }
}

impl AttributeConfig {
    pub fn is_strong(&self, name: &str) -> bool {
        self.strong.iter().any(|s| s == name)
    }

    pub fn is_identity(&self, name: &str) -> bool {
        self.is_strong(name) || self.supplementary.iter().any(|s| s == name)
    }

    /// Strong attributes first, then supplementary, each in configured order.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.strong
            .iter()
            .chain(self.supplementary.iter())
            .map(String::as_str)
    }
}

/// Hash-like class detection rules. See `signals::classes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassConfig {
    /// Token prefixes emitted by CSS-in-JS and framework compilers.
    #[serde(default = "default_prefixes")]
    pub generated_prefixes: Vec<String>,

    /// Extra regular expressions; a full-token match marks it hash-like.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Minimum length of a mixed letter+digit final segment to count as a
    /// hash suffix. `0` disables the rule.
    #[serde(default = "default_min_suffix")]
    pub min_suffix_len: usize,
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            generated_prefixes: default_prefixes(),
            patterns: default_patterns(),
            min_suffix_len: default_min_suffix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearTextConfig {
    #[serde(default = "default_max_snippets")]
    pub max_snippets: usize,
    #[serde(default = "default_max_len")]
    pub max_len: usize,
}

impl Default for NearTextConfig {
    fn default() -> Self {
        Self {
            max_snippets: default_max_snippets(),
            max_len: default_max_len(),
        }
    }
}

/// Per-signal weights for ranked lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_strong_weight")]
    pub strong_attribute: f32,
    #[serde(default = "default_attribute_weight")]
    pub attribute: f32,
    #[serde(default = "default_class_weight")]
    pub class_overlap: f32,
    #[serde(default = "default_role_weight")]
    pub role: f32,
    #[serde(default = "default_text_weight")]
    pub text: f32,
    #[serde(default = "default_near_text_weight")]
    pub near_text: f32,
    #[serde(default = "default_one")]
    pub depth: f32,
    #[serde(default = "default_one")]
    pub position: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            strong_attribute: default_strong_weight(),
            attribute: default_attribute_weight(),
            class_overlap: default_class_weight(),
            role: default_role_weight(),
            text: default_text_weight(),
            near_text: default_near_text_weight(),
            depth: default_one(),
            position: default_one(),
        }
    }
}

// Serde default helpers
fn default_strong() -> Vec<String> {
    ["data-testid", "data-test-id", "data-test", "data-qa", "data-cy", "aria-label"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_supplementary() -> Vec<String> {
    ["name", "placeholder", "alt", "title", "data-id", "data-name"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_prefixes() -> Vec<String> {
    ["css-", "sc-", "jsx-", "svelte-", "emotion-", "ng-tns-", "_ngcontent-", "_nghost-"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_patterns() -> Vec<String> {
    [r"^[0-9a-f]{8,}$", r"^.+[-_][0-9a-f]*[0-9][0-9a-f]{7,}$", r"^[a-z]{1,3}[0-9]{4,}$"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_min_suffix() -> usize { 5 }
fn default_max_snippets() -> usize { 3 }
fn default_max_len() -> usize { 60 }
fn default_strong_weight() -> f32 { 8.0 }
fn default_attribute_weight() -> f32 { 3.0 }
fn default_class_weight() -> f32 { 2.0 }
fn default_role_weight() -> f32 { 1.5 }
fn default_text_weight() -> f32 { 3.0 }
fn default_near_text_weight() -> f32 { 1.5 }
fn default_one() -> f32 { 1.0 }
