use regex::Regex;

use crate::config::ClassConfig;
use crate::error::LocatorError;

/// Decides whether a class token is a build artifact (hash-like) or a
/// human-authored name.
///
/// A token is hash-like when any rule fires:
/// 1. it starts with a known generated prefix (`css-`, `sc-`, `jsx-`, ...);
/// 2. it fully matches one of the configured regular expressions;
/// 3. its last `-`/`_`-delimited segment is at least `min_suffix_len`
///    alphanumerics mixing letters and digits (`Button_root__3xK9q`).
#[derive(Debug, Clone)]
pub struct ClassFilter {
    prefixes: Vec<String>,
    patterns: Vec<Regex>,
    min_suffix_len: usize,
}

impl ClassFilter {
    pub fn new(config: &ClassConfig) -> Result<Self, LocatorError> {
        let patterns = config
            .patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|source| LocatorError::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            prefixes: config.generated_prefixes.clone(),
            patterns,
            min_suffix_len: config.min_suffix_len,
        })
    }

    pub fn is_hash_like(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        self.has_generated_prefix(token)
            || self.patterns.iter().any(|re| re.is_match(token))
            || self.has_mixed_suffix(token)
    }

    /// Split a `class` attribute into its retained tokens, deduplicated,
    /// in source order.
    pub fn stable_classes(&self, class_attr: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for token in class_attr.split_whitespace() {
            if !self.is_hash_like(token) && !out.iter().any(|t| t == token) {
                out.push(token.to_string());
            }
        }
        out
    }

    fn has_generated_prefix(&self, token: &str) -> bool {
        self.prefixes
            .iter()
            .any(|p| token.starts_with(p.as_str()) && token.len() > p.len())
    }

    fn has_mixed_suffix(&self, token: &str) -> bool {
        if self.min_suffix_len == 0 {
            return false;
        }
        let Some(idx) = token.rfind(['-', '_']) else {
            return false;
        };
        if idx == 0 {
            return false;
        }
        let suffix = &token[idx + 1..];
        suffix.len() >= self.min_suffix_len
            && suffix.chars().all(|c| c.is_ascii_alphanumeric())
            && suffix.chars().any(|c| c.is_ascii_digit())
            && suffix.chars().any(|c| c.is_ascii_alphabetic())
    }
}

impl Default for ClassFilter {
    /// Built-in rules. Patterns that fail to compile are skipped.
    fn default() -> Self {
        let config = ClassConfig::default();
        Self {
            patterns: config
                .patterns
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
            prefixes: config.generated_prefixes,
            min_suffix_len: config.min_suffix_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_prefixes_are_hash_like() {
        let f = ClassFilter::default();
        assert!(f.is_hash_like("css-1x92ab"));
        assert!(f.is_hash_like("sc-Ax9z"));
        assert!(f.is_hash_like("jsx-123456"));
        assert!(f.is_hash_like("svelte-1k2j3h"));
        assert!(!f.is_hash_like("css-"), "bare prefix is not a generated name");
    }

    #[test]
    fn hex_and_mixed_suffixes_are_hash_like() {
        let f = ClassFilter::default();
        assert!(f.is_hash_like("hash-class-abc123def456"));
        assert!(f.is_hash_like("Button_root__3xK9q"));
        assert!(f.is_hash_like("deadbeef01"));
        assert!(f.is_hash_like("x12345"));
    }

    #[test]
    fn human_names_with_digits_are_kept() {
        let f = ClassFilter::default();
        for token in ["buy-btn", "col-6", "h1-title", "item-2024", "grid2", "btn-primary", "mt-4"] {
            assert!(!f.is_hash_like(token), "{token} should be stable");
        }
    }

    #[test]
    fn stable_classes_dedupes_and_filters() {
        let f = ClassFilter::default();
        assert_eq!(
            f.stable_classes("card css-1x92ab card  active sc-Ax9z"),
            vec!["card".to_string(), "active".to_string()]
        );
    }

    #[test]
    fn mixed_suffix_rule_can_be_disabled() {
        let config = ClassConfig {
            generated_prefixes: vec![],
            patterns: vec![],
            min_suffix_len: 0,
        };
        let f = ClassFilter::new(&config).unwrap();
        assert!(!f.is_hash_like("Button_root__3xK9q"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let config = ClassConfig {
            patterns: vec!["([".into()],
            ..ClassConfig::default()
        };
        assert!(matches!(
            ClassFilter::new(&config),
            Err(LocatorError::InvalidPattern { .. })
        ));
    }
}
