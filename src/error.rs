use std::fmt;

#[derive(Debug)]
pub enum LocatorError {
    /// Reading a snapshot, record or config file failed
    Io { path: String, source: std::io::Error },

    /// Fetching a remote snapshot failed
    Http { url: String, source: reqwest::Error },

    /// JSON parsing failed (snapshot or locator record)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (locator record)
    JsonSerialize { context: String, source: serde_json::Error },

    /// A configured class pattern is not a valid regular expression
    InvalidPattern { pattern: String, source: regex::Error },

    /// A path expression could not be parsed
    XPathSyntax { expression: String, position: usize, message: String },

    /// The record was written by an incompatible format version
    UnsupportedVersion { found: u32, expected: u32 },

    /// A CLI-supplied path expression selected no node
    NodeNotFound { expression: String },
}

impl fmt::Display for LocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocatorError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path, source)
            }
            LocatorError::Http { url, source } => {
                write!(f, "Failed to fetch snapshot from {}: {}", url, source)
            }
            LocatorError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            LocatorError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            LocatorError::InvalidPattern { pattern, source } => {
                write!(f, "Invalid class pattern '{}': {}", pattern, source)
            }
            LocatorError::XPathSyntax { expression, position, message } => {
                write!(f, "Invalid path '{}' at {}: {}", expression, position, message)
            }
            LocatorError::UnsupportedVersion { found, expected } => {
                write!(f, "Unsupported locator record version {} (expected {})", found, expected)
            }
            LocatorError::NodeNotFound { expression } => {
                write!(f, "No node matches '{}'", expression)
            }
        }
    }
}

impl std::error::Error for LocatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LocatorError::Io { source, .. } => Some(source),
            LocatorError::Http { source, .. } => Some(source),
            LocatorError::JsonParse { source, .. } => Some(source),
            LocatorError::JsonSerialize { source, .. } => Some(source),
            LocatorError::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}
