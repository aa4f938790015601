use crate::dom::document::{Document, SnapshotNode};
use crate::error::LocatorError;

/// Load a document snapshot from a file path or an `http(s)://` URL.
pub fn load_snapshot(source: &str) -> Result<Document, LocatorError> {
    if is_remote(source) {
        fetch_snapshot(source)
    } else {
        let content = std::fs::read_to_string(source).map_err(|e| LocatorError::Io {
            path: source.to_string(),
            source: e,
        })?;
        Document::from_json(&content)
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn fetch_snapshot(url: &str) -> Result<Document, LocatorError> {
    let http_err = |source| LocatorError::Http {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::new();
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(http_err)?;

    let snapshot: SnapshotNode = response.json().map_err(http_err)?;
    Ok(Document::from_snapshot(&snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_sources_are_detected_by_scheme() {
        assert!(is_remote("http://localhost:8080/snapshot.json"));
        assert!(is_remote("https://example.com/dom"));
        assert!(!is_remote("fixtures/page.json"));
        assert!(!is_remote("/tmp/http-dump.json"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_snapshot("does/not/exist.json").unwrap_err();
        assert!(matches!(err, LocatorError::Io { .. }), "got {err}");
    }
}
