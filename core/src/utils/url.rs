//! URL utilities
//!
//! Helpers around the `url` crate used by the URL constraint prototype and
//! available to application code.

use url::Url;

use crate::error::{FrameworkError, FrameworkResult};

/// Parse a URL, mapping failures into the framework error type
pub fn parse_url(text: &str) -> FrameworkResult<Url> {
    Url::parse(text).map_err(|e| FrameworkError::Internal {
        message: format!("invalid URL '{text}': {e}"),
    })
}

/// Check whether a string parses as an absolute URL
pub fn is_valid_url(text: &str) -> bool {
    Url::parse(text).is_ok()
}

/// Normalize a URL to its canonical string form
pub fn normalize_url(text: &str) -> FrameworkResult<String> {
    Ok(parse_url(text)?.to_string())
}

/// Extract the host of a URL, when it has one
pub fn host_of(text: &str) -> Option<String> {
    Url::parse(text)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("not a url"));
    }

    #[test]
    fn test_normalization() {
        assert_eq!(
            normalize_url("https://Example.COM").unwrap(),
            "https://example.com/"
        );
        assert!(normalize_url("nope").is_err());
    }

    #[test]
    fn test_host_extraction() {
        assert_eq!(
            host_of("https://example.com/path"),
            Some("example.com".to_string())
        );
        assert_eq!(host_of("mailto:user@example.com"), None);
        assert_eq!(host_of("broken"), None);
    }
}
