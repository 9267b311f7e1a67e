//! Destination URL checks.
//!
//! Links store the destination exactly as submitted; this module only decides
//! whether the submission is a syntactically valid absolute URL that a
//! browser can be redirected to.

use url::Url;

/// Reasons a destination URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL is required")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must not contain control characters")]
    ControlCharacter,
}

/// Validates a destination URL and returns it trimmed.
///
/// # Rules
///
/// 1. Must not contain control characters. The URL parser would silently
///    drop tabs and newlines, but the stored text has to be usable as a
///    `Location` header as-is
/// 2. Must parse as an absolute URL (scheme required)
/// 3. Must carry a non-empty host, which rules out `mailto:`, `javascript:`,
///    `data:` and `file:///` style URLs
///
/// # Errors
///
/// Returns [`UrlValidationError`] describing the first rule violated.
pub fn validate_target_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }
    if trimmed.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert_eq!(
            validate_target_url("https://example.com/path?q=1").unwrap(),
            "https://example.com/path?q=1"
        );
        assert!(validate_target_url("http://localhost:3000/test").is_ok());
    }

    #[test]
    fn test_keeps_url_as_submitted() {
        // No normalization: host case, default port and fragment survive.
        assert_eq!(
            validate_target_url("HTTPS://EXAMPLE.COM:443/Path#anchor").unwrap(),
            "HTTPS://EXAMPLE.COM:443/Path#anchor"
        );
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            validate_target_url("  https://example.com  ").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_target_url("   "), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(
            validate_target_url("example.com"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_target_url("not a valid url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_embedded_control_characters() {
        for input in [
            "https://example.com/a\nb",
            "https://exa\tmple.com",
            "https://example.com/\r\nSet-Cookie: x=1",
            "https://example.com/\u{7f}",
        ] {
            assert_eq!(
                validate_target_url(input),
                Err(UrlValidationError::ControlCharacter),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_accepted_url_is_a_valid_header_value() {
        let url = validate_target_url(" https://example.com/a?b=c d ").unwrap();
        assert!(axum::http::HeaderValue::try_from(url).is_ok());
    }

    #[test]
    fn test_rejects_hostless_schemes() {
        assert_eq!(
            validate_target_url("javascript:alert('xss')"),
            Err(UrlValidationError::MissingHost)
        );
        assert_eq!(
            validate_target_url("mailto:test@example.com"),
            Err(UrlValidationError::MissingHost)
        );
        assert_eq!(
            validate_target_url("file:///home/user/document.txt"),
            Err(UrlValidationError::MissingHost)
        );
    }
}
