//! URL 语法验证
//!
//! A candidate destination is well-formed when it parses as an absolute
//! URL with a scheme and a non-empty network authority (host).

use url::Url;

/// URL 验证错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidFormat(String),
    MissingHost(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::MissingHost(scheme) => {
                write!(f, "URL with scheme '{}' has no network location", scheme)
            }
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 验证 URL 格式
///
/// Returns the parsed URL so callers don't parse twice.
pub fn validate_url(url: &str) -> Result<Url, UrlValidationError> {
    if url.trim().is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    // javascript:, data:, mailto: etc. parse fine but carry no authority
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost(parsed.scheme().to_string()));
    }

    Ok(parsed)
}

/// Malformed input yields false, never an error.
pub fn is_valid_url(url: &str) -> bool {
    validate_url(url).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(is_valid_url("http://example.com"));
        assert!(is_valid_url("https://example.com/path?query=1#frag"));
        assert!(is_valid_url("http://localhost:8080"));
        assert!(is_valid_url("https://user:pw@example.com"));
        // syntax only: non-http schemes with an authority still pass
        assert!(is_valid_url("ftp://files.example.com/a.txt"));
    }

    #[test]
    fn test_rejects_text_without_scheme() {
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("/relative/path"));
    }

    #[test]
    fn test_rejects_urls_without_authority() {
        assert!(matches!(
            validate_url("mailto:someone@example.com"),
            Err(UrlValidationError::MissingHost(_))
        ));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("data:text/html,<b>x</b>"));
        assert!(!is_valid_url("file:///etc/passwd"));
    }

    #[test]
    fn test_empty_url() {
        assert_eq!(validate_url(""), Err(UrlValidationError::EmptyUrl));
        assert_eq!(validate_url("   "), Err(UrlValidationError::EmptyUrl));
    }

    #[test]
    fn test_malformed_authority() {
        assert!(!is_valid_url("http://"));
        assert!(!is_valid_url("https://exa mple.com"));
    }
}
