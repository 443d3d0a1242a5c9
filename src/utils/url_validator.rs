//! Well-formedness checks for URLs submitted for shortening.
//!
//! URLs are validated but never rewritten: the stored URL is the submitted
//! string, byte for byte.

use url::Url;

/// Longest URL accepted for shortening, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} bytes")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must have a host")]
    MissingHost,
}

/// Checks that `input` is an absolute HTTP(S) URL with a host.
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] that applies.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://dwarf.io/a-very-long-url").is_ok());
/// assert!(validate_url("invalid-url").is_err());
/// assert!(validate_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://dwarf.io/a-very-long-url").is_ok());
        assert!(validate_url("https://dwarf.io/test?param=value&other=123#fragment").is_ok());
    }

    #[test]
    fn test_rejects_relative_input() {
        assert!(matches!(
            validate_url("invalid-url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_dangerous_protocols() {
        for input in ["javascript:alert(1)", "data:text/plain,hi", "ftp://example.com"] {
            assert_eq!(
                validate_url(input),
                Err(UrlValidationError::UnsupportedProtocol),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_url(""), Err(UrlValidationError::Empty));
        assert_eq!(validate_url("   "), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_rejects_too_long() {
        let url = format!("https://dwarf.io/{}", "a".repeat(MAX_URL_LENGTH));
        assert_eq!(validate_url(&url), Err(UrlValidationError::TooLong));
    }

    #[test]
    fn test_accepts_long_url_within_limit() {
        let url = format!("https://dwarf.io/{}", "very-long-path/".repeat(10));
        assert!(validate_url(&url).is_ok());
    }
}
