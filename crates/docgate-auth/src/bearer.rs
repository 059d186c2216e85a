//! Bearer token extraction (RFC 6750)
//!
//! Tokens are transmitted in the Authorization header:
//!
//! ```text
//! Authorization: Bearer <token>
//! ```

/// Authentication scheme name as it appears in the Authorization header
pub const BEARER_PREFIX: &str = "Bearer";

/// Extract the token from an Authorization header value
///
/// The scheme name is matched case-insensitively. Returns `None` when the
/// value uses another scheme or carries an empty token.
///
/// # Example
/// ```
/// use docgate_auth::extract_bearer_token;
///
/// assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
/// assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
/// assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
/// ```
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, rest) = header_value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }

    let token = rest.trim();
    if token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_token() {
        assert_eq!(
            extract_bearer_token("Bearer my-secret-token"),
            Some("my-secret-token")
        );
    }

    #[test]
    fn test_case_insensitive_bearer_prefix() {
        assert_eq!(extract_bearer_token("BEARER mytoken"), Some("mytoken"));
        assert_eq!(extract_bearer_token("bearer mytoken"), Some("mytoken"));
    }

    #[test]
    fn test_wrong_auth_scheme() {
        assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
    }

    #[test]
    fn test_empty_token_rejected() {
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Bearer    "), None);
        assert_eq!(extract_bearer_token("Bearer"), None);
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(extract_bearer_token("  Bearer   tok  "), Some("tok"));
    }

    #[test]
    fn test_non_ascii_header_does_not_panic() {
        assert_eq!(extract_bearer_token("Bérer token"), None);
        assert_eq!(extract_bearer_token("ß"), None);
    }
}
