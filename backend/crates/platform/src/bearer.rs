//! Bearer Credential Parsing
//!
//! Extraction of `Authorization: Bearer <token>` credentials (RFC 6750).

use axum::http::{HeaderMap, header};

/// Authentication scheme name, matched case-insensitively
pub const BEARER_SCHEME: &str = "Bearer";

/// Why a bearer credential could not be read from the headers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    /// No `Authorization` header at all
    #[error("Missing Authorization header")]
    Missing,

    /// Header present but not `Bearer <token>`
    #[error("Malformed Authorization header")]
    Malformed,
}

/// Extract the bearer token from the `Authorization` header
///
/// ## Returns
/// * `Ok(token)` - the raw token text, surrounding whitespace trimmed
/// * `Err(BearerError::Missing)` - no header
/// * `Err(BearerError::Malformed)` - wrong scheme, empty token or non-ASCII value
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BearerError::Missing)?
        .to_str()
        .map_err(|_| BearerError::Malformed)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(BearerError::Malformed)?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(BearerError::Malformed);
    }

    let token = token.trim();
    if token.is_empty() || token.contains(' ') {
        return Err(BearerError::Malformed);
    }

    Ok(token)
}

/// Build an `Authorization` header value for a token
pub fn bearer_header_value(token: &str) -> String {
    format!("{} {}", BEARER_SCHEME, token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        let headers = headers_with("Bearer abc.def");
        assert_eq!(extract_bearer_token(&headers), Ok("abc.def"));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let headers = headers_with("bearer abc.def");
        assert_eq!(extract_bearer_token(&headers), Ok("abc.def"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            extract_bearer_token(&HeaderMap::new()),
            Err(BearerError::Missing)
        );
    }

    #[test]
    fn test_wrong_scheme() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert_eq!(extract_bearer_token(&headers), Err(BearerError::Malformed));
    }

    #[test]
    fn test_empty_token() {
        assert_eq!(
            extract_bearer_token(&headers_with("Bearer ")),
            Err(BearerError::Malformed)
        );
        assert_eq!(
            extract_bearer_token(&headers_with("Bearer")),
            Err(BearerError::Malformed)
        );
    }

    #[test]
    fn test_header_value_roundtrip() {
        let value = bearer_header_value("tok");
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
        assert_eq!(extract_bearer_token(&headers), Ok("tok"));
    }
}
