//! `Authorization` header parsing: `<scheme> <credential>`.

use axum::http::{HeaderMap, header};

use super::error::AuthError;

/// Scheme and credential borrowed from the request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credential<'a> {
    pub scheme: &'a str,
    pub token: &'a str,
}

impl<'a> Credential<'a> {
    /// Parse a raw header value and check the scheme against `expected_scheme`
    /// (ASCII case-insensitive).
    ///
    /// Exactly one space separates the scheme from a non-empty credential;
    /// anything else is `MalformedHeader`.
    pub fn parse(raw: Option<&'a str>, expected_scheme: &str) -> Result<Self, AuthError> {
        let raw = raw.ok_or(AuthError::MissingCredential)?;

        let (scheme, token) = raw.split_once(' ').ok_or(AuthError::MalformedHeader)?;
        if scheme.is_empty() || token.is_empty() || token.contains(char::is_whitespace) {
            return Err(AuthError::MalformedHeader);
        }

        if !scheme.eq_ignore_ascii_case(expected_scheme) {
            return Err(AuthError::UnsupportedScheme);
        }

        Ok(Self { scheme, token })
    }

    /// Same as [`Credential::parse`], reading the first `Authorization` header.
    /// Values that are not visible ASCII are treated as malformed.
    pub fn from_headers(headers: &'a HeaderMap, expected_scheme: &str) -> Result<Self, AuthError> {
        let raw = headers
            .get(header::AUTHORIZATION)
            .map(|v| v.to_str().map_err(|_| AuthError::MalformedHeader))
            .transpose()?;

        Self::parse(raw, expected_scheme)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn missing_header_is_missing_credential() {
        assert_eq!(
            Credential::parse(None, "Bearer"),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        for raw in ["", "Bearer", "Bearer ", " Bearer abc", "Bearer  abc", "Bearer a b"] {
            assert_eq!(
                Credential::parse(Some(raw), "Bearer"),
                Err(AuthError::MalformedHeader),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn wrong_scheme_is_unsupported() {
        assert_eq!(
            Credential::parse(Some("Basic xyz"), "Bearer"),
            Err(AuthError::UnsupportedScheme)
        );
    }

    #[test]
    fn scheme_match_ignores_case() {
        let cred = Credential::parse(Some("bEARER abc.def.ghi"), "Bearer").unwrap();
        assert_eq!(cred.scheme, "bEARER");
        assert_eq!(cred.token, "abc.def.ghi");
    }

    #[test]
    fn non_ascii_header_value_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        assert_eq!(
            Credential::from_headers(&headers, "Bearer"),
            Err(AuthError::MalformedHeader)
        );
    }

    #[test]
    fn reads_first_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.append(header::AUTHORIZATION, HeaderValue::from_static("Bearer first"));
        headers.append(header::AUTHORIZATION, HeaderValue::from_static("Bearer second"));
        let cred = Credential::from_headers(&headers, "Bearer").unwrap();
        assert_eq!(cred.token, "first");
    }
}
