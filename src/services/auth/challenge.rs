//! `WWW-Authenticate` challenge sent with every 401 (RFC 6750 section 3).

use axum::http::HeaderValue;

pub const UNAUTHORIZED_MESSAGE: &str = "Credentials are required to access this resource.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    scheme: String,
    realm: String,
}

impl Challenge {
    pub fn new(scheme: impl Into<String>, realm: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            realm: realm.into(),
        }
    }

    /// `<scheme> realm="<realm>"`
    pub fn header_value(&self) -> HeaderValue {
        // AuthPolicy validates scheme/realm, so the fallback is never expected.
        HeaderValue::from_str(&format!(r#"{} realm="{}""#, self.scheme, self.realm))
            .unwrap_or_else(|_| HeaderValue::from_static(r#"Bearer realm="oauth2""#))
    }
}

impl Default for Challenge {
    fn default() -> Self {
        Self::new("Bearer", "oauth2")
    }
}
