//! Read-only authentication policy, built once at startup and handed to the gateway.

use std::collections::BTreeSet;

use thiserror::Error;

pub const DEFAULT_HEADER_SCHEME: &str = "Bearer";
pub const DEFAULT_REALM: &str = "oauth2";
pub const DEFAULT_LEEWAY_SECONDS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("shared secret must not be empty")]
    EmptySecret,
    #[error("at least one required scope must be configured")]
    NoRequiredScopes,
    #[error("required scope must be a single token: {0:?}")]
    InvalidScope(String),
    #[error("invalid header scheme: {0:?}")]
    InvalidScheme(String),
    #[error("invalid realm: {0:?}")]
    InvalidRealm(String),
}

/// Shared secret, accepted scopes, and header scheme for the bearer gateway.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthPolicy {
    shared_secret: Vec<u8>,
    required_scopes_any_of: BTreeSet<String>,
    header_scheme: String,
    realm: String,
    leeway_seconds: u64,
}

impl std::fmt::Debug for AuthPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPolicy")
            .field("shared_secret", &"<redacted>")
            .field("required_scopes_any_of", &self.required_scopes_any_of)
            .field("header_scheme", &self.header_scheme)
            .field("realm", &self.realm)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl AuthPolicy {
    pub fn new<I, S>(
        shared_secret: impl Into<Vec<u8>>,
        required_scopes_any_of: I,
        header_scheme: impl Into<String>,
    ) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let shared_secret = shared_secret.into();
        if shared_secret.is_empty() {
            return Err(PolicyError::EmptySecret);
        }

        let required_scopes_any_of: BTreeSet<String> = required_scopes_any_of
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.trim().is_empty())
            .collect();
        // Token scopes are split on whitespace, so such a scope could never match.
        if let Some(scope) = required_scopes_any_of
            .iter()
            .find(|s| s.chars().any(char::is_whitespace))
        {
            return Err(PolicyError::InvalidScope(scope.clone()));
        }
        if required_scopes_any_of.is_empty() {
            return Err(PolicyError::NoRequiredScopes);
        }

        let header_scheme = header_scheme.into();
        if !is_token(&header_scheme) {
            return Err(PolicyError::InvalidScheme(header_scheme));
        }

        Ok(Self {
            shared_secret,
            required_scopes_any_of,
            header_scheme,
            realm: DEFAULT_REALM.to_string(),
            leeway_seconds: DEFAULT_LEEWAY_SECONDS,
        })
    }

    pub fn with_realm(mut self, realm: impl Into<String>) -> Result<Self, PolicyError> {
        let realm = realm.into();
        // Must fit inside a quoted-string without escaping.
        let valid = !realm.is_empty()
            && realm
                .chars()
                .all(|c| c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\'));
        if !valid {
            return Err(PolicyError::InvalidRealm(realm));
        }
        self.realm = realm;
        Ok(self)
    }

    pub fn with_leeway_seconds(mut self, leeway_seconds: u64) -> Self {
        self.leeway_seconds = leeway_seconds;
        self
    }

    pub fn shared_secret(&self) -> &[u8] {
        &self.shared_secret
    }

    pub fn required_scopes_any_of(&self) -> &BTreeSet<String> {
        &self.required_scopes_any_of
    }

    pub fn header_scheme(&self) -> &str {
        &self.header_scheme
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn leeway_seconds(&self) -> u64 {
        self.leeway_seconds
    }
}

// RFC 7230 token
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#'
                        | b'$'
                        | b'%'
                        | b'&'
                        | b'\''
                        | b'*'
                        | b'+'
                        | b'-'
                        | b'.'
                        | b'^'
                        | b'_'
                        | b'`'
                        | b'|'
                        | b'~'
                )
        })
}
