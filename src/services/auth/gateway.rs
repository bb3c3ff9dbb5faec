//! Bearer gateway: extract → verify → validate, terminal states only.
//!
//! ```text
//! START ─extract─▶ EXTRACTED ─verify─▶ VERIFIED ─validate─▶ AUTHORIZED
//!   └──────────────────┴──────────────────┴─────────────────▶ REJECTED
//! ```
//!
//! The gateway is built once from an [`AuthPolicy`] and shared read-only by all
//! requests; `authenticate` is pure CPU work and keeps nothing between calls.

use axum::http::HeaderMap;

use super::access_jwt::TokenVerifier;
use super::challenge::Challenge;
use super::claims;
use super::credential::Credential;
use super::error::AuthError;
use super::identity::Identity;
use super::policy::AuthPolicy;

#[derive(Debug, Clone)]
pub struct Gateway {
    policy: AuthPolicy,
    verifier: TokenVerifier,
    challenge: Challenge,
}

impl Gateway {
    pub fn new(policy: AuthPolicy) -> Self {
        let verifier = TokenVerifier::new(&policy);
        let challenge = Challenge::new(policy.header_scheme(), policy.realm());

        Self {
            policy,
            verifier,
            challenge,
        }
    }

    /// Authenticate a raw `Authorization` header value.
    ///
    /// `Ok` is returned only when every stage succeeded.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, AuthError> {
        let credential = Credential::parse(authorization, self.policy.header_scheme())?;
        self.authorize(credential)
    }

    /// Same as [`Gateway::authenticate`], reading the request headers.
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let credential = Credential::from_headers(headers, self.policy.header_scheme())?;
        self.authorize(credential)
    }

    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    fn authorize(&self, credential: Credential<'_>) -> Result<Identity, AuthError> {
        let decoded = self.verifier.verify(credential.token)?;
        let subject = claims::validate(&decoded, self.policy.required_scopes_any_of())?;

        Ok(Identity::new(subject))
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use serde_json::{Value, json};

    use super::*;
    use crate::services::auth::error::Stage;

    const SECRET: &[u8] = b"catalog-secret-2023";

    fn gateway() -> Gateway {
        let policy =
            AuthPolicy::new(SECRET.to_vec(), ["catalog:read", "catalog:write"], "Bearer").unwrap();
        Gateway::new(policy)
    }

    fn sign_with(secret: &[u8], claims: &Value) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[test]
    fn no_header_is_rejected_at_extract() {
        let err = gateway().authenticate(None).unwrap_err();
        assert_eq!(err, AuthError::MissingCredential);
        assert_eq!(err.stage(), Stage::Extract);
    }

    #[test]
    fn empty_bearer_token_is_malformed() {
        assert_eq!(
            gateway().authenticate(Some("Bearer ")),
            Err(AuthError::MalformedHeader)
        );
    }

    #[test]
    fn wrong_scheme_never_reaches_verification() {
        // A perfectly valid token behind the wrong scheme is still rejected at extract.
        let token = sign_with(SECRET, &json!({"sub": "u1", "scope": "catalog:read"}));
        let err = gateway()
            .authenticate(Some(&format!("Basic {token}")))
            .unwrap_err();
        assert_eq!(err, AuthError::UnsupportedScheme);
        assert_eq!(err.stage(), Stage::Extract);
    }

    #[test]
    fn valid_token_publishes_subject_as_principal() {
        let token = sign_with(SECRET, &json!({"sub": "u1", "scope": "catalog:read"}));
        let identity = gateway().authenticate(Some(&bearer(&token))).unwrap();
        assert_eq!(identity.principal_name(), "u1");
        assert_eq!(identity.authentication_scheme(), "OAuth2");
    }

    #[test]
    fn verification_is_idempotent() {
        let gw = gateway();
        let token = sign_with(SECRET, &json!({"sub": "u1", "scope": "catalog:write"}));
        let header = bearer(&token);

        let first = gw.authenticate(Some(&header)).unwrap();
        let second = gw.authenticate(Some(&header)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn disjoint_scope_is_rejected_at_validate() {
        let token = sign_with(SECRET, &json!({"sub": "u1", "scope": "inventory:write"}));
        let err = gateway().authenticate(Some(&bearer(&token))).unwrap_err();
        assert_eq!(err, AuthError::InsufficientScope);
        assert_eq!(err.stage(), Stage::Validate);
    }

    #[test]
    fn wrong_secret_is_rejected_at_verify() {
        let token = sign_with(b"not-the-secret", &json!({"sub": "u1", "scope": "catalog:read"}));
        let err = gateway().authenticate(Some(&bearer(&token))).unwrap_err();
        assert_eq!(err, AuthError::SignatureInvalid);
        assert_eq!(err.stage(), Stage::Verify);
    }

    #[test]
    fn expired_token_is_rejected() {
        let exp = chrono::Utc::now().timestamp() - 3600;
        let token = sign_with(
            SECRET,
            &json!({"sub": "u1", "scope": "catalog:read", "exp": exp}),
        );
        assert_eq!(
            gateway().authenticate(Some(&bearer(&token))),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn missing_subject_is_rejected() {
        let token = sign_with(SECRET, &json!({"scope": "catalog:read"}));
        assert_eq!(
            gateway().authenticate(Some(&bearer(&token))),
            Err(AuthError::MissingSubject)
        );
    }

    #[test]
    fn configured_scheme_is_honoured() {
        let policy = AuthPolicy::new(SECRET.to_vec(), ["catalog:read"], "Token").unwrap();
        let gw = Gateway::new(policy);
        let token = sign_with(SECRET, &json!({"sub": "u1", "scope": "catalog:read"}));

        assert!(gw.authenticate(Some(&format!("token {token}"))).is_ok());
        assert_eq!(
            gw.authenticate(Some(&bearer(&token))),
            Err(AuthError::UnsupportedScheme)
        );
        assert_eq!(
            gw.challenge().header_value(),
            r#"Token realm="oauth2""#
        );
    }
}
