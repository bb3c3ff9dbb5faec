//! Access token (compact JWS, HS256) verification.
//!
//! Order of checks:
//! 1. structure: exactly three non-empty base64url segments
//! 2. `alg` in the protected header must be the configured one (no downgrade / `none`)
//! 3. HMAC signature (constant-time compare inside jsonwebtoken's crypto backend)
//! 4. `exp` / `nbf` when present, with leeway
//!
//! Every failure becomes an [`AuthError`]; nothing here panics on untrusted input.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::error::AuthError;
use super::policy::AuthPolicy;

const ALGORITHM: Algorithm = Algorithm::HS256;
const ALGORITHM_NAME: &str = "HS256";

/// Claims of a token whose signature and time window have been verified.
///
/// Scope/subject are NOT checked here; that is the claims validator's job.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub subject: Option<String>,
    // None when the claim is absent or not a string
    pub scopes: Option<BTreeSet<String>>,
    pub claims: Map<String, Value>,
}

impl DecodedToken {
    fn from_claims(claims: Map<String, Value>) -> Self {
        let subject = claims.get("sub").and_then(Value::as_str).map(str::to_owned);
        let scopes = claims
            .get("scope")
            .and_then(Value::as_str)
            .map(|s| s.split_whitespace().map(str::to_owned).collect());

        Self {
            subject,
            scopes,
            claims,
        }
    }
}

#[derive(Deserialize)]
struct ProtectedHeader {
    #[serde(default)]
    alg: Option<String>,
}

/// HS256 access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(policy: &AuthPolicy) -> Self {
        let decoding_key = DecodingKey::from_secret(policy.shared_secret());

        let mut validation = Validation::new(ALGORITHM);
        // Time claims are optional, but enforced when present.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // No issuer/audience contract for this service.
        validation.validate_aud = false;
        validation.leeway = policy.leeway_seconds();

        Self {
            decoding_key,
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<DecodedToken, AuthError> {
        let header_segment = split_compact(token)?;
        check_algorithm(header_segment)?;

        let data = jsonwebtoken::decode::<Map<String, Value>>(
            token,
            &self.decoding_key,
            &self.validation,
        )
        .map_err(|e| map_jwt_error(e.kind()))?;

        // jsonwebtoken skips time claims it cannot parse; we do not.
        for name in ["exp", "nbf"] {
            if let Some(v) = data.claims.get(name)
                && !v.is_u64()
            {
                return Err(AuthError::TokenMalformed);
            }
        }

        Ok(DecodedToken::from_claims(data.claims))
    }
}

// Returns the header segment of a structurally valid compact JWS.
fn split_compact(token: &str) -> Result<&str, AuthError> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::TokenMalformed);
    };

    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return Err(AuthError::TokenMalformed);
    }

    Ok(header)
}

fn check_algorithm(header_segment: &str) -> Result<(), AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(header_segment)
        .map_err(|_| AuthError::TokenMalformed)?;
    let header: ProtectedHeader =
        serde_json::from_slice(&bytes).map_err(|_| AuthError::TokenMalformed)?;

    match header.alg.as_deref() {
        None => Err(AuthError::TokenMalformed),
        Some(ALGORITHM_NAME) => Ok(()),
        Some(_) => Err(AuthError::AlgorithmMismatch),
    }
}

fn map_jwt_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidSignature => AuthError::SignatureInvalid,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            AuthError::AlgorithmMismatch
        }
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
        // Anything else (base64, json, utf8, key or crypto errors): fail closed.
        _ => AuthError::TokenMalformed,
    }
}
