/*
 * Responsibility
 * - Bearer gateway の失敗理由 (ログ用の内部分類)
 * - 外部には常に同じ 401 + challenge として見せる。ここの区別は漏らさない
 */
use std::fmt;

use thiserror::Error;

/// Gateway stage that produced a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Verify,
    Validate,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Verify => "verify",
            Stage::Validate => "validate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a request was rejected.
///
/// Messages are safe to log: they never contain the token or the secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("authorization header is missing")]
    MissingCredential,
    #[error("authorization header is malformed")]
    MalformedHeader,
    #[error("authorization scheme is not supported")]
    UnsupportedScheme,

    #[error("token is not a well-formed compact JWS")]
    TokenMalformed,
    #[error("token declares an algorithm other than the configured one")]
    AlgorithmMismatch,
    #[error("token signature does not match")]
    SignatureInvalid,
    #[error("token has expired")]
    TokenExpired,
    #[error("token is not valid yet")]
    TokenNotYetValid,

    #[error("token has no subject")]
    MissingSubject,
    #[error("token scope does not satisfy the policy")]
    InsufficientScope,
}

impl AuthError {
    pub fn stage(&self) -> Stage {
        match self {
            AuthError::MissingCredential
            | AuthError::MalformedHeader
            | AuthError::UnsupportedScheme => Stage::Extract,
            AuthError::TokenMalformed
            | AuthError::AlgorithmMismatch
            | AuthError::SignatureInvalid
            | AuthError::TokenExpired
            | AuthError::TokenNotYetValid => Stage::Verify,
            AuthError::MissingSubject | AuthError::InsufficientScope => Stage::Validate,
        }
    }
}
