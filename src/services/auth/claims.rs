//! Claim policy: a subject must be present and the scope must overlap the required set.

use std::collections::BTreeSet;

use super::access_jwt::DecodedToken;
use super::error::AuthError;

/// Returns the validated subject.
///
/// Missing or mistyped `scope` is treated as insufficient (fail closed).
pub fn validate<'a>(
    token: &'a DecodedToken,
    required_scopes_any_of: &BTreeSet<String>,
) -> Result<&'a str, AuthError> {
    let subject = token
        .subject
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(AuthError::MissingSubject)?;

    let scopes = token.scopes.as_ref().ok_or(AuthError::InsufficientScope)?;
    if scopes.is_disjoint(required_scopes_any_of) {
        return Err(AuthError::InsufficientScope);
    }

    Ok(subject)
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;

    fn required() -> BTreeSet<String> {
        ["catalog:read", "catalog:write"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn token(subject: Option<&str>, scope: Option<&str>) -> DecodedToken {
        DecodedToken {
            subject: subject.map(String::from),
            scopes: scope.map(|s| s.split_whitespace().map(String::from).collect()),
            claims: Map::new(),
        }
    }

    #[test]
    fn overlapping_scope_is_authorized() {
        let t = token(Some("u1"), Some("profile catalog:read"));
        assert_eq!(validate(&t, &required()), Ok("u1"));
    }

    #[test]
    fn disjoint_scope_is_insufficient() {
        let t = token(Some("u1"), Some("inventory:write"));
        assert_eq!(validate(&t, &required()), Err(AuthError::InsufficientScope));
    }

    #[test]
    fn scope_matching_is_exact_not_substring() {
        // "catalog:readonly" must not satisfy "catalog:read"
        let t = token(Some("u1"), Some("catalog:readonly xcatalog:write"));
        assert_eq!(validate(&t, &required()), Err(AuthError::InsufficientScope));
    }

    #[test]
    fn missing_scope_is_insufficient() {
        let t = token(Some("u1"), None);
        assert_eq!(validate(&t, &required()), Err(AuthError::InsufficientScope));

        let empty = token(Some("u1"), Some("   "));
        assert_eq!(validate(&empty, &required()), Err(AuthError::InsufficientScope));
    }

    #[test]
    fn missing_or_blank_subject_is_rejected_first() {
        let t = token(None, Some("catalog:read"));
        assert_eq!(validate(&t, &required()), Err(AuthError::MissingSubject));

        let blank = token(Some("  "), None);
        assert_eq!(validate(&blank, &required()), Err(AuthError::MissingSubject));
    }
}
