/*
 * Responsibility
 * - 認証済み主体 (Identity) の型
 * - middleware が request extensions に格納し、handler は extractor 経由で読むだけ
 *
 * Notes
 * - ロール判定は "authn-only, no RBAC" ポリシー: 認証済みなら全ロールを通す
 *   (本格的な RBAC が必要になったらここを差し替える)
 */

pub const AUTHENTICATION_SCHEME: &str = "OAuth2";

/// Role policy applied by [`Identity::is_user_in_role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolePolicy {
    /// Every authenticated principal holds every role.
    AuthnOnly,
}

pub const ROLE_POLICY: RolePolicy = RolePolicy::AuthnOnly;

/// Caller identity published for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    principal_name: String,
}

impl Identity {
    pub fn new(principal_name: impl Into<String>) -> Self {
        Self {
            principal_name: principal_name.into(),
        }
    }

    pub fn principal_name(&self) -> &str {
        &self.principal_name
    }

    pub fn authentication_scheme(&self) -> &'static str {
        AUTHENTICATION_SCHEME
    }

    pub fn is_user_in_role(&self, _role: &str) -> bool {
        match ROLE_POLICY {
            RolePolicy::AuthnOnly => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_principal_and_constant_scheme() {
        let identity = Identity::new("u1");
        assert_eq!(identity.principal_name(), "u1");
        assert_eq!(identity.authentication_scheme(), "OAuth2");
    }

    #[test]
    fn authn_only_policy_admits_every_role() {
        let identity = Identity::new("u1");
        assert!(identity.is_user_in_role("admin"));
        assert!(identity.is_user_in_role("catalog:write"));
    }
}
