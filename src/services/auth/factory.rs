/// Factory: build the bearer `Gateway` from application `Config`.
use std::sync::Arc;

use crate::config::{AuthConfig, ConfigError};
use crate::services::auth::Gateway;
use crate::services::auth::policy::{AuthPolicy, PolicyError};

pub fn build_gateway(config: &AuthConfig) -> Result<Arc<Gateway>, ConfigError> {
    let policy = AuthPolicy::new(
        config.shared_secret.as_bytes(),
        config.required_scopes.iter().cloned(),
        config.header_scheme.clone(),
    )
    .and_then(|p| p.with_realm(config.realm.clone()))
    .map_err(|e| {
        tracing::error!(error = %e, "invalid auth policy");
        match e {
            PolicyError::EmptySecret => ConfigError::Missing("AUTH_SHARED_SECRET"),
            PolicyError::NoRequiredScopes | PolicyError::InvalidScope(_) => {
                ConfigError::Invalid("AUTH_REQUIRED_SCOPES")
            }
            PolicyError::InvalidScheme(_) => ConfigError::Invalid("AUTH_HEADER_SCHEME"),
            PolicyError::InvalidRealm(_) => ConfigError::Invalid("AUTH_REALM"),
        }
    })?
    .with_leeway_seconds(config.leeway_seconds);

    Ok(Arc::new(Gateway::new(policy)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            shared_secret: "catalog-secret-2023".to_string(),
            required_scopes: vec!["catalog:read".to_string()],
            header_scheme: "Bearer".to_string(),
            realm: "oauth2".to_string(),
            leeway_seconds: 5,
        }
    }

    #[test]
    fn builds_gateway_from_config() {
        let gateway = build_gateway(&auth_config()).unwrap();
        assert_eq!(gateway.policy().leeway_seconds(), 5);
        assert_eq!(gateway.challenge().header_value(), r#"Bearer realm="oauth2""#);
    }

    #[test]
    fn policy_errors_name_the_offending_variable() {
        let mut config = auth_config();
        config.header_scheme = "Bear er".to_string();
        assert_eq!(
            build_gateway(&config).unwrap_err(),
            ConfigError::Invalid("AUTH_HEADER_SCHEME")
        );

        let mut config = auth_config();
        config.required_scopes = vec!["catalog read".to_string()];
        assert_eq!(
            build_gateway(&config).unwrap_err(),
            ConfigError::Invalid("AUTH_REQUIRED_SCOPES")
        );

        let mut config = auth_config();
        config.realm = "a\"b".to_string();
        assert_eq!(
            build_gateway(&config).unwrap_err(),
            ConfigError::Invalid("AUTH_REALM")
        );
    }
}
