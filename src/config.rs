/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CORS 許可、Auth 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::auth::policy::{DEFAULT_HEADER_SCHEME, DEFAULT_LEEWAY_SECONDS, DEFAULT_REALM};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Raw auth settings. Turned into an `AuthPolicy` by `services::auth::factory`.
#[derive(Clone)]
pub struct AuthConfig {
    pub shared_secret: String,
    pub required_scopes: Vec<String>,
    pub header_scheme: String,
    pub realm: String,
    pub leeway_seconds: u64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the shared secret
        f.debug_struct("AuthConfig")
            .field("required_scopes", &self.required_scopes)
            .field("header_scheme", &self.header_scheme)
            .field("realm", &self.realm)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSettings {
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub request_timeout_seconds: u64,
    pub body_limit_bytes: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub db_max_connections: u32,

    pub cors_allowed_origins: Vec<String>,
    pub http: HttpSettings,

    pub auth: AuthConfig,
    pub catalog: CatalogSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key → value source (env, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", 8080)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let db_max_connections: u32 = parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?;
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid("DB_MAX_CONNECTIONS"));
        }

        let cors_allowed_origins = split_list(&lookup("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let defaults = HttpSettings::default();
        let http = HttpSettings {
            request_timeout_seconds: parse_or(
                &lookup,
                "HTTP_REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            )?,
            body_limit_bytes: parse_or(
                &lookup,
                "HTTP_BODY_LIMIT_BYTES",
                defaults.body_limit_bytes,
            )?,
        };
        if http.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("HTTP_REQUEST_TIMEOUT_SECONDS"));
        }

        let auth = Self::auth_from_lookup(&lookup)?;

        let defaults = CatalogSettings::default();
        let catalog = CatalogSettings {
            default_page_size: parse_or(
                &lookup,
                "CATALOG_DEFAULT_PAGE_SIZE",
                defaults.default_page_size,
            )?,
            max_page_size: parse_or(&lookup, "CATALOG_MAX_PAGE_SIZE", defaults.max_page_size)?,
        };
        if catalog.max_page_size < 1 {
            return Err(ConfigError::Invalid("CATALOG_MAX_PAGE_SIZE"));
        }
        if catalog.default_page_size < 1 || catalog.default_page_size > catalog.max_page_size {
            return Err(ConfigError::Invalid("CATALOG_DEFAULT_PAGE_SIZE"));
        }

        Ok(Self {
            addr,
            app_env,
            database_url,
            db_max_connections,
            cors_allowed_origins,
            http,
            auth,
            catalog,
        })
    }

    fn auth_from_lookup<F>(lookup: &F) -> Result<AuthConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let shared_secret = lookup("AUTH_SHARED_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("AUTH_SHARED_SECRET"))?;

        let required_scopes = split_list(
            &lookup("AUTH_REQUIRED_SCOPES")
                .unwrap_or_else(|| "catalog:read catalog:write".to_string()),
        );
        if required_scopes.is_empty() {
            return Err(ConfigError::Invalid("AUTH_REQUIRED_SCOPES"));
        }

        let header_scheme = lookup("AUTH_HEADER_SCHEME")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_HEADER_SCHEME.to_string());
        let realm = lookup("AUTH_REALM").unwrap_or_else(|| DEFAULT_REALM.to_string());
        let leeway_seconds =
            parse_or(lookup, "ACCESS_TOKEN_LEEWAY_SECONDS", DEFAULT_LEEWAY_SECONDS)?;

        Ok(AuthConfig {
            shared_secret,
            required_scopes,
            header_scheme,
            realm,
            leeway_seconds,
        })
    }
}

// Unset → default, set but unparsable → Invalid (never silently fall back).
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(v) if v.trim().is_empty() => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

// Accepts comma and/or whitespace separated lists.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
