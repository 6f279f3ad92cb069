//! Configuration for the client, the navigation guard and notifications

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session storage keys
pub struct StorageKeys;

impl StorageKeys {
    /// Authentication token
    pub const TOKEN: &'static str = "token";

    /// Privilege id used to query the permission tree
    pub const PRIV_ID: &'static str = "privId";

    /// Display name of the signed-in user
    pub const NAME: &'static str = "name";
}

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub http: HttpConfig,
    pub auth: AuthConfig,
    pub routing: RoutingConfig,
    pub notify: NotifyConfig,
    pub permissions: PermissionsConfig,
    pub log: LogConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Prefix for every request path
    pub base_url: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

/// How the token is written into the authorization header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// The token as-is
    #[default]
    Raw,
    /// `token <value>`
    TokenPrefix,
    /// `Bearer <value>`
    Bearer,
}

impl AuthScheme {
    /// Header value for `token`
    pub fn header_value(self, token: &str) -> String {
        match self {
            Self::Raw => token.to_string(),
            Self::TokenPrefix => format!("token {token}"),
            Self::Bearer => format!("Bearer {token}"),
        }
    }
}

/// Request authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub scheme: AuthScheme,

    /// Header the token is written to
    pub header: String,
}

/// Navigation guard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub root_path: String,
    pub login_path: String,

    /// Where an authenticated visit to the root path lands
    pub landing_path: String,

    /// Paths reachable without a token
    pub whitelist: Vec<String>,

    /// Query parameter carrying the path to return to after login
    pub redirect_param: String,
}

/// Notification texts and timings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Grace period between the session-expired notice and the login redirect
    pub forbidden_redirect_delay_ms: u64,
    pub forbidden_duration_ms: u64,
    pub default_duration_ms: u64,
    pub session_expired: String,
    pub not_found: String,
}

/// Permission tree endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsConfig {
    pub endpoint: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is not set (e.g., "info", "warden_http=debug")
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: 10_000,
        }
    }
}

impl HttpConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            scheme: AuthScheme::default(),
            header: "Authorization".to_string(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            root_path: "/".to_string(),
            login_path: "/login".to_string(),
            landing_path: "/index".to_string(),
            whitelist: vec!["/login".to_string()],
            redirect_param: "redirect".to_string(),
        }
    }
}

impl RoutingConfig {
    pub fn is_whitelisted(&self, path: &str) -> bool {
        self.whitelist.iter().any(|allowed| allowed == path)
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            forbidden_redirect_delay_ms: 1000,
            forbidden_duration_ms: 1000,
            default_duration_ms: 1500,
            session_expired: "Session expired, please log in again".to_string(),
            not_found: "The requested resource does not exist".to_string(),
        }
    }
}

impl NotifyConfig {
    pub const fn forbidden_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.forbidden_redirect_delay_ms)
    }
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            endpoint: "/privilege/queryPrivilege".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `WARDEN_HTTP__BASE_URL=...`, `WARDEN_ROUTING__WHITELIST=/login,/register`
fn environment() -> config::Environment {
    config::Environment::with_prefix("WARDEN")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("routing.whitelist")
        .try_parsing(true)
}

impl WardenConfig {
    /// Load configuration from a file, with `WARDEN_` environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// result fails [`WardenConfig::validate`]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment());
        Self::load(builder)
    }

    /// Load configuration from defaults and `WARDEN_` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed, or if the
    /// result fails [`WardenConfig::validate`]
    pub fn from_env() -> CoreResult<Self> {
        Self::load(config::Config::builder().add_source(environment()))
    }

    fn load(builder: config::ConfigBuilder<config::builder::DefaultState>) -> CoreResult<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that have no usable default
    ///
    /// Outside the browser there is no page origin to resolve relative
    /// request paths against, so `http.base_url` must be set.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] naming the offending key
    pub fn validate(&self) -> CoreResult<()> {
        if cfg!(not(target_arch = "wasm32")) && self.http.base_url.trim().is_empty() {
            return Err(CoreError::InvalidConfig {
                message: "http.base_url is required outside the browser".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = WardenConfig::default();
        assert_eq!(config.http.timeout(), Duration::from_secs(10));
        assert_eq!(config.auth.header, "Authorization");
        assert!(config.routing.is_whitelisted("/login"));
        assert!(!config.routing.is_whitelisted("/dashboard"));
        assert_eq!(config.notify.forbidden_redirect_delay(), Duration::from_secs(1));
        assert_eq!(config.permissions.endpoint, "/privilege/queryPrivilege");
    }

    #[test]
    fn test_auth_scheme_header_value() {
        assert_eq!(AuthScheme::Raw.header_value("abc"), "abc");
        assert_eq!(AuthScheme::TokenPrefix.header_value("abc"), "token abc");
        assert_eq!(AuthScheme::Bearer.header_value("abc"), "Bearer abc");
    }

    #[test]
    fn test_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[http]
base_url = "https://api.example.com"

[auth]
scheme = "token_prefix"

[routing]
landing_path = "/home"
whitelist = ["/login", "/register"]
"#
        )
        .unwrap();

        let config = WardenConfig::from_file(file.path()).unwrap();
        assert_eq!(config.auth.scheme, AuthScheme::TokenPrefix);
        assert_eq!(config.auth.header, "Authorization");
        assert_eq!(config.routing.landing_path, "/home");
        assert!(config.routing.is_whitelisted("/register"));
        assert_eq!(config.routing.login_path, "/login");
    }

    #[test]
    fn test_from_file_without_base_url_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[routing]\nlanding_path = \"/home\"").unwrap();

        let err = WardenConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(&err, CoreError::InvalidConfig { message } if message.contains("http.base_url")));
    }

    #[test]
    fn test_environment_overrides() {
        let vars: config::Map<String, String> = [
            ("WARDEN_HTTP__BASE_URL", "https://api.example.com"),
            ("WARDEN_HTTP__TIMEOUT_MS", "2500"),
            ("WARDEN_AUTH__SCHEME", "bearer"),
            ("WARDEN_ROUTING__WHITELIST", "/login,/register"),
            ("OTHER_HTTP__BASE_URL", "https://ignored.example.com"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        let builder = config::Config::builder().add_source(environment().source(Some(vars)));
        let config = WardenConfig::load(builder).unwrap();

        assert_eq!(config.http.base_url, "https://api.example.com");
        assert_eq!(config.http.timeout(), Duration::from_millis(2500));
        assert_eq!(config.auth.scheme, AuthScheme::Bearer);
        assert_eq!(config.routing.whitelist, vec!["/login", "/register"]);
        assert_eq!(config.routing.landing_path, "/index");
    }

    #[test]
    fn test_validate_requires_base_url() {
        assert!(WardenConfig::default().validate().is_err());

        let mut config = WardenConfig::default();
        config.http.base_url = "http://localhost:8080".into();
        assert!(config.validate().is_ok());
    }
}
