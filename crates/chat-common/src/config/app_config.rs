//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use chat_core::UnknownUserPolicy;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub static_files: StaticConfig,
    pub fixtures: FixtureConfig,
    pub presence: PresenceConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => Err(format!("unknown environment `{other}`")),
        }
    }
}

/// HTTP/WebSocket listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Static file serving
#[derive(Debug, Clone, Deserialize)]
pub struct StaticConfig {
    #[serde(default = "default_static_dir")]
    pub dir: String,
}

/// User directory seed file
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureConfig {
    #[serde(default = "default_users_fixture")]
    pub users_path: String,
    /// Set when the path was given explicitly; a missing file is then a startup error
    #[serde(default)]
    pub required: bool,
}

/// Presence engine and connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceConfig {
    #[serde(default)]
    pub unknown_user_policy: UnknownUserPolicy,
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_ms: u64,
    #[serde(default = "default_heartbeat_timeout")]
    pub heartbeat_timeout_ms: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            unknown_user_policy: UnknownUserPolicy::default(),
            outbound_buffer: default_outbound_buffer(),
            heartbeat_interval_ms: default_heartbeat_interval(),
            heartbeat_timeout_ms: default_heartbeat_timeout(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "presence-chat".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "public".to_string()
}

fn default_users_fixture() -> String {
    "fixtures/users.json".to_string()
}

fn default_outbound_buffer() -> usize {
    64
}

fn default_heartbeat_interval() -> u64 {
    30_000
}

fn default_heartbeat_timeout() -> u64 {
    90_000
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let users_fixture = lookup("USERS_FIXTURE");

        let config = Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default(),
            },
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(default_host),
                port: parse_or(&lookup, "SERVER_PORT", default_port)?,
            },
            static_files: StaticConfig {
                dir: lookup("STATIC_DIR").unwrap_or_else(default_static_dir),
            },
            fixtures: FixtureConfig {
                required: users_fixture.is_some(),
                users_path: users_fixture.unwrap_or_else(default_users_fixture),
            },
            presence: PresenceConfig {
                unknown_user_policy: parse_or(&lookup, "UNKNOWN_USER_POLICY", UnknownUserPolicy::default)?,
                outbound_buffer: parse_or(&lookup, "OUTBOUND_BUFFER", default_outbound_buffer)?,
                heartbeat_interval_ms: parse_or(&lookup, "HEARTBEAT_INTERVAL_MS", default_heartbeat_interval)?,
                heartbeat_timeout_ms: parse_or(&lookup, "HEARTBEAT_TIMEOUT_MS", default_heartbeat_timeout)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.presence.outbound_buffer == 0 {
            return Err(ConfigError::InvalidValue(
                "OUTBOUND_BUFFER",
                "must be greater than zero".to_string(),
            ));
        }
        if self.presence.heartbeat_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "HEARTBEAT_INTERVAL_MS",
                "must be greater than zero".to_string(),
            ));
        }
        if self.presence.heartbeat_timeout_ms <= self.presence.heartbeat_interval_ms {
            return Err(ConfigError::InvalidValue(
                "HEARTBEAT_TIMEOUT_MS",
                "must be greater than HEARTBEAT_INTERVAL_MS".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_or<F, T, D>(lookup: &F, key: &'static str, default: D) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
    D: FnOnce() -> T,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key, e.to_string())),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.app.name, "presence-chat");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.static_files.dir, "public");
        assert_eq!(config.fixtures.users_path, "fixtures/users.json");
        assert!(!config.fixtures.required);
        assert_eq!(config.presence.unknown_user_policy, UnknownUserPolicy::Reject);
        assert_eq!(config.presence.outbound_buffer, 64);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("APP_ENV", "production"),
            ("SERVER_PORT", "9000"),
            ("USERS_FIXTURE", "/tmp/users.json"),
            ("UNKNOWN_USER_POLICY", "auto_register"),
        ])
        .unwrap();

        assert!(config.app.env.is_production());
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.fixtures.users_path, "/tmp/users.json");
        assert!(config.fixtures.required);
        assert_eq!(config.presence.unknown_user_policy, UnknownUserPolicy::AutoRegister);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("SERVER_PORT", "eighty")]),
            Err(ConfigError::InvalidValue("SERVER_PORT", _))
        ));
        assert!(matches!(
            config_from(&[("UNKNOWN_USER_POLICY", "shrug")]),
            Err(ConfigError::InvalidValue("UNKNOWN_USER_POLICY", _))
        ));
        assert!(matches!(
            config_from(&[("OUTBOUND_BUFFER", "0")]),
            Err(ConfigError::InvalidValue("OUTBOUND_BUFFER", _))
        ));
        assert!(matches!(
            config_from(&[("HEARTBEAT_INTERVAL_MS", "5000"), ("HEARTBEAT_TIMEOUT_MS", "1000")]),
            Err(ConfigError::InvalidValue("HEARTBEAT_TIMEOUT_MS", _))
        ));
        assert!(matches!(
            config_from(&[("HEARTBEAT_INTERVAL_MS", "0")]),
            Err(ConfigError::InvalidValue("HEARTBEAT_INTERVAL_MS", _))
        ));
    }
}
