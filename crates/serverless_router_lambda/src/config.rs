use std::time::Duration;

use sqlx::postgres::PgSslMode;
use thiserror::Error;

pub const DEFAULT_SECRET_ID: &str = "simple-serverless/db-credentials";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Pool settings for the per-execution-context database connection.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub ssl_mode: PgSslMode,
    pub connect_timeout: Duration,
    pub max_connections: u32,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            ssl_mode: PgSslMode::Prefer,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Cold-start configuration read from the Lambda environment.
///
/// Database host, port and name come from the standard `PG*` variables,
/// which sqlx reads on its own.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub secret_id: String,
    pub connection: ConnectionSettings,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ConnectionSettings::default();
        let secret_id = lookup("DB_CREDENTIALS_SECRET_ID")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SECRET_ID.to_string());

        let connect_timeout = match lookup("DB_CONNECT_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_positive(
                "DB_CONNECT_TIMEOUT_SECS",
                &value,
            )?),
            None => defaults.connect_timeout,
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(value) => u32::try_from(parse_positive("DB_MAX_CONNECTIONS", &value)?)
                .map_err(|_| invalid("DB_MAX_CONNECTIONS", "a positive 32-bit integer", &value))?,
            None => defaults.max_connections,
        };

        let ssl_mode = match lookup("DB_SSL_MODE") {
            Some(value) => parse_ssl_mode(&value)?,
            None => defaults.ssl_mode,
        };

        Ok(Self {
            secret_id,
            connection: ConnectionSettings {
                ssl_mode,
                connect_timeout,
                max_connections,
            },
        })
    }
}

fn parse_positive(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(invalid(name, "a positive integer", value)),
    }
}

fn parse_ssl_mode(value: &str) -> Result<PgSslMode, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "disable" => Ok(PgSslMode::Disable),
        "allow" => Ok(PgSslMode::Allow),
        "prefer" => Ok(PgSslMode::Prefer),
        "require" => Ok(PgSslMode::Require),
        "verify-ca" => Ok(PgSslMode::VerifyCa),
        "verify-full" => Ok(PgSslMode::VerifyFull),
        _ => Err(invalid(
            "DB_SSL_MODE",
            "one of disable, allow, prefer, require, verify-ca, verify-full",
            value,
        )),
    }
}

fn invalid(name: &'static str, expected: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        expected,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<RuntimeConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]).expect("defaults should load");

        assert_eq!(config.secret_id, DEFAULT_SECRET_ID);
        assert_eq!(config.connection.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.connection.max_connections, 1);
        assert!(matches!(config.connection.ssl_mode, PgSslMode::Prefer));
    }

    #[test]
    fn overrides_are_read_from_environment() {
        let config = config_from(&[
            ("DB_CREDENTIALS_SECRET_ID", "school/db"),
            ("DB_CONNECT_TIMEOUT_SECS", "10"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("DB_SSL_MODE", "Require"),
        ])
        .expect("overrides should load");

        assert_eq!(config.secret_id, "school/db");
        assert_eq!(config.connection.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.connection.max_connections, 4);
        assert!(matches!(config.connection.ssl_mode, PgSslMode::Require));
    }

    #[test]
    fn blank_secret_id_falls_back_to_default() {
        let config = config_from(&[("DB_CREDENTIALS_SECRET_ID", "  ")]).expect("config");
        assert_eq!(config.secret_id, DEFAULT_SECRET_ID);
    }

    #[test]
    fn rejects_zero_timeout() {
        let error = config_from(&[("DB_CONNECT_TIMEOUT_SECS", "0")]).expect_err("zero timeout");
        assert_eq!(
            error.to_string(),
            "DB_CONNECT_TIMEOUT_SECS must be a positive integer, got '0'"
        );
    }

    #[test]
    fn rejects_unknown_ssl_mode() {
        let error = config_from(&[("DB_SSL_MODE", "sometimes")]).expect_err("bad ssl mode");
        assert!(error.to_string().starts_with("DB_SSL_MODE must be one of"));
    }
}
