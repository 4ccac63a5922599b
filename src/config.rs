use std::env;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database: DatabaseConfig,
    pub session_secret: String,
    pub session_ttl: usize,

    // Rate limiting, 0 disables
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    /// Accept credentials stored as plaintext (pre-hashing rows).
    pub allow_plaintext_passwords: bool,
    pub log_dir: String,
}

impl Config {
    /// Loads `.env` (or the file named by `PMS_CONFIG_FILE`) and reads the
    /// process environment. Connection settings have no defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var("PMS_CONFIG_FILE") {
            Ok(path) => {
                dotenvy::from_path(&path)?;
            }
            Err(_) => {
                dotenvy::dotenv().ok();
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let database = DatabaseConfig {
            host: required("PMS_DB_HOST")?,
            user: required("PMS_DB_USER")?,
            password: required("PMS_DB_PASSWORD")?,
            database: required("PMS_DB_NAME")?,
            port: parsed(&lookup, "PMS_DB_PORT", 3306)?,
            max_connections: parsed(&lookup, "PMS_DB_MAX_CONNECTIONS", 5)?,
            acquire_timeout_secs: parsed(&lookup, "PMS_DB_ACQUIRE_TIMEOUT_SECS", 5)?,
        };

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database,
            session_secret: required("SESSION_SECRET")?,
            session_ttl: parsed(&lookup, "SESSION_TTL", 28_800)?, // 8 hours
            rate_login_per_min: parsed(&lookup, "RATE_LOGIN_PER_MIN", 60)?,
            rate_protected_per_min: parsed(&lookup, "RATE_PROTECTED_PER_MIN", 1000)?,
            allow_plaintext_passwords: parsed(&lookup, "PMS_ALLOW_PLAINTEXT_PASSWORDS", false)?,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("PMS_DB_HOST", "localhost"),
            ("PMS_DB_USER", "pms"),
            ("PMS_DB_PASSWORD", "secret"),
            ("PMS_DB_NAME", "pms_system"),
            ("SERVER_ADDR", "127.0.0.1:8080"),
            ("SESSION_SECRET", "test-secret"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn applies_defaults_for_optional_keys() {
        let config = load(&base()).unwrap();
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.session_ttl, 28_800);
        assert!(!config.allow_plaintext_passwords);
        assert_eq!(config.log_dir, "logs");
    }

    #[test]
    fn fails_closed_without_database_credentials() {
        for key in ["PMS_DB_HOST", "PMS_DB_USER", "PMS_DB_PASSWORD", "PMS_DB_NAME"] {
            let mut vars = base();
            vars.remove(key);
            match load(&vars) {
                Err(ConfigError::Missing(missing)) => assert_eq!(missing, key),
                _ => panic!("{key} should be required"),
            }
        }
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut vars = base();
        vars.insert("PMS_DB_PASSWORD", "  ");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Missing("PMS_DB_PASSWORD"))
        ));
    }

    #[test]
    fn rejects_unparsable_numbers() {
        let mut vars = base();
        vars.insert("PMS_DB_PORT", "mysql");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { key: "PMS_DB_PORT", .. })
        ));
    }
}
