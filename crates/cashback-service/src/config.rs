//! Service configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                      | Default         |
//! |-------------------------------|-----------------|
//! | `CASHBACK_DATABASE_PATH`      | `./cashback.db` |
//! | `CASHBACK_DB_MAX_CONNECTIONS` | `5`             |
//! | `CASHBACK_AUTO_APPROVE_CPF`   | `15350946056`   |
//! | `CASHBACK_DEFAULT_YEAR`       | `2021`          |
//! | `CASHBACK_DEFAULT_MONTH`      | `8`             |
//!
//! Setting `CASHBACK_AUTO_APPROVE_CPF` to an empty string disables
//! auto-approval.

use std::env;
use std::path::PathBuf;

use cashback_core::{
    CashbackPolicy, Period, DEFAULT_AUTO_APPROVED_CPF, DEFAULT_LISTING_MONTH,
    DEFAULT_LISTING_YEAR,
};
use cashback_db::DbConfig;

pub const ENV_DATABASE_PATH: &str = "CASHBACK_DATABASE_PATH";
pub const ENV_DB_MAX_CONNECTIONS: &str = "CASHBACK_DB_MAX_CONNECTIONS";
pub const ENV_AUTO_APPROVE_CPF: &str = "CASHBACK_AUTO_APPROVE_CPF";
pub const ENV_DEFAULT_YEAR: &str = "CASHBACK_DEFAULT_YEAR";
pub const ENV_DEFAULT_MONTH: &str = "CASHBACK_DEFAULT_MONTH";

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Connection pool size
    pub max_connections: u32,

    /// CPF digits whose purchases are approved on admission
    pub auto_approve_cpf: Option<String>,

    /// Period listed when a request names none
    pub default_period: Period,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup(ENV_DATABASE_PATH)
            .unwrap_or_else(|| "./cashback.db".to_string())
            .into();

        let max_connections: u32 = lookup(ENV_DB_MAX_CONNECTIONS)
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue(ENV_DB_MAX_CONNECTIONS.to_string()))?;

        if max_connections == 0 {
            return Err(ConfigError::InvalidValue(ENV_DB_MAX_CONNECTIONS.to_string()));
        }

        // Empty value disables auto-approval; anything else must be a real CPF
        let auto_approve_cpf = match lookup(ENV_AUTO_APPROVE_CPF) {
            None => Some(DEFAULT_AUTO_APPROVED_CPF.to_string()),
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => {
                let cpf = cashback_core::Cpf::parse(&raw)
                    .map_err(|_| ConfigError::InvalidValue(ENV_AUTO_APPROVE_CPF.to_string()))?;
                Some(cpf.into_digits())
            }
        };

        let year: i32 = lookup(ENV_DEFAULT_YEAR)
            .unwrap_or_else(|| DEFAULT_LISTING_YEAR.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue(ENV_DEFAULT_YEAR.to_string()))?;

        let month: u32 = lookup(ENV_DEFAULT_MONTH)
            .unwrap_or_else(|| DEFAULT_LISTING_MONTH.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue(ENV_DEFAULT_MONTH.to_string()))?;

        let default_period = Period::new(year, month)
            .map_err(|_| ConfigError::InvalidValue(ENV_DEFAULT_MONTH.to_string()))?;

        Ok(ServiceConfig {
            database_path,
            max_connections,
            auto_approve_cpf,
            default_period,
        })
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }

    /// Business-rule knobs handed to the service.
    pub fn policy(&self) -> CashbackPolicy {
        CashbackPolicy::default()
            .with_auto_approved_cpf(self.auto_approve_cpf.as_deref())
            .with_default_period(self.default_period)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            database_path: PathBuf::from("./cashback.db"),
            max_connections: 5,
            auto_approve_cpf: Some(DEFAULT_AUTO_APPROVED_CPF.to_string()),
            default_period: Period::default_listing(),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_path, PathBuf::from("./cashback.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.auto_approve_cpf.as_deref(), Some("15350946056"));
        assert_eq!(config.default_period, Period::new(2021, 8).unwrap());

        let policy = config.policy();
        assert_eq!(policy, CashbackPolicy::default());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            (ENV_DATABASE_PATH, "/var/lib/cashback.db"),
            (ENV_DB_MAX_CONNECTIONS, "12"),
            (ENV_AUTO_APPROVE_CPF, "945.086.080-78"),
            (ENV_DEFAULT_YEAR, "2022"),
            (ENV_DEFAULT_MONTH, "1"),
        ])
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/cashback.db"));
        assert_eq!(config.db_config().max_connections, 12);
        assert_eq!(config.auto_approve_cpf.as_deref(), Some("94508608078"));
        assert_eq!(config.policy().default_period.to_string(), "2022-01");
    }

    #[test]
    fn test_empty_cpf_disables_auto_approval() {
        let config = load(&[(ENV_AUTO_APPROVE_CPF, "")]).unwrap();
        assert_eq!(config.auto_approve_cpf, None);
        assert_eq!(config.policy().auto_approved_cpf, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[(ENV_DB_MAX_CONNECTIONS, "many")]).is_err());
        assert!(load(&[(ENV_DB_MAX_CONNECTIONS, "0")]).is_err());
        assert!(load(&[(ENV_AUTO_APPROVE_CPF, "123")]).is_err());
        assert!(load(&[(ENV_DEFAULT_MONTH, "13")]).is_err());
        assert!(load(&[(ENV_DEFAULT_YEAR, "soon")]).is_err());
    }
}
