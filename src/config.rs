//! Runtime configuration from environment variables (load `.env` with dotenvy first).

use crate::error::ConfigError;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://bank.db";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// SQLite URL, e.g. `sqlite://bank.db` or `sqlite::memory:`.
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub max_connections: u32,
    pub busy_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            database_url: DEFAULT_DATABASE_URL.into(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
            body_limit_bytes: 64 * 1024,
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Build from an explicit variable map. Unset keys fall back to defaults.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = LedgerConfig::default();
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL")
            .map(String::from)
            .unwrap_or(defaults.database_url);
        if !database_url.starts_with("sqlite:") {
            return Err(ConfigError::Invalid {
                key: "DATABASE_URL",
                message: format!("expected a sqlite: URL, got '{}'", database_url),
            });
        }
        let listen_addr = match get("LEDGER_LISTEN_ADDR") {
            Some(v) => v.parse().map_err(|e| ConfigError::Invalid {
                key: "LEDGER_LISTEN_ADDR",
                message: format!("{}", e),
            })?,
            None => defaults.listen_addr,
        };
        let max_connections = parse_number(get("LEDGER_MAX_CONNECTIONS"), "LEDGER_MAX_CONNECTIONS")?
            .unwrap_or(defaults.max_connections);
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "LEDGER_MAX_CONNECTIONS",
                message: "must be at least 1".into(),
            });
        }
        let busy_timeout = parse_number::<u64>(get("LEDGER_BUSY_TIMEOUT_MS"), "LEDGER_BUSY_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.busy_timeout);
        let body_limit_bytes = parse_number(get("LEDGER_BODY_LIMIT_BYTES"), "LEDGER_BODY_LIMIT_BYTES")?
            .unwrap_or(defaults.body_limit_bytes);

        Ok(LedgerConfig {
            database_url,
            listen_addr,
            max_connections,
            busy_timeout,
            body_limit_bytes,
        })
    }
}

fn parse_number<T>(raw: Option<&str>, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|v| {
        v.parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            message: format!("'{}': {}", v, e),
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = LedgerConfig::from_vars(HashMap::new()).unwrap();
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(cfg.max_connections, 5);
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = LedgerConfig::from_vars(vars(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("LEDGER_LISTEN_ADDR", "0.0.0.0:8080"),
            ("LEDGER_MAX_CONNECTIONS", "2"),
            ("LEDGER_BUSY_TIMEOUT_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.listen_addr.port(), 8080);
        assert_eq!(cfg.max_connections, 2);
        assert_eq!(cfg.busy_timeout, Duration::from_millis(250));
    }

    #[test]
    fn rejects_non_sqlite_url_and_bad_numbers() {
        let err = LedgerConfig::from_vars(vars(&[("DATABASE_URL", "postgres://localhost/bank")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let err = LedgerConfig::from_vars(vars(&[("LEDGER_MAX_CONNECTIONS", "many")])).unwrap_err();
        assert!(err.to_string().contains("LEDGER_MAX_CONNECTIONS"));

        assert!(LedgerConfig::from_vars(vars(&[("LEDGER_MAX_CONNECTIONS", "0")])).is_err());
    }
}
