//! Runtime configuration.
//!
//! Values come from environment variables, with `--bind <addr:port>` on the
//! command line taking precedence over `UI_BIND`.
//!
//! | variable | default |
//! |---|---|
//! | `CATALOG_URL` | `https://openlibrary.org/search.json` |
//! | `COVERS_URL` | `https://covers.openlibrary.org/b` |
//! | `OPENLIBRARY_URL` | `https://openlibrary.org` |
//! | `UI_BIND` | `127.0.0.1:8080` |
//! | `SEARCH_LIMIT` | `20` |
//! | `CACHE_TTL_SECS` | `300` |
//! | `REQUEST_TIMEOUT_SECS` | unset (transport default) |
//! | `SESSION_IDLE_SECS` | `1800` |

use crate::catalog::client::DEFAULT_SEARCH_URL;
use crate::catalog::query::DEFAULT_LIMIT;
use crate::catalog::transform::DEFAULT_COVERS_URL;
use crate::search::cache::DEFAULT_TTL;
use crate::search::cards::DEFAULT_SITE_URL;
use crate::search::registry::DEFAULT_SESSION_IDLE;

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {name}: {reason}")]
    Invalid {
        name: String,
        value: String,
        reason: String,
    },
    #[error("missing value for {0}")]
    MissingValue(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub catalog_url: String,
    pub covers_url: String,
    pub site_url: String,
    pub bind_addr: SocketAddr,
    pub search_limit: usize,
    pub cache_ttl: Duration,
    pub request_timeout: Option<Duration>,
    pub session_idle: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let search_limit = parse_var(&lookup, "SEARCH_LIMIT")?.unwrap_or(DEFAULT_LIMIT);
        if search_limit == 0 {
            return Err(ConfigError::Invalid {
                name: "SEARCH_LIMIT".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            catalog_url: text("CATALOG_URL", DEFAULT_SEARCH_URL),
            covers_url: text("COVERS_URL", DEFAULT_COVERS_URL),
            site_url: text("OPENLIBRARY_URL", DEFAULT_SITE_URL),
            bind_addr: parse_var(&lookup, "UI_BIND")?.unwrap_or(default_bind()),
            search_limit,
            cache_ttl: parse_var::<u64, _>(&lookup, "CACHE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TTL),
            request_timeout: parse_var::<u64, _>(&lookup, "REQUEST_TIMEOUT_SECS")?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            session_idle: parse_var::<u64, _>(&lookup, "SESSION_IDLE_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_SESSION_IDLE),
        })
    }

    /// Applies command line overrides (`--bind <addr:port>`).
    pub fn apply_args<I>(mut self, args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--bind" {
                let value = args
                    .next()
                    .ok_or_else(|| ConfigError::MissingValue("--bind".to_string()))?;
                self.bind_addr = parse_value("--bind", &value)?;
            }
        }
        Ok(self)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_SEARCH_URL.to_string(),
            covers_url: DEFAULT_COVERS_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            bind_addr: default_bind(),
            search_limit: DEFAULT_LIMIT,
            cache_ttl: DEFAULT_TTL,
            request_timeout: None,
            session_idle: DEFAULT_SESSION_IDLE,
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => parse_value(name, value.trim()).map(Some),
        _ => Ok(None),
    }
}

fn parse_value<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::Invalid {
        name: name.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.search_limit, 20);
        assert!(config.request_timeout.is_none());
        assert_eq!(config.session_idle, Duration::from_secs(1800));
    }

    #[test]
    fn test_values_are_read_and_trimmed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("CATALOG_URL", " http://localhost:9000/search.json "),
            ("COVERS_URL", "http://covers.local/b/"),
            ("SEARCH_LIMIT", "40"),
            ("CACHE_TTL_SECS", "10"),
            ("REQUEST_TIMEOUT_SECS", "3"),
            ("UI_BIND", "0.0.0.0:3000"),
            ("SESSION_IDLE_SECS", "60"),
        ]))
        .unwrap();

        assert_eq!(config.catalog_url, "http://localhost:9000/search.json");
        assert_eq!(config.covers_url, "http://covers.local/b");
        assert_eq!(config.search_limit, 40);
        assert_eq!(config.cache_ttl, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.session_idle, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = AppConfig::from_lookup(lookup_from(&[("SEARCH_LIMIT", "lots")])).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { ref name, .. } if name == "SEARCH_LIMIT"));
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[("SEARCH_LIMIT", "0")])).is_err());
    }

    #[test]
    fn test_bind_flag_overrides_environment() {
        let config = AppConfig::from_lookup(lookup_from(&[("UI_BIND", "127.0.0.1:3000")]))
            .unwrap()
            .apply_args(vec!["--bind".to_string(), "127.0.0.1:4000".to_string()])
            .unwrap();

        assert_eq!(config.bind_addr.port(), 4000);
    }

    #[test]
    fn test_bind_flag_without_value() {
        let err = AppConfig::default()
            .apply_args(vec!["--bind".to_string()])
            .unwrap_err();

        assert_eq!(err, ConfigError::MissingValue("--bind".to_string()));
    }
}
