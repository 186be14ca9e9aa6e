// src/config.rs

use std::{env, fmt, net::SocketAddr, time::Duration};

use dotenvy::dotenv;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the communities REST API (quizzes, grading, leaderboards).
    pub upstream_url: Url,
    pub bind_addr: SocketAddr,
    pub rust_log: String,
    pub log_dir: String,
    /// Period of the session countdown. One second outside of tests.
    pub tick_millis: u64,
    /// Sessions older than this are torn down by the sweeper.
    pub session_ttl_secs: u64,
    /// Origins allowed to call the gateway with credentials.
    pub allowed_origins: Vec<String>,
}

/// Raised when the environment holds a missing or unparsable setting.
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upstream_url = lookup("UPSTREAM_URL").ok_or(ConfigError::Missing("UPSTREAM_URL"))?;
        let upstream_url = Url::parse(&upstream_url).map_err(|_| ConfigError::Invalid {
            key: "UPSTREAM_URL",
            value: upstream_url.clone(),
        })?;
        if upstream_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                key: "UPSTREAM_URL",
                value: upstream_url.to_string(),
            });
        }

        let bind_addr = parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?;
        let tick_millis = parse_or(&lookup, "TICK_MILLIS", 1000u64)?;
        if tick_millis == 0 {
            return Err(ConfigError::Invalid {
                key: "TICK_MILLIS",
                value: "0".to_string(),
            });
        }
        let session_ttl_secs = parse_or(&lookup, "SESSION_TTL_SECS", 3600u64)?;

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let log_dir = lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string());

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(Self {
            upstream_url,
            bind_addr,
            rust_log,
            log_dir,
            tick_millis,
            session_ttl_secs,
            allowed_origins,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
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
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_upstream_is_set() {
        let config = Config::from_lookup(lookup_from(&[("UPSTREAM_URL", "http://api.local/v1")])).unwrap();

        assert_eq!(config.upstream_url.as_str(), "http://api.local/v1");
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.session_ttl(), Duration::from_secs(3600));
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.allowed_origins, vec!["http://localhost:5173".to_string()]);
    }

    #[test]
    fn missing_upstream_is_reported() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("UPSTREAM_URL")));
    }

    #[test]
    fn invalid_numbers_are_reported() {
        let err = Config::from_lookup(lookup_from(&[
            ("UPSTREAM_URL", "http://api.local"),
            ("TICK_MILLIS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TICK_MILLIS", .. }));

        let err = Config::from_lookup(lookup_from(&[
            ("UPSTREAM_URL", "http://api.local"),
            ("TICK_MILLIS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TICK_MILLIS", .. }));
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let config = Config::from_lookup(lookup_from(&[
            ("UPSTREAM_URL", "https://api.local"),
            ("ALLOWED_ORIGINS", "http://a.test, http://b.test,,"),
        ]))
        .unwrap();

        assert_eq!(
            config.allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
