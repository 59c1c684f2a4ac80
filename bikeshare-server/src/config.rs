//! Startup configuration from environment variables.
//!
//! Every setting has a default except the JCDecaux API key, which is only
//! needed when no mock feed file is given. Values are read once at startup
//! and never change afterwards.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cache::StationCacheConfig;
use crate::classify::Thresholds;
use crate::feed::FeedClientConfig;

/// Errors from reading the configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// Neither an API key nor a mock feed file was provided
    #[error("JCDECAUX_API_KEY is not set and no FEED_MOCK_FILE was given")]
    MissingApiKey,
}

/// Where station data comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedSource {
    /// Live JCDecaux API.
    Live {
        api_key: String,
        contract: String,
        base_url: Option<String>,
    },
    /// Saved feed response on disk.
    MockFile(PathBuf),
}

/// Full server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed: FeedSource,
    pub feed_timeout_secs: u64,
    pub freshness_secs: i64,
    pub thresholds: Thresholds,
    pub cycling_graph: PathBuf,
    pub motor_graph: PathBuf,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through a variable lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let feed = match var("FEED_MOCK_FILE") {
            Some(path) => FeedSource::MockFile(path.into()),
            None => FeedSource::Live {
                api_key: var("JCDECAUX_API_KEY").ok_or(ConfigError::MissingApiKey)?,
                contract: var("JCDECAUX_CONTRACT").unwrap_or_else(|| "nancy".to_string()),
                base_url: var("FEED_BASE_URL"),
            },
        };

        let thresholds = Thresholds {
            overload: parse_ratio(&lookup, "OVERLOAD_THRESHOLD", 0.25)?,
            underfed: parse_ratio(&lookup, "UNDERFED_THRESHOLD", 0.25)?,
        };

        let freshness_secs: i64 = parse_or(&lookup, "FRESHNESS_SECS", 60)?;
        if freshness_secs < 0 {
            return Err(invalid(
                "FRESHNESS_SECS",
                freshness_secs.to_string(),
                "must not be negative",
            ));
        }
        if chrono::Duration::try_seconds(freshness_secs).is_none() {
            return Err(invalid(
                "FRESHNESS_SECS",
                freshness_secs.to_string(),
                "too large",
            ));
        }

        let feed_timeout_secs: u64 = parse_or(&lookup, "FEED_TIMEOUT_SECS", 10)?;
        if feed_timeout_secs == 0 {
            return Err(invalid(
                "FEED_TIMEOUT_SECS",
                feed_timeout_secs.to_string(),
                "must be at least 1",
            ));
        }

        Ok(Self {
            feed,
            feed_timeout_secs,
            freshness_secs,
            thresholds,
            cycling_graph: var("CYCLING_GRAPH")
                .unwrap_or_else(|| "graph_cyclable.json".to_string())
                .into(),
            motor_graph: var("MOTOR_GRAPH")
                .unwrap_or_else(|| "graph_drive.json".to_string())
                .into(),
            bind_addr: parse_or(
                &lookup,
                "BIND_ADDR",
                SocketAddr::from(([127, 0, 0, 1], 5000)),
            )?,
        })
    }

    /// Station cache settings.
    pub fn cache_config(&self) -> StationCacheConfig {
        StationCacheConfig::new(self.freshness_secs, self.feed_timeout_secs)
    }

    /// Live feed client settings, if the live feed is configured.
    pub fn feed_client_config(&self) -> Option<FeedClientConfig> {
        match &self.feed {
            FeedSource::Live {
                api_key,
                contract,
                base_url,
            } => Some(self.live_client_config(api_key, contract, base_url.as_deref())),
            FeedSource::MockFile(_) => None,
        }
    }

    /// Client settings for the live feed with the configured timeout.
    pub fn live_client_config(
        &self,
        api_key: &str,
        contract: &str,
        base_url: Option<&str>,
    ) -> FeedClientConfig {
        let config = FeedClientConfig::new(api_key)
            .with_contract(contract)
            .with_timeout(self.feed_timeout_secs);
        match base_url {
            Some(url) => config.with_base_url(url),
            None => config,
        }
    }
}

fn invalid(key: &'static str, value: String, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value,
        reason: reason.into(),
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, value.clone(), e.to_string())),
        None => Ok(default),
    }
}

fn parse_ratio(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: f64,
) -> Result<f64, ConfigError> {
    let ratio: f64 = parse_or(lookup, key, default)?;
    if !(0.0..=1.0).contains(&ratio) {
        return Err(invalid(key, ratio.to_string(), "must be between 0 and 1"));
    }
    Ok(ratio)
}
