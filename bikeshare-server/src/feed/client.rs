//! JCDecaux station-status HTTP client.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

use super::StationFeed;
use super::error::FeedError;
use super::types::FeedEntry;

/// Default base URL for the JCDecaux self-service bikes API.
const DEFAULT_BASE_URL: &str = "https://api.jcdecaux.com/vls/v1";

/// Default contract (city).
const DEFAULT_CONTRACT: &str = "nancy";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedClientConfig {
    /// API key sent as the `apiKey` query parameter
    pub api_key: String,
    /// Contract (city) name
    pub contract: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedClientConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            contract: DEFAULT_CONTRACT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the contract (city) to query.
    pub fn with_contract(mut self, contract: impl Into<String>) -> Self {
        self.contract = contract.into();
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn stations_url(&self) -> String {
        format!("{}/stations", self.base_url.trim_end_matches('/'))
    }
}

/// Client for the JCDecaux station list.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: String,
    contract: String,
    api_key: String,
}

impl FeedClient {
    /// Create a new feed client.
    pub fn new(config: FeedClientConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.stations_url(),
            contract: config.contract,
            api_key: config.api_key,
        })
    }

    /// Fetch all stations of the configured contract.
    pub async fn fetch_all(&self) -> Result<Vec<FeedEntry>, FeedError> {
        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("contract", self.contract.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FeedError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let entries = parse_entries(&body)?;

        debug!(
            contract = %self.contract,
            entries = entries.len(),
            "fetched station feed"
        );

        Ok(entries)
    }
}

impl StationFeed for FeedClient {
    fn fetch_stations(&self) -> BoxFuture<'_, Result<Vec<FeedEntry>, FeedError>> {
        self.fetch_all().boxed()
    }
}

/// Parse a feed body into entries.
///
/// The body must be a JSON array; its elements are parsed leniently.
pub(super) fn parse_entries(body: &str) -> Result<Vec<FeedEntry>, FeedError> {
    serde_json::from_str(body).map_err(|e| FeedError::Json {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = FeedClientConfig::new("test-api-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.contract, "nancy");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn config_builders() {
        let config = FeedClientConfig::new("k")
            .with_contract("lyon")
            .with_base_url("http://localhost:8080/")
            .with_timeout(2);
        assert_eq!(config.contract, "lyon");
        assert_eq!(config.timeout_secs, 2);
        assert_eq!(config.stations_url(), "http://localhost:8080/stations");
    }

    #[test]
    fn client_builds_from_config() {
        let client = FeedClient::new(FeedClientConfig::new("k")).unwrap();
        assert_eq!(client.url, "https://api.jcdecaux.com/vls/v1/stations");
    }

    #[test]
    fn parse_entries_requires_array() {
        let err = parse_entries(r#"{"error": "Unauthorized"}"#).unwrap_err();
        assert!(matches!(err, FeedError::Json { .. }));
    }

    #[test]
    fn parse_entries_keeps_bad_elements() {
        let entries = parse_entries(
            r#"[
                {"number": 1, "name": "A", "position": {"lat": 48.69, "lng": 6.18},
                 "available_bikes": 1, "available_bike_stands": 2, "bike_stands": 3},
                "garbage"
            ]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0], FeedEntry::Station(_)));
        assert!(matches!(entries[1], FeedEntry::Unrecognised(_)));
    }
}
