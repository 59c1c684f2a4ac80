//! File-backed feed for running without API access.
//!
//! Loads a saved `/stations` response and serves it as if it were live.
//! Useful for development and for demos without a JCDecaux key.

use std::path::Path;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::StationFeed;
use super::client::parse_entries;
use super::error::FeedError;
use super::types::FeedEntry;

/// Feed that serves a fixed station list.
#[derive(Debug, Clone)]
pub struct MockFeed {
    entries: Arc<Vec<FeedEntry>>,
}

impl MockFeed {
    /// Load entries from a JSON file holding a feed response.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| FeedError::Io {
            message: format!("failed to read {}: {e}", path.display()),
        })?;

        Ok(Self::from_entries(parse_entries(&json)?))
    }

    /// Serve the given entries.
    pub fn from_entries(entries: Vec<FeedEntry>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Number of entries served per fetch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StationFeed for MockFeed {
    fn fetch_stations(&self) -> BoxFuture<'_, Result<Vec<FeedEntry>, FeedError>> {
        let entries = self.entries.as_ref().clone();
        async move { Ok(entries) }.boxed()
    }
}
