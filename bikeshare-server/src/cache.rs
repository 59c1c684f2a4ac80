//! Time-boxed cache of classified station data.
//!
//! The feed is polled at most once per freshness window. Between refreshes
//! every request is served the same `Arc<ClassifiedSnapshot>`; a refresh
//! builds a complete new snapshot and swaps it in whole, so readers see
//! either the old snapshot or the new one.
//!
//! At most one refresh runs at a time. Requests that arrive while a refresh
//! is in flight get the previous snapshot straight away instead of waiting
//! on the feed. Only when no snapshot exists yet do they wait, and then
//! they share the in-flight refresh's result.
//!
//! When the feed fails, the last good snapshot keeps being served and the
//! failure is logged. The failed attempt counts as a refresh for freshness
//! purposes, so a broken feed is retried once per window rather than on
//! every request. Callers that queued behind a failed first fetch receive
//! that fetch's error instead of each trying the feed again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::classify::StationClassifier;
use crate::feed::{FeedError, StationFeed};

pub use crate::classify::ClassifiedSnapshot;

/// Configuration for the station cache.
#[derive(Debug, Clone)]
pub struct StationCacheConfig {
    /// How long a snapshot is served without refreshing (seconds).
    pub freshness_secs: i64,

    /// Upper bound on a single feed fetch (seconds).
    pub fetch_timeout_secs: u64,
}

impl StationCacheConfig {
    pub fn new(freshness_secs: i64, fetch_timeout_secs: u64) -> Self {
        Self {
            freshness_secs,
            fetch_timeout_secs,
        }
    }

    /// Returns the freshness window as a Duration.
    ///
    /// Saturates at the largest representable Duration.
    pub fn freshness(&self) -> Duration {
        Duration::try_seconds(self.freshness_secs).unwrap_or_else(Duration::max_value)
    }

    /// Returns the fetch timeout as a std Duration.
    pub fn fetch_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for StationCacheConfig {
    fn default() -> Self {
        Self {
            freshness_secs: 60,
            fetch_timeout_secs: 10,
        }
    }
}

/// Errors surfaced by the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The feed failed and no snapshot has ever been fetched.
    #[error("no station data available: {source}")]
    NoDataAvailable {
        #[source]
        source: Arc<FeedError>,
    },
}

/// What the cache currently holds. Replaced whole on every refresh attempt.
#[derive(Default)]
struct CacheState {
    snapshot: Option<Arc<ClassifiedSnapshot>>,
    last_attempt: Option<DateTime<Utc>>,

    /// Completed refresh attempts, successful or not.
    attempts: u64,

    /// Error of the latest attempt, cleared by a successful one.
    last_failure: Option<Arc<FeedError>>,
}

impl CacheState {
    fn fresh(&self, now: DateTime<Utc>, freshness: Duration) -> Option<Arc<ClassifiedSnapshot>> {
        let snapshot = self.snapshot.as_ref()?;
        let last_attempt = self.last_attempt?;
        (now - last_attempt < freshness).then(|| snapshot.clone())
    }
}

/// Station cache with coalesced, time-bounded refresh.
pub struct StationCache {
    feed: Arc<dyn StationFeed>,
    classifier: StationClassifier,
    config: StationCacheConfig,

    state: RwLock<CacheState>,

    /// Held for the duration of a refresh.
    refresh_gate: Mutex<()>,

    fetches: AtomicU64,
    failures: AtomicU64,
}

impl StationCache {
    /// Create an empty cache. The first `get` fetches from the feed.
    pub fn new(
        feed: Arc<dyn StationFeed>,
        classifier: StationClassifier,
        config: StationCacheConfig,
    ) -> Self {
        Self {
            feed,
            classifier,
            config,
            state: RwLock::new(CacheState::default()),
            refresh_gate: Mutex::new(()),
            fetches: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Get the classified stations as of `now`.
    ///
    /// Serves the cached snapshot while it is fresh, otherwise refreshes from
    /// the feed. Fails only when the feed is unavailable and nothing has ever
    /// been fetched.
    pub async fn get(&self, now: DateTime<Utc>) -> Result<Arc<ClassifiedSnapshot>, CacheError> {
        let freshness = self.config.freshness();

        let (stale, seen_attempts) = {
            let state = self.state.read().await;
            if let Some(snapshot) = state.fresh(now, freshness) {
                return Ok(snapshot);
            }
            (state.snapshot.clone(), state.attempts)
        };

        let _gate = match &stale {
            Some(snapshot) => match self.refresh_gate.try_lock() {
                Ok(gate) => gate,
                Err(_) => {
                    debug!("refresh already in flight, serving previous snapshot");
                    return Ok(snapshot.clone());
                }
            },
            None => self.refresh_gate.lock().await,
        };

        // Another caller may have refreshed while we were acquiring the gate.
        {
            let state = self.state.read().await;
            if let Some(snapshot) = state.fresh(now, freshness) {
                return Ok(snapshot);
            }
            // A refresh completed while we waited: share its outcome
            if state.attempts != seen_attempts {
                if let Some(snapshot) = &state.snapshot {
                    return Ok(snapshot.clone());
                }
                if let Some(source) = &state.last_failure {
                    return Err(CacheError::NoDataAvailable {
                        source: source.clone(),
                    });
                }
            }
        }

        self.refresh(now).await
    }

    /// Fetch, classify and swap in a new snapshot. Caller holds the gate.
    async fn refresh(&self, now: DateTime<Utc>) -> Result<Arc<ClassifiedSnapshot>, CacheError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let result = self.fetch().await;

        let mut state = self.state.write().await;
        let attempts = state.attempts + 1;

        match result {
            Ok(entries) => {
                let snapshot = Arc::new(self.classifier.classify_all(&entries, now));
                info!(
                    overloaded = snapshot.overloaded().len(),
                    underfed = snapshot.underfed().len(),
                    normal = snapshot.normal().len(),
                    rejected = snapshot.rejected(),
                    "refreshed station snapshot"
                );

                *state = CacheState {
                    snapshot: Some(snapshot.clone()),
                    last_attempt: Some(now),
                    attempts,
                    last_failure: None,
                };
                Ok(snapshot)
            }
            Err(source) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                let source = Arc::new(source);

                match state.snapshot.clone() {
                    Some(previous) => {
                        warn!(
                            error = %source,
                            fetched_at = %previous.fetched_at(),
                            "station feed unavailable, serving previous snapshot"
                        );
                        *state = CacheState {
                            snapshot: Some(previous.clone()),
                            last_attempt: Some(now),
                            attempts,
                            last_failure: Some(source),
                        };
                        Ok(previous)
                    }
                    None => {
                        warn!(error = %source, "station feed unavailable, no snapshot to serve");
                        // No attempt time: the next caller that finds the cache empty retries
                        *state = CacheState {
                            snapshot: None,
                            last_attempt: None,
                            attempts,
                            last_failure: Some(source.clone()),
                        };
                        Err(CacheError::NoDataAvailable { source })
                    }
                }
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<crate::feed::FeedEntry>, FeedError> {
        let timeout = self.config.fetch_timeout();
        match tokio::time::timeout(timeout, self.feed.fetch_stations()).await {
            Ok(result) => result,
            Err(_) => Err(FeedError::Timeout {
                secs: timeout.as_secs(),
            }),
        }
    }

    /// The snapshot currently held, fresh or not, without refreshing.
    pub async fn current(&self) -> Option<Arc<ClassifiedSnapshot>> {
        self.state.read().await.snapshot.clone()
    }

    /// Number of feed fetches attempted.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Number of fetches that failed.
    pub fn refresh_failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &StationCacheConfig {
        &self.config
    }
}
