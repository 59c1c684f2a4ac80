//! JCDecaux station-status feed.
//!
//! Fetches the raw station list for one contract (city). The feed is a JSON
//! array of loosely-typed objects; entries are parsed leniently here and
//! validated one by one at the classification boundary, so a single bad
//! record never fails a whole fetch.

mod client;
mod convert;
mod error;
mod mock;
mod types;

use futures::future::BoxFuture;

pub use client::{FeedClient, FeedClientConfig};
pub use convert::convert_entry;
pub use error::FeedError;
pub use mock::MockFeed;
pub use types::{FeedEntry, PositionDto, StationDto};

/// Source of raw station entries.
///
/// Implemented by the live HTTP client and the file-backed mock; the station
/// cache only depends on this trait.
pub trait StationFeed: Send + Sync {
    /// Fetch the current station list.
    fn fetch_stations(&self) -> BoxFuture<'_, Result<Vec<FeedEntry>, FeedError>>;
}
