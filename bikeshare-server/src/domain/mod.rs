//! Domain types for the bike-share monitor.
//!
//! These are validated values shared by the feed, cache and routing layers.
//! A `StationRecord` only exists once its feed entry has been checked, so
//! code that receives one can trust its fields.

mod category;
mod coord;
mod error;
mod mode;
mod station;

pub use category::StationCategory;
pub use coord::{Coord, InvalidCoord};
pub use error::DomainError;
pub use mode::TravelMode;
pub use station::StationRecord;
