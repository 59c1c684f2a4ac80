//! Wire types for the JCDecaux `/stations` endpoint.
//!
//! Every field is optional so that absence shows up as `None` rather than a
//! parse failure of the whole array. Unknown fields (`status`, `banking`,
//! `last_update`, ...) are ignored.

use serde::Deserialize;

/// One station object as served by the feed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StationDto {
    pub number: Option<u32>,
    pub name: Option<String>,
    pub position: Option<PositionDto>,
    pub available_bikes: Option<u32>,
    pub available_bike_stands: Option<u32>,
    pub bike_stands: Option<u32>,
}

/// Nested `position` object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PositionDto {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// An element of the feed array.
///
/// Elements whose shape does not match [`StationDto`] (wrong field types,
/// negative counts, non-objects) are kept verbatim so they can be rejected
/// and reported individually.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FeedEntry {
    Station(StationDto),
    Unrecognised(serde_json::Value),
}

impl From<StationDto> for FeedEntry {
    fn from(dto: StationDto) -> Self {
        FeedEntry::Station(dto)
    }
}
