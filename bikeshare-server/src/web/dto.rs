//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::cache::ClassifiedSnapshot;
use crate::domain::StationRecord;
use crate::planner::Route;

/// A station in the stations listing.
#[derive(Debug, Serialize)]
pub struct StationResult {
    /// Station number
    pub id: u32,

    /// Station name
    pub name: String,

    pub lat: f64,
    pub lon: f64,

    /// Bikes ready to be taken
    pub available_bikes: u32,

    /// Free stands
    pub available_bike_stands: u32,

    /// Total stands
    pub bike_stands: u32,
}

/// Response for the stations listing.
///
/// Category keys keep the names the map frontend reads.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    /// When the data was fetched from the feed (RFC 3339)
    pub fetched_at: String,

    /// Feed records skipped as malformed
    pub rejected: usize,

    #[serde(rename = "surcharges")]
    pub overloaded: Vec<StationResult>,

    #[serde(rename = "sous_alimentees")]
    pub underfed: Vec<StationResult>,

    #[serde(rename = "normales")]
    pub normal: Vec<StationResult>,
}

/// Body of a route request.
#[derive(Debug, Default, Deserialize)]
pub struct RouteRequest {
    /// `velo` or `camionette`
    #[serde(default)]
    pub mode: String,
}

/// Response for a computed route.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// `[lat, lon]` of every node on the path
    #[serde(rename = "chemin")]
    pub path: Vec<[f64; 2]>,

    /// Total length in metres
    pub distance: f64,

    /// One step per node
    pub instructions: Vec<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StationResult {
    /// Create from a domain StationRecord.
    pub fn from_record(record: &StationRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            lat: record.position.lat,
            lon: record.position.lon,
            available_bikes: record.available_bikes,
            available_bike_stands: record.available_stands,
            bike_stands: record.total_stands,
        }
    }
}

impl StationsResponse {
    /// Create from a classified snapshot.
    pub fn from_snapshot(snapshot: &ClassifiedSnapshot) -> Self {
        let convert = |records: &[StationRecord]| -> Vec<StationResult> {
            records.iter().map(StationResult::from_record).collect()
        };

        Self {
            fetched_at: snapshot.fetched_at().to_rfc3339(),
            rejected: snapshot.rejected(),
            overloaded: convert(snapshot.overloaded()),
            underfed: convert(snapshot.underfed()),
            normal: convert(snapshot.normal()),
        }
    }
}

impl RouteResponse {
    /// Create from a computed Route.
    pub fn from_route(route: &Route) -> Self {
        Self {
            path: route.path.iter().map(|c| [c.lat, c.lon]).collect(),
            distance: route.distance,
            instructions: route.instructions.clone(),
        }
    }
}
