//! Conversion from feed entries to validated domain records.
//!
//! Only structure is checked here: required fields present and coordinates
//! in range. Whether the counts make sense (e.g. zero stands) is the
//! classifier's call.

use crate::domain::{Coord, DomainError, StationRecord};

use super::types::{FeedEntry, StationDto};

/// Convert one feed entry into a [`StationRecord`].
pub fn convert_entry(entry: &FeedEntry) -> Result<StationRecord, DomainError> {
    match entry {
        FeedEntry::Station(dto) => convert_station(dto),
        FeedEntry::Unrecognised(value) => {
            let station = value
                .get("number")
                .and_then(|n| n.as_u64())
                .and_then(|n| u32::try_from(n).ok());
            Err(DomainError::malformed(
                station,
                "entry does not match the station schema",
            ))
        }
    }
}

fn convert_station(dto: &StationDto) -> Result<StationRecord, DomainError> {
    let id = dto
        .number
        .ok_or_else(|| DomainError::malformed(None, "missing field `number`"))?;

    let missing = |field: &str| DomainError::malformed(Some(id), format!("missing field `{field}`"));

    let name = dto.name.clone().ok_or_else(|| missing("name"))?;
    let position = dto.position.as_ref().ok_or_else(|| missing("position"))?;
    let lat = position.lat.ok_or_else(|| missing("position.lat"))?;
    let lon = position.lng.ok_or_else(|| missing("position.lng"))?;
    let position =
        Coord::parse(lat, lon).map_err(|e| DomainError::malformed(Some(id), e.to_string()))?;

    Ok(StationRecord {
        id,
        name,
        position,
        available_bikes: dto.available_bikes.ok_or_else(|| missing("available_bikes"))?,
        available_stands: dto
            .available_bike_stands
            .ok_or_else(|| missing("available_bike_stands"))?,
        total_stands: dto.bike_stands.ok_or_else(|| missing("bike_stands"))?,
    })
}
