//! Bike-share station records.

use super::Coord;

/// Snapshot of one station at fetch time.
///
/// Built once per fetch cycle from a feed entry and discarded when the next
/// fetch supersedes it. `available_bikes + available_stands <= total_stands`
/// is expected from the feed but not enforced: stations under maintenance
/// routinely report inconsistent counts.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    /// Stable station number from the feed.
    pub id: u32,
    pub name: String,
    pub position: Coord,
    pub available_bikes: u32,
    pub available_stands: u32,
    pub total_stands: u32,
}

impl StationRecord {
    /// Fraction of stands that are free, or `None` for a station without stands.
    pub fn stand_ratio(&self) -> Option<f64> {
        self.ratio(self.available_stands)
    }

    /// Fraction of stands holding a bike, or `None` for a station without stands.
    pub fn bike_ratio(&self) -> Option<f64> {
        self.ratio(self.available_bikes)
    }

    fn ratio(&self, count: u32) -> Option<f64> {
        if self.total_stands == 0 {
            return None;
        }
        Some(f64::from(count) / f64::from(self.total_stands))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(bikes: u32, stands: u32, total: u32) -> StationRecord {
        StationRecord {
            id: 1,
            name: "Place Stanislas".into(),
            position: Coord::new(48.6936, 6.1832),
            available_bikes: bikes,
            available_stands: stands,
            total_stands: total,
        }
    }

    #[test]
    fn ratios() {
        let r = record(9, 1, 10);
        assert_eq!(r.stand_ratio(), Some(0.1));
        assert_eq!(r.bike_ratio(), Some(0.9));
    }

    #[test]
    fn zero_total_has_no_ratio() {
        let r = record(0, 0, 0);
        assert_eq!(r.stand_ratio(), None);
        assert_eq!(r.bike_ratio(), None);
    }
}
