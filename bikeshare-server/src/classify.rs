//! Station classification by fill level.
//!
//! A station is *overloaded* when almost none of its stands are free and
//! *underfed* when almost none hold a bike. The overload check runs first, so
//! a station that is short of both is reported as overloaded.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::{DomainError, StationCategory, StationRecord};
use crate::feed::{FeedEntry, convert_entry};

/// Ratio thresholds below which a station leaves the normal category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Free-stand ratio below which a station is overloaded.
    pub overload: f64,

    /// Bike ratio below which a station is underfed.
    pub underfed: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            overload: 0.25,
            underfed: 0.25,
        }
    }
}

/// Classifies station records against fixed thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct StationClassifier {
    thresholds: Thresholds,
}

impl StationClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Classify one station.
    ///
    /// A station reporting zero total stands has no meaningful ratio and is
    /// rejected as malformed.
    pub fn classify(&self, record: &StationRecord) -> Result<StationCategory, DomainError> {
        let (Some(stand_ratio), Some(bike_ratio)) = (record.stand_ratio(), record.bike_ratio())
        else {
            return Err(DomainError::malformed(Some(record.id), "bike_stands is zero"));
        };

        if stand_ratio < self.thresholds.overload {
            Ok(StationCategory::Overloaded)
        } else if bike_ratio < self.thresholds.underfed {
            Ok(StationCategory::Underfed)
        } else {
            Ok(StationCategory::Normal)
        }
    }

    /// Validate and classify a whole feed batch.
    ///
    /// Entries that fail validation or classification are skipped, logged,
    /// and counted in [`ClassifiedSnapshot::rejected`].
    pub fn classify_all(
        &self,
        entries: &[FeedEntry],
        fetched_at: DateTime<Utc>,
    ) -> ClassifiedSnapshot {
        let mut snapshot = ClassifiedSnapshot::empty(fetched_at);

        for entry in entries {
            let classified = convert_entry(entry)
                .and_then(|record| self.classify(&record).map(|category| (record, category)));

            match classified {
                Ok((record, category)) => snapshot.bucket_mut(category).push(record),
                Err(e) => {
                    warn!(error = %e, "skipping station record");
                    snapshot.rejected += 1;
                }
            }
        }

        snapshot
    }
}

/// Classified view of one feed fetch.
///
/// Every well-formed record of the fetch appears in exactly one of the three
/// sequences, in feed order. Snapshots are shared behind an `Arc` and never
/// modified after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedSnapshot {
    fetched_at: DateTime<Utc>,
    overloaded: Vec<StationRecord>,
    underfed: Vec<StationRecord>,
    normal: Vec<StationRecord>,
    rejected: usize,
}

impl ClassifiedSnapshot {
    fn empty(fetched_at: DateTime<Utc>) -> Self {
        Self {
            fetched_at,
            overloaded: Vec::new(),
            underfed: Vec::new(),
            normal: Vec::new(),
            rejected: 0,
        }
    }

    fn bucket_mut(&mut self, category: StationCategory) -> &mut Vec<StationRecord> {
        match category {
            StationCategory::Overloaded => &mut self.overloaded,
            StationCategory::Underfed => &mut self.underfed,
            StationCategory::Normal => &mut self.normal,
        }
    }

    /// When the underlying feed data was fetched.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Stations in the given category.
    pub fn stations(&self, category: StationCategory) -> &[StationRecord] {
        match category {
            StationCategory::Overloaded => &self.overloaded,
            StationCategory::Underfed => &self.underfed,
            StationCategory::Normal => &self.normal,
        }
    }

    pub fn overloaded(&self) -> &[StationRecord] {
        &self.overloaded
    }

    pub fn underfed(&self) -> &[StationRecord] {
        &self.underfed
    }

    pub fn normal(&self) -> &[StationRecord] {
        &self.normal
    }

    /// Number of feed entries skipped as malformed.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// All classified stations with their category.
    pub fn iter(&self) -> impl Iterator<Item = (&StationRecord, StationCategory)> {
        StationCategory::ALL
            .into_iter()
            .flat_map(move |c| self.stations(c).iter().map(move |r| (r, c)))
    }

    /// Number of classified stations.
    pub fn len(&self) -> usize {
        self.overloaded.len() + self.underfed.len() + self.normal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::Coord;
    use crate::feed::{PositionDto, StationDto};
    use chrono::TimeZone;

    fn record(bikes: u32, stands: u32, total: u32) -> StationRecord {
        StationRecord {
            id: 1,
            name: "Test".into(),
            position: Coord::new(48.69, 6.18),
            available_bikes: bikes,
            available_stands: stands,
            total_stands: total,
        }
    }

    pub(crate) fn entry(id: u32, bikes: u32, stands: u32, total: u32) -> FeedEntry {
        FeedEntry::Station(StationDto {
            number: Some(id),
            name: Some(format!("{id:02} - STATION")),
            position: Some(PositionDto {
                lat: Some(48.69),
                lng: Some(6.18),
            }),
            available_bikes: Some(bikes),
            available_bike_stands: Some(stands),
            bike_stands: Some(total),
        })
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 19, 8, 0, 0).unwrap()
    }

    #[test]
    fn overloaded_station() {
        let classifier = StationClassifier::default();
        assert_eq!(
            classifier.classify(&record(9, 1, 10)),
            Ok(StationCategory::Overloaded)
        );
    }

    #[test]
    fn underfed_station() {
        let classifier = StationClassifier::default();
        assert_eq!(
            classifier.classify(&record(1, 8, 10)),
            Ok(StationCategory::Underfed)
        );
    }

    #[test]
    fn normal_station() {
        let classifier = StationClassifier::default();
        assert_eq!(
            classifier.classify(&record(5, 5, 10)),
            Ok(StationCategory::Normal)
        );
    }

    #[test]
    fn overload_checked_before_underfed() {
        // Broken station: 1 bike, 1 free stand, 10 total
        let classifier = StationClassifier::default();
        assert_eq!(
            classifier.classify(&record(1, 1, 10)),
            Ok(StationCategory::Overloaded)
        );
    }

    #[test]
    fn threshold_is_exclusive() {
        // Exactly 25% free stands and bikes is normal
        let classifier = StationClassifier::default();
        assert_eq!(
            classifier.classify(&record(5, 5, 20)),
            Ok(StationCategory::Normal)
        );
    }

    #[test]
    fn custom_thresholds() {
        let classifier = StationClassifier::new(Thresholds {
            overload: 0.5,
            underfed: 0.1,
        });
        assert_eq!(
            classifier.classify(&record(6, 4, 10)),
            Ok(StationCategory::Overloaded)
        );
        assert_eq!(
            classifier.classify(&record(2, 8, 10)),
            Ok(StationCategory::Normal)
        );
    }

    #[test]
    fn zero_stands_is_malformed() {
        let classifier = StationClassifier::default();
        assert_eq!(
            classifier.classify(&record(0, 0, 0)),
            Err(DomainError::malformed(Some(1), "bike_stands is zero"))
        );
    }

    #[test]
    fn classify_all_buckets_in_feed_order() {
        let classifier = StationClassifier::default();
        let entries = vec![
            entry(1, 9, 1, 10),
            entry(2, 1, 8, 10),
            entry(3, 5, 5, 10),
            entry(4, 10, 0, 10),
        ];

        let snapshot = classifier.classify_all(&entries, at());

        let ids = |c| {
            snapshot
                .stations(c)
                .iter()
                .map(|r| r.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(StationCategory::Overloaded), vec![1, 4]);
        assert_eq!(ids(StationCategory::Underfed), vec![2]);
        assert_eq!(ids(StationCategory::Normal), vec![3]);
        assert_eq!(snapshot.rejected(), 0);
        assert_eq!(snapshot.fetched_at(), at());
    }

    #[test]
    fn classify_all_skips_bad_records() {
        let classifier = StationClassifier::default();
        let entries = vec![
            entry(1, 5, 5, 10),
            entry(2, 0, 0, 0),
            FeedEntry::Unrecognised(serde_json::json!("garbage")),
            FeedEntry::Station(StationDto {
                number: Some(3),
                ..StationDto::default()
            }),
            entry(4, 9, 1, 10),
        ];

        let snapshot = classifier.classify_all(&entries, at());

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.rejected(), 3);
        assert_eq!(snapshot.normal()[0].id, 1);
        assert_eq!(snapshot.overloaded()[0].id, 4);
    }

    #[test]
    fn empty_feed_gives_empty_snapshot() {
        let snapshot = StationClassifier::default().classify_all(&[], at());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.rejected(), 0);
    }
}
