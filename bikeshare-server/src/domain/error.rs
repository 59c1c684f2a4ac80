//! Domain error types.
//!
//! These errors represent validation failures on individual feed records.
//! They are distinct from network/IO errors: a malformed record is skipped,
//! it never fails a whole batch.

/// Domain-level errors for record validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A station record failed structural validation.
    #[error("malformed station record{}: {reason}", station_label(.station))]
    MalformedStationRecord {
        /// Station number, when the record had a usable one.
        station: Option<u32>,
        reason: String,
    },
}

impl DomainError {
    /// Shorthand for a malformed-record error.
    pub fn malformed(station: Option<u32>, reason: impl Into<String>) -> Self {
        DomainError::MalformedStationRecord {
            station,
            reason: reason.into(),
        }
    }
}

fn station_label(station: &Option<u32>) -> String {
    station.map(|id| format!(" {id}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::malformed(Some(12), "bike_stands is zero");
        assert_eq!(
            err.to_string(),
            "malformed station record 12: bike_stands is zero"
        );

        let err = DomainError::malformed(None, "missing field `number`");
        assert_eq!(
            err.to_string(),
            "malformed station record: missing field `number`"
        );
    }
}
