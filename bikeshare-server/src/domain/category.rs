//! Station fill-level categories.

use std::fmt;

/// Fill-level category of a station.
///
/// Derived from a [`StationRecord`](super::StationRecord) by the classifier;
/// never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationCategory {
    /// Almost no free stands: bikes need to be taken away.
    Overloaded,
    /// Almost no bikes: bikes need to be brought in.
    Underfed,
    Normal,
}

impl StationCategory {
    /// All categories, in the order snapshots list them.
    pub const ALL: [StationCategory; 3] = [
        StationCategory::Overloaded,
        StationCategory::Underfed,
        StationCategory::Normal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StationCategory::Overloaded => "overloaded",
            StationCategory::Underfed => "underfed",
            StationCategory::Normal => "normal",
        }
    }
}

impl fmt::Display for StationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        let names: Vec<_> = StationCategory::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, ["overloaded", "underfed", "normal"]);
    }
}
