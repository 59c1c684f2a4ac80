//! Travel modes and their request names.

use std::fmt;

/// How the route will be travelled, which decides the graph used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TravelMode {
    /// By bike, over the cycling network. Request name `velo`.
    Cycling,
    /// By van, over the drivable network. Request name `camionette`.
    Motor,
}

impl TravelMode {
    pub const ALL: [TravelMode; 2] = [TravelMode::Cycling, TravelMode::Motor];

    /// Resolve a request mode name. Matching is exact.
    ///
    /// ```
    /// use bikeshare_server::domain::TravelMode;
    ///
    /// assert_eq!(TravelMode::parse("velo"), Some(TravelMode::Cycling));
    /// assert_eq!(TravelMode::parse("camionette"), Some(TravelMode::Motor));
    /// assert_eq!(TravelMode::parse("Velo"), None);
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "velo" => Some(TravelMode::Cycling),
            "camionette" => Some(TravelMode::Motor),
            _ => None,
        }
    }

    /// The request name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Cycling => "velo",
            TravelMode::Motor => "camionette",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
