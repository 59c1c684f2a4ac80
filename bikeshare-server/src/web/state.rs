//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::StationCache;
use crate::planner::RoutePlanner;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Classified station cache
    pub stations: Arc<StationCache>,

    /// Route planner over the loaded graphs
    pub planner: Arc<RoutePlanner>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(stations: StationCache, planner: RoutePlanner) -> Self {
        Self {
            stations: Arc::new(stations),
            planner: Arc::new(planner),
        }
    }
}
