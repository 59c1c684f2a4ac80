//! Pre-built road and path networks.
//!
//! Two graphs are loaded once at startup, one per [`TravelMode`], and stay
//! read-only for the life of the process. There is no mutation API; picking
//! up new map data means restarting the server.

mod error;
mod load;
mod route_graph;

use std::path::Path;

use petgraph::graph::NodeIndex;
use tracing::info;

use crate::domain::{Coord, TravelMode};

pub use error::GraphError;
pub use load::{load_node_link, parse_node_link};
pub use route_graph::{GraphEdge, GraphNode, RouteGraph};

#[cfg(test)]
pub(crate) use route_graph::tests::{edge, node, sample_graph};

/// The cycling and motor graphs.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    cycling: RouteGraph,
    motor: RouteGraph,
}

impl GraphStore {
    pub fn new(cycling: RouteGraph, motor: RouteGraph) -> Self {
        Self { cycling, motor }
    }

    /// Load both graphs from node-link JSON files.
    pub fn load(
        cycling_path: impl AsRef<Path>,
        motor_path: impl AsRef<Path>,
    ) -> Result<Self, GraphError> {
        let cycling = load_node_link(&cycling_path)?;
        info!(
            path = %cycling_path.as_ref().display(),
            nodes = cycling.node_count(),
            edges = cycling.edge_count(),
            "loaded cycling graph"
        );

        let motor = load_node_link(&motor_path)?;
        info!(
            path = %motor_path.as_ref().display(),
            nodes = motor.node_count(),
            edges = motor.edge_count(),
            "loaded motor graph"
        );

        Ok(Self::new(cycling, motor))
    }

    /// The graph used for a travel mode.
    pub fn graph(&self, mode: TravelMode) -> &RouteGraph {
        match mode {
            TravelMode::Cycling => &self.cycling,
            TravelMode::Motor => &self.motor,
        }
    }

    /// Nearest node of the mode's graph to `coord`.
    pub fn node_near(&self, mode: TravelMode, coord: Coord) -> Option<NodeIndex> {
        self.graph(mode).node_near(coord)
    }

    /// Shortest path between two nodes of the mode's graph.
    pub fn shortest_path(
        &self,
        mode: TravelMode,
        from: NodeIndex,
        to: NodeIndex,
    ) -> Option<(Vec<NodeIndex>, f64)> {
        self.graph(mode).shortest_path(from, to)
    }
}
