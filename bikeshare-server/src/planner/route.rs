//! Point-to-point routing over the mode's graph.
//!
//! Both endpoints are snapped to their nearest graph node, then the
//! minimum-length path between the two nodes is computed.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{Coord, InvalidCoord, TravelMode};
use crate::graph::GraphStore;

/// Why a route could not be produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// Mode name is not one of `velo`, `camionette`
    #[error("unknown travel mode: {0:?}")]
    UnknownMode(String),

    /// An endpoint is not a valid coordinate
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoord),

    /// The snapped endpoints are not connected in the mode's graph
    #[error("no {mode} path between the requested points")]
    NoPathFound { mode: TravelMode },

    /// The mode's graph has no nodes to snap to
    #[error("{mode} graph is empty")]
    EmptyGraph { mode: TravelMode },
}

/// A routing request as received from a client.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub from: Coord,
    pub to: Coord,
    pub mode: String,
}

impl RouteQuery {
    pub fn new(from: Coord, to: Coord, mode: impl Into<String>) -> Self {
        Self {
            from,
            to,
            mode: mode.into(),
        }
    }

    /// Resolve the mode and check both endpoints.
    ///
    /// The mode is checked first, so an unknown mode is reported even when
    /// the coordinates are also bad.
    pub fn validate(&self) -> Result<(TravelMode, Coord, Coord), RouteError> {
        let mode =
            TravelMode::parse(&self.mode).ok_or_else(|| RouteError::UnknownMode(self.mode.clone()))?;
        let from = Coord::parse(self.from.lat, self.from.lon)?;
        let to = Coord::parse(self.to.lat, self.to.lon)?;
        Ok((mode, from, to))
    }
}

/// A computed route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub mode: TravelMode,

    /// Position of every node on the path, start to end.
    pub path: Vec<Coord>,

    /// External ids of the path nodes.
    pub nodes: Vec<u64>,

    /// Total length in metres.
    pub distance: f64,

    /// One placeholder step per node.
    pub instructions: Vec<String>,
}

/// Computes routes over the shared graphs.
///
/// Holds no mutable state; calls are independent and can run in parallel.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    graphs: Arc<GraphStore>,
}

impl RoutePlanner {
    pub fn new(graphs: Arc<GraphStore>) -> Self {
        Self { graphs }
    }

    pub fn graphs(&self) -> &GraphStore {
        &self.graphs
    }

    /// Route between two raw coordinate pairs for a mode name.
    pub fn plan(
        &self,
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
        mode: &str,
    ) -> Result<Route, RouteError> {
        self.route(&RouteQuery::new(
            Coord::new(lat1, lon1),
            Coord::new(lat2, lon2),
            mode,
        ))
    }

    /// Route for a query.
    pub fn route(&self, query: &RouteQuery) -> Result<Route, RouteError> {
        let (mode, from, to) = query.validate()?;
        let graph = self.graphs.graph(mode);

        let start = graph
            .node_near(from)
            .ok_or(RouteError::EmptyGraph { mode })?;
        let end = graph.node_near(to).ok_or(RouteError::EmptyGraph { mode })?;

        let (path, distance) = graph
            .shortest_path(start, end)
            .ok_or(RouteError::NoPathFound { mode })?;

        let nodes: Vec<_> = path.iter().filter_map(|&idx| graph.node(idx)).collect();
        let route = Route {
            mode,
            path: nodes.iter().map(|n| n.coord).collect(),
            nodes: nodes.iter().map(|n| n.id).collect(),
            distance,
            instructions: nodes
                .iter()
                .map(|n| format!("Continue to node {}", n.id))
                .collect(),
        };

        debug!(
            %mode,
            from = %from,
            to = %to,
            nodes = route.nodes.len(),
            distance = route.distance,
            "computed route"
        );

        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{RouteGraph, edge, node, sample_graph};

    fn planner() -> RoutePlanner {
        let motor = RouteGraph::from_parts(
            [
                node(100, 48.700, 6.170),
                node(101, 48.690, 6.180),
            ],
            [edge(100, 101, 1400.0)],
            false,
        )
        .unwrap();
        RoutePlanner::new(Arc::new(GraphStore::new(sample_graph(), motor)))
    }

    #[test]
    fn routes_over_cycling_graph() {
        let route = planner()
            .plan(48.7001, 6.1702, 48.6899, 6.1798, "velo")
            .unwrap();

        assert_eq!(route.mode, TravelMode::Cycling);
        assert_eq!(route.distance, 200.0);
        assert_eq!(route.nodes.len(), 3);
        assert_eq!(route.nodes[0], 1);
        assert_eq!(route.nodes[2], 3);
        assert_eq!(route.path[0], Coord::new(48.700, 6.170));
        assert_eq!(route.path[2], Coord::new(48.690, 6.180));
        assert_eq!(route.instructions[0], "Continue to node 1");
        assert_eq!(route.instructions.len(), route.path.len());
    }

    #[test]
    fn mode_selects_graph() {
        let route = planner()
            .plan(48.7001, 6.1702, 48.6899, 6.1798, "camionette")
            .unwrap();

        assert_eq!(route.mode, TravelMode::Motor);
        assert_eq!(route.nodes, vec![100, 101]);
        assert_eq!(route.distance, 1400.0);
    }

    #[test]
    fn route_to_self_is_single_node() {
        let route = planner()
            .plan(48.6931, 6.1755, 48.6931, 6.1755, "velo")
            .unwrap();

        assert_eq!(route.distance, 0.0);
        assert_eq!(route.path.len(), 1);
        assert_eq!(route.instructions.len(), 1);
    }

    #[test]
    fn nearby_points_snapping_to_same_node() {
        let route = planner()
            .plan(48.7001, 6.1701, 48.6999, 6.1699, "velo")
            .unwrap();
        assert_eq!(route.nodes, vec![1]);
        assert_eq!(route.distance, 0.0);
    }

    #[test]
    fn disconnected_components_have_no_path() {
        let err = planner()
            .plan(48.700, 6.170, 48.650, 6.255, "velo")
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::NoPathFound {
                mode: TravelMode::Cycling
            }
        );
        assert_eq!(err.to_string(), "no velo path between the requested points");
    }

    #[test]
    fn unknown_mode_rejected_before_graph_access() {
        // Empty graphs would fail with EmptyGraph if they were consulted
        let planner = RoutePlanner::new(Arc::new(GraphStore::default()));
        for mode in ["voiture", "", "VELO", "bike"] {
            let err = planner.plan(48.7, 6.17, 48.69, 6.18, mode).unwrap_err();
            assert_eq!(err, RouteError::UnknownMode(mode.to_string()));
        }
    }

    #[test]
    fn invalid_coordinates_rejected() {
        let err = planner()
            .plan(95.0, 6.17, 48.69, 6.18, "velo")
            .unwrap_err();
        assert!(matches!(err, RouteError::InvalidCoordinate(_)));

        let err = planner()
            .plan(48.7, 6.17, 48.69, f64::NAN, "velo")
            .unwrap_err();
        assert!(matches!(err, RouteError::InvalidCoordinate(_)));
    }

    #[test]
    fn empty_graph_is_reported() {
        let planner = RoutePlanner::new(Arc::new(GraphStore::default()));
        let err = planner.plan(48.7, 6.17, 48.69, 6.18, "velo").unwrap_err();
        assert_eq!(
            err,
            RouteError::EmptyGraph {
                mode: TravelMode::Cycling
            }
        );
    }

    #[test]
    fn far_away_points_still_snap() {
        // Both ends well outside the network
        let route = planner()
            .plan(48.8566, 2.3522, 43.2965, 5.3698, "camionette")
            .unwrap();
        assert_eq!(route.nodes.len(), 2);
    }

    #[test]
    fn query_validation_order() {
        let query = RouteQuery::new(Coord::new(99.0, 0.0), Coord::new(0.0, 0.0), "tram");
        assert_eq!(
            query.validate(),
            Err(RouteError::UnknownMode("tram".into()))
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::graph::sample_graph;
    use proptest::prelude::*;

    fn planner() -> RoutePlanner {
        RoutePlanner::new(Arc::new(GraphStore::new(sample_graph(), sample_graph())))
    }

    /// Points around the square component, away from the island.
    fn near_square() -> impl Strategy<Value = (f64, f64)> {
        (48.685f64..48.705, 6.165f64..6.185)
    }

    proptest! {
        #[test]
        fn routes_within_component_succeed((lat1, lon1) in near_square(), (lat2, lon2) in near_square()) {
            let route = planner().plan(lat1, lon1, lat2, lon2, "velo").unwrap();

            prop_assert!(!route.path.is_empty());
            prop_assert_eq!(route.path.len(), route.nodes.len());
            prop_assert_eq!(route.instructions.len(), route.nodes.len());
            prop_assert!(route.distance == 0.0 || route.distance == 100.0 || route.distance == 200.0);
        }

        #[test]
        fn distance_is_symmetric_on_undirected_graph(
            (lat1, lon1) in near_square(),
            (lat2, lon2) in near_square(),
        ) {
            let planner = planner();
            let there = planner.plan(lat1, lon1, lat2, lon2, "camionette").unwrap();
            let back = planner.plan(lat2, lon2, lat1, lon1, "camionette").unwrap();

            prop_assert_eq!(there.distance, back.distance);
            prop_assert_eq!(there.nodes.first(), back.nodes.last());
            prop_assert_eq!(there.nodes.last(), back.nodes.first());
        }
    }
}
