//! A weighted spatial graph with nearest-node and shortest-path queries.

use std::collections::HashMap;

use ordered_float::OrderedFloat;
use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::domain::Coord;

use super::error::GraphError;

/// A graph node: external id (e.g. OSM node id) and position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphNode {
    pub id: u64,
    pub coord: Coord,
}

/// An edge between two external node ids, weighted by length in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphEdge {
    pub source: u64,
    pub target: u64,
    pub length: f64,
}

/// Slack on squared chord length within which candidates count as tied.
const TIE_EPSILON: f64 = 1e-15;

/// A node position on the unit sphere, tagged with its graph index.
type IndexedPoint = GeomWithData<[f64; 3], NodeIndex>;

/// Immutable road or path network.
///
/// Node indices follow the order nodes were supplied in, which is also the
/// tie-break order for nearest-node lookups.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    graph: DiGraph<GraphNode, f64>,

    /// Nodes as unit vectors. Chord length grows with great-circle
    /// distance, so the Euclidean nearest point is the haversine nearest.
    index: RTree<IndexedPoint>,
}

fn unit_vector(coord: Coord) -> [f64; 3] {
    let (lat, lon) = (coord.lat.to_radians(), coord.lon.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

impl RouteGraph {
    /// Build a graph from nodes and edges.
    ///
    /// Undirected input gets an edge in each direction.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = GraphNode>,
        edges: impl IntoIterator<Item = GraphEdge>,
        directed: bool,
    ) -> Result<Self, GraphError> {
        let mut graph = DiGraph::new();
        let mut by_id: HashMap<u64, NodeIndex> = HashMap::new();

        for node in nodes {
            Coord::parse(node.coord.lat, node.coord.lon).map_err(|e| {
                GraphError::InvalidCoordinate {
                    node: node.id,
                    reason: e.to_string(),
                }
            })?;
            if by_id.contains_key(&node.id) {
                return Err(GraphError::DuplicateNode(node.id));
            }
            let idx = graph.add_node(node);
            by_id.insert(node.id, idx);
        }

        for edge in edges {
            if !edge.length.is_finite() || edge.length < 0.0 {
                return Err(GraphError::InvalidLength {
                    source_node: edge.source,
                    target_node: edge.target,
                    length: edge.length,
                });
            }
            let lookup = |id| by_id.get(&id).copied().ok_or(GraphError::UnknownNode(id));
            let from = lookup(edge.source)?;
            let to = lookup(edge.target)?;

            graph.add_edge(from, to, edge.length);
            if !directed {
                graph.add_edge(to, from, edge.length);
            }
        }

        let index = RTree::bulk_load(
            graph
                .node_indices()
                .map(|idx| GeomWithData::new(unit_vector(graph[idx].coord), idx))
                .collect(),
        );

        Ok(Self { graph, index })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// The node stored at an index.
    pub fn node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.graph.node_weight(idx)
    }

    /// The node closest to `coord` by great-circle distance.
    ///
    /// There is no distance cutoff: a point far outside the network still
    /// snaps to its nearest node. Ties go to the lowest index. Returns `None`
    /// only for an empty graph.
    pub fn node_near(&self, coord: Coord) -> Option<NodeIndex> {
        let mut nearest = self
            .index
            .nearest_neighbor_iter_with_distance_2(&unit_vector(coord));
        let (first, best) = nearest.next()?;

        // Re-rank everything tied with the nearest point by exact distance
        std::iter::once(first)
            .chain(
                nearest
                    .take_while(|&(_, d2)| d2 <= best + TIE_EPSILON)
                    .map(|(point, _)| point),
            )
            .map(|point| point.data)
            .min_by_key(|&idx| (OrderedFloat(coord.haversine_m(&self.graph[idx].coord)), idx))
    }

    /// Minimum-length path between two nodes and its total length.
    ///
    /// Returns `None` when `to` is unreachable from `from`. A path from a
    /// node to itself is that single node with length zero.
    pub fn shortest_path(&self, from: NodeIndex, to: NodeIndex) -> Option<(Vec<NodeIndex>, f64)> {
        if from == to {
            return self.graph.node_weight(from).map(|_| (vec![from], 0.0));
        }

        // A* with a zero heuristic is Dijkstra that also returns the path
        let (length, path) = astar(
            &self.graph,
            from,
            |n| n == to,
            |e| *e.weight(),
            |_| 0.0,
        )?;

        Some((path, length))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use super::tests::node;
    use proptest::prelude::*;

    /// Reference lookup: scan every node, first minimum wins.
    fn scan_nearest(graph: &RouteGraph, coord: Coord) -> Option<NodeIndex> {
        graph
            .graph
            .node_indices()
            .min_by_key(|&idx| OrderedFloat(coord.haversine_m(&graph.graph[idx].coord)))
    }

    fn positions() -> impl Strategy<Value = Vec<(f64, f64)>> {
        // Coarse grid so duplicate positions, and so ties, are common
        prop::collection::vec((0u8..20, 0u8..20), 1..60).prop_map(|cells| {
            cells
                .into_iter()
                .map(|(i, j)| (48.6 + f64::from(i) * 0.01, 6.1 + f64::from(j) * 0.01))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn node_near_matches_full_scan(
            points in positions(),
            lat in 48.5f64..48.9,
            lon in 6.0f64..6.4,
        ) {
            let graph = RouteGraph::from_parts(
                points.iter().enumerate().map(|(i, &(lat, lon))| node(i as u64, lat, lon)),
                [],
                true,
            )
            .unwrap();
            let query = Coord::new(lat, lon);

            prop_assert_eq!(graph.node_near(query), scan_nearest(&graph, query));
        }

        #[test]
        fn node_near_on_exact_node_positions(points in positions(), pick in any::<prop::sample::Index>()) {
            let graph = RouteGraph::from_parts(
                points.iter().enumerate().map(|(i, &(lat, lon))| node(i as u64, lat, lon)),
                [],
                true,
            )
            .unwrap();
            let (lat, lon) = points[pick.index(points.len())];
            let query = Coord::new(lat, lon);

            prop_assert_eq!(graph.node_near(query), scan_nearest(&graph, query));
        }
    }
}
