//! Node-link JSON loading.
//!
//! Reads the format written by `networkx.node_link_data`, which is how the
//! OSMnx cycling and drive graphs are exported for this server. Node `x`
//! is longitude and `y` latitude; edge `length` is in metres. Extra node and
//! edge attributes (street names, highway tags, geometry) are ignored.
//!
//! GraphML files saved by `osmnx.save_graphml` are not read directly. They
//! are converted once, before deployment, with:
//!
//! ```text
//! import json, osmnx as ox, networkx as nx
//! G = ox.load_graphml("graph_cyclable.graphml")
//! json.dump(nx.node_link_data(G), open("graph_cyclable.json", "w"))
//! ```
//!
//! and the same for `graph_drive.graphml`. The multigraph and `key` fields
//! of the output are accepted; parallel edges simply become parallel
//! petgraph edges.

use std::path::Path;

use serde::Deserialize;

use crate::domain::Coord;

use super::error::GraphError;
use super::route_graph::{GraphEdge, GraphNode, RouteGraph};

#[derive(Debug, Deserialize)]
struct NodeLinkGraph {
    #[serde(default = "default_directed")]
    directed: bool,
    nodes: Vec<NodeLinkNode>,
    #[serde(alias = "edges")]
    links: Vec<NodeLinkEdge>,
}

#[derive(Debug, Deserialize)]
struct NodeLinkNode {
    id: u64,
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct NodeLinkEdge {
    source: u64,
    target: u64,
    length: f64,
}

fn default_directed() -> bool {
    true
}

/// Parse a node-link JSON document.
pub fn parse_node_link(json: &str) -> Result<RouteGraph, GraphError> {
    let raw: NodeLinkGraph = serde_json::from_str(json)?;

    RouteGraph::from_parts(
        raw.nodes.into_iter().map(|n| GraphNode {
            id: n.id,
            coord: Coord::new(n.y, n.x),
        }),
        raw.links.into_iter().map(|e| GraphEdge {
            source: e.source,
            target: e.target,
            length: e.length,
        }),
        raw.directed,
    )
}

/// Load a node-link JSON file.
pub fn load_node_link(path: impl AsRef<Path>) -> Result<RouteGraph, GraphError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_node_link(&json)
}
