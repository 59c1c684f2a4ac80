//! Graph loading error types.

/// Errors raised while loading a route graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Graph file could not be read
    #[error("failed to read graph file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Graph file is not valid node-link JSON
    #[error("invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Two nodes share an id
    #[error("duplicate node id {0}")]
    DuplicateNode(u64),

    /// An edge refers to a node that is not in the node list
    #[error("edge refers to unknown node {0}")]
    UnknownNode(u64),

    /// An edge length is negative or not finite
    #[error("edge {source_node} -> {target_node} has invalid length {length}")]
    InvalidLength {
        source_node: u64,
        target_node: u64,
        length: f64,
    },

    /// A node position is outside the WGS84 range
    #[error("node {node} has invalid position: {reason}")]
    InvalidCoordinate { node: u64, reason: String },
}
