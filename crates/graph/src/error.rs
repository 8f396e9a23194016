//! Error type for `georoute-graph`.

use thiserror::Error;

use georoute_core::{CoreError, NodeId};

/// Errors produced by the sparse graph engine and the `GeoGraph` wrapper.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("node {0} not found (index out of range)")]
    InvalidNode(NodeId),

    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    #[error("no path from {from} to {to}")]
    UnreachableDestination { from: NodeId, to: NodeId },

    #[error("arc ({0}, {1}) already exists")]
    DuplicateArc(NodeId, NodeId),

    #[error("arc ({0}, {1}) does not exist")]
    MissingArc(NodeId, NodeId),

    #[error("no candidate node found to snap to")]
    NoSnapCandidate,

    #[error("internal invariant violated while reconstructing a path: {0}")]
    CorruptState(String),
}

/// Shorthand result type for `georoute-graph`.
pub type GraphResult<T> = Result<T, GraphError>;
