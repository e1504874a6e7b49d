//! Core error types for flowgraph-core.
//!
//! Covers only the invariants the graph data structure itself enforces.
//! Name resolution, type resolution, and argument-binding errors belong to
//! the lowering crate, which is the only caller that has the scope
//! information needed to produce a useful diagnostic for them.

use thiserror::Error;

use crate::id::NodeId;

/// Errors produced while mutating a [`crate::graph::Graph`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// An edge was added targeting a (node, port) pair that is already the
    /// target of a previously-added edge.
    #[error("port already wired: node {node} port '{port}'")]
    PortDoubleWired { node: NodeId, port: String },

    /// A `NodeId` does not refer to a node in this graph.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
}
