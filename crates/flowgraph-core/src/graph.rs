//! `Graph`: the per-function container for the graph IR.
//!
//! Each declared function in the source language lowers to exactly one
//! `Graph`. A `Graph` owns two synthetic boundary nodes -- `input` and
//! `output` -- whose ports are the function's own declared inputs and
//! outputs (§3, "Graph IR entities").

use petgraph::stable_graph::StableGraph;
use petgraph::Directed;
use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::error::CoreError;
use crate::id::{EdgeId, NodeId};
use crate::node::{Node, NodeOp};

/// A function's lowered body: a directed graph of [`Node`]s joined by
/// named-port [`Edge`]s, plus the two boundary nodes every graph has.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    inner: StableGraph<Node, Edge, Directed, u32>,
    input_node: NodeId,
    output_node: NodeId,
}

impl Graph {
    /// Creates a new, empty graph with its `input` and `output` boundary
    /// nodes already in place.
    pub fn new() -> Self {
        let mut inner = StableGraph::<Node, Edge, Directed, u32>::new();
        let input_node = NodeId::from(inner.add_node(Node::new(NodeOp::Input)));
        let output_node = NodeId::from(inner.add_node(Node::new(NodeOp::Output)));
        Graph {
            inner,
            input_node,
            output_node,
        }
    }

    pub fn input_node(&self) -> NodeId {
        self.input_node
    }

    pub fn output_node(&self) -> NodeId {
        self.output_node
    }

    /// Adds a node carrying `op` and returns its id.
    pub fn add_node(&mut self, op: NodeOp) -> NodeId {
        NodeId::from(self.inner.add_node(Node::new(op)))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.inner.node_weight(id.into())
    }

    /// Every non-boundary node id, in insertion order.
    pub fn op_node_ids(&self) -> Vec<NodeId> {
        self.inner
            .node_indices()
            .map(NodeId::from)
            .filter(|id| !self.node(*id).unwrap().is_boundary())
            .collect()
    }

    /// All nodes currently carrying an existing edge into `(node, port)`.
    fn edges_into(&self, node: NodeId, port: &str) -> Vec<EdgeId> {
        self.inner
            .edge_indices()
            .filter(|&e| {
                let (_, target) = self.inner.edge_endpoints(e).unwrap();
                NodeId::from(target) == node && self.inner.edge_weight(e).unwrap().target_port == port
            })
            .map(|e| EdgeId(e.index() as u32))
            .collect()
    }

    /// Adds an edge from `(source_node, source_port)` to `(target_node,
    /// target_port)`. Enforces invariant 1 (single writer per target port):
    /// fails with [`CoreError::PortDoubleWired`] if `target_port` on
    /// `target_node` already has an incoming edge.
    pub fn add_edge(
        &mut self,
        source_node: NodeId,
        source_port: impl Into<String>,
        target_node: NodeId,
        target_port: impl Into<String>,
    ) -> Result<EdgeId, CoreError> {
        let target_port = target_port.into();
        if !self.edges_into(target_node, &target_port).is_empty() {
            return Err(CoreError::PortDoubleWired {
                node: target_node,
                port: target_port,
            });
        }
        let idx = self.inner.add_edge(
            source_node.into(),
            target_node.into(),
            Edge::new(source_port.into(), target_port),
        );
        Ok(EdgeId(idx.index() as u32))
    }

    /// `true` if `(node, port)` already has an incoming edge.
    pub fn port_is_wired(&self, node: NodeId, port: &str) -> bool {
        !self.edges_into(node, port).is_empty()
    }

    /// All edges in the graph as `(source_node, source_port, target_node,
    /// target_port)` tuples, in insertion order.
    pub fn edges(&self) -> Vec<(NodeId, String, NodeId, String)> {
        self.inner
            .edge_indices()
            .map(|e| {
                let (s, t) = self.inner.edge_endpoints(e).unwrap();
                let w = self.inner.edge_weight(e).unwrap();
                (
                    NodeId::from(s),
                    w.source_port.clone(),
                    NodeId::from(t),
                    w.target_port.clone(),
                )
            })
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Graph::new()
    }
}

impl PartialEq for Graph {
    /// Structural equality. Lowering never removes nodes or edges, so
    /// insertion order is a stable proxy for identity here -- this lets
    /// idempotence tests (§8) use plain `==` instead of a graph-isomorphism
    /// check.
    fn eq(&self, other: &Self) -> bool {
        if self.input_node != other.input_node || self.output_node != other.output_node {
            return false;
        }
        let nodes_a: Vec<&Node> = self.inner.node_weights().collect();
        let nodes_b: Vec<&Node> = other.inner.node_weights().collect();
        if nodes_a != nodes_b {
            return false;
        }
        self.edges() == other.edges()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_graph_has_boundary_nodes() {
        let g = Graph::new();
        assert_eq!(g.node_count(), 2);
        assert!(g.node(g.input_node()).unwrap().is_boundary());
        assert!(g.node(g.output_node()).unwrap().is_boundary());
    }

    #[test]
    fn add_node_returns_distinct_ids() {
        let mut g = Graph::new();
        let n1 = g.add_node(NodeOp::Call {
            name: "builtin/iadd".into(),
        });
        let n2 = g.add_node(NodeOp::Call {
            name: "builtin/isub".into(),
        });
        assert_ne!(n1, n2);
        assert_eq!(g.op_node_ids(), vec![n1, n2]);
    }

    #[test]
    fn add_edge_wires_ports() {
        let mut g = Graph::new();
        let n = g.add_node(NodeOp::Call {
            name: "builtin/iadd".into(),
        });
        g.add_edge(g.input_node(), "a", n, "a").unwrap();
        assert!(g.port_is_wired(n, "a"));
        assert!(!g.port_is_wired(n, "b"));
        assert_eq!(g.edges().len(), 1);
    }

    #[test]
    fn double_wiring_a_port_is_rejected() {
        let mut g = Graph::new();
        let n = g.add_node(NodeOp::Call {
            name: "builtin/iadd".into(),
        });
        g.add_edge(g.input_node(), "a", n, "a").unwrap();
        let err = g.add_edge(g.input_node(), "b", n, "a").unwrap_err();
        assert_eq!(
            err,
            CoreError::PortDoubleWired {
                node: n,
                port: "a".into()
            }
        );
    }

    #[test]
    fn structural_equality_ignores_nothing_but_identity() {
        let mut g1 = Graph::new();
        let n1 = g1.add_node(NodeOp::Call {
            name: "builtin/iadd".into(),
        });
        g1.add_edge(g1.input_node(), "a", n1, "a").unwrap();

        let mut g2 = Graph::new();
        let n2 = g2.add_node(NodeOp::Call {
            name: "builtin/iadd".into(),
        });
        g2.add_edge(g2.input_node(), "a", n2, "a").unwrap();

        assert_eq!(g1, g2);
    }

    #[test]
    fn structurally_different_graphs_are_not_equal() {
        let mut g1 = Graph::new();
        g1.add_node(NodeOp::Call {
            name: "builtin/iadd".into(),
        });

        let g2 = Graph::new();

        assert_ne!(g1, g2);
        let _ = g2;
    }

    proptest! {
        /// Wiring a fixed node's ports under any set of distinct names
        /// always succeeds, and re-wiring any one of those same names
        /// always fails -- invariant 1 (single writer per target port)
        /// holds regardless of how many ports or which names are used.
        #[test]
        fn distinct_ports_wire_and_reused_ports_reject(
            ports in proptest::collection::hash_set("[a-z]{1,6}", 1..8)
        ) {
            let mut g = Graph::new();
            let n = g.add_node(NodeOp::Call { name: "builtin/iadd".into() });
            let ports: Vec<String> = ports.into_iter().collect();
            for p in &ports {
                g.add_edge(g.input_node(), p.clone(), n, p.clone()).unwrap();
            }
            prop_assert_eq!(g.edges().len(), ports.len());
            for p in &ports {
                prop_assert!(g.add_edge(g.input_node(), p.clone(), n, p.clone()).is_err());
            }
        }
    }
}
