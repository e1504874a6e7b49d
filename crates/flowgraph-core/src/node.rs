//! Node payloads for the graph IR.

use serde::{Deserialize, Serialize};

use crate::const_value::ConstValue;
use crate::graph::Graph;

/// What a single graph node does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeOp {
    /// The graph's boundary input node. Its ports are the graph's own
    /// declared inputs.
    Input,
    /// The graph's boundary output node. Its ports are the graph's own
    /// declared outputs.
    Output,
    /// An operation resolved against the signature catalog (a `builtin/*`
    /// op or any other namespaced catalog entry).
    Call { name: String },
    /// A locally-defined function invoked directly. Carries its own graph
    /// as the node's operation payload -- see the "boxed node" glossary
    /// entry.
    Boxed { name: String, graph: Box<Graph> },
    /// A dedicated constant node. Its single output port is named `value`.
    Const { value: ConstValue },
}

/// A single node in a [`Graph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub op: NodeOp,
}

impl Node {
    pub fn new(op: NodeOp) -> Self {
        Node { op }
    }

    /// `true` for the two synthetic boundary nodes every graph has.
    pub fn is_boundary(&self) -> bool {
        matches!(self.op, NodeOp::Input | NodeOp::Output)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (&self.op, &other.op) {
            (NodeOp::Input, NodeOp::Input) => true,
            (NodeOp::Output, NodeOp::Output) => true,
            (NodeOp::Call { name: a }, NodeOp::Call { name: b }) => a == b,
            (
                NodeOp::Boxed {
                    name: a,
                    graph: ga,
                },
                NodeOp::Boxed {
                    name: b,
                    graph: gb,
                },
            ) => a == b && ga == gb,
            (NodeOp::Const { value: a }, NodeOp::Const { value: b }) => a == b,
            _ => false,
        }
    }
}
