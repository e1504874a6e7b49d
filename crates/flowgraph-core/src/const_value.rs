//! Constant literal values carried by `Const` nodes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;

/// A constant value materialized by a dedicated constant node.
///
/// `Graph` is its own variant rather than being folded into `Struct`/`List`:
/// per the single-writer edge model, a graph value never reaches a consuming
/// port except by being wrapped in a `Const` node and wired with an ordinary
/// edge, so every graph-valued constant in this IR is literally one of
/// these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConstValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Vec<ConstValue>),
    /// Anonymous struct literal; insertion order is the literal's field
    /// order, not a sorted or nominal order.
    Struct(IndexMap<String, ConstValue>),
    /// A nested graph carried as a value, e.g. a function referenced by name
    /// or an `if`/`loop` branch sub-graph.
    Graph(Box<Graph>),
}

impl PartialEq for ConstValue {
    fn eq(&self, other: &Self) -> bool {
        use ConstValue::*;
        match (self, other) {
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Bool(a), Bool(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Struct(a), Struct(b)) => a == b,
            (Graph(a), Graph(b)) => a == b,
            _ => false,
        }
    }
}
