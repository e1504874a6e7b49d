//! The graph IR's type language.
//!
//! [`GraphType`] is what source-level [`TypeExpr`](crate) terms are resolved
//! into (resolution itself lives in the lowering crate, which has the alias
//! table). Structs use [`IndexMap`] so field order survives round-tripping
//! through this type -- lowering never needs nominal identity for structs,
//! only structural shape plus insertion order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A type term in the graph IR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphType {
    Int,
    Bool,
    Float,
    Str,
    Pair(Box<GraphType>, Box<GraphType>),
    Vec(Box<GraphType>),
    Map(Box<GraphType>, Box<GraphType>),
    /// Structural struct type: ordered field name -> type.
    Struct(IndexMap<String, GraphType>),
    /// A graph value's type: its own input/output signature.
    Graph(GraphSignature),
    /// An anonymous inference placeholder. Two `Var` terms are the same type
    /// only if they carry the same id; ids are not shared across separate
    /// resolver invocations.
    Var(u32),
}

/// The input/output port signature of a graph-valued type, independent of
/// any particular [`crate::graph::Graph`] instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSignature {
    pub inputs: IndexMap<String, GraphType>,
    pub outputs: IndexMap<String, GraphType>,
}

impl GraphSignature {
    pub fn new(
        inputs: IndexMap<String, GraphType>,
        outputs: IndexMap<String, GraphType>,
    ) -> Self {
        GraphSignature { inputs, outputs }
    }

    pub fn input_order(&self) -> Vec<String> {
        self.inputs.keys().cloned().collect()
    }

    pub fn output_order(&self) -> Vec<String> {
        self.outputs.keys().cloned().collect()
    }
}

/// An opaque type scheme handed back from the signature catalog. This crate
/// never interprets its contents -- it is threaded through unchanged to the
/// type-check bridge, which hands it to the real type checker.
pub type TypeScheme = serde_json::Value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_type_preserves_field_order() {
        let mut fields = IndexMap::new();
        fields.insert("z".to_string(), GraphType::Int);
        fields.insert("a".to_string(), GraphType::Bool);
        let ty = GraphType::Struct(fields);
        if let GraphType::Struct(f) = &ty {
            let keys: Vec<&str> = f.keys().map(|s| s.as_str()).collect();
            assert_eq!(keys, vec!["z", "a"]);
        } else {
            panic!("expected struct");
        }
    }

    #[test]
    fn var_terms_distinguished_by_id() {
        assert_ne!(GraphType::Var(0), GraphType::Var(1));
        assert_eq!(GraphType::Var(3), GraphType::Var(3));
    }

    #[test]
    fn serde_roundtrip_composite() {
        let ty = GraphType::Pair(Box::new(GraphType::Int), Box::new(GraphType::Bool));
        let json = serde_json::to_string(&ty).unwrap();
        let back: GraphType = serde_json::from_str(&json).unwrap();
        assert_eq!(ty, back);
    }

    #[test]
    fn graph_signature_orders() {
        let mut inputs = IndexMap::new();
        inputs.insert("a".to_string(), GraphType::Int);
        inputs.insert("b".to_string(), GraphType::Int);
        let sig = GraphSignature::new(inputs, IndexMap::new());
        assert_eq!(sig.input_order(), vec!["a", "b"]);
        assert!(sig.output_order().is_empty());
    }
}
