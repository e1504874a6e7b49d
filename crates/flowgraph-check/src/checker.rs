//! The type-check bridge (§4.6): a single trait boundary between this
//! front-end and whatever type-inference engine a host embeds.

use flowgraph_core::{Graph, SignatureCatalog};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A graph the external type checker has accepted, with its own opaque
/// annotation payload threaded through unchanged. This crate never
/// interprets `annotations` -- it is whatever the real type checker's wire
/// format happens to be.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedGraph {
    pub graph: Graph,
    pub annotations: serde_json::Value,
}

/// The external type-inference engine. Implemented by whatever embeds this
/// front-end; this crate only specifies the contract it consumes.
pub trait TypeChecker {
    fn check(
        &self,
        graph: &Graph,
        catalog: &dyn SignatureCatalog,
    ) -> Result<TypedGraph, Vec<TypeError>>;
}

/// A reference `TypeChecker` that accepts every graph unchanged, with no
/// annotations attached. Exercises the bridge's encode/dispatch/decode
/// plumbing without embedding a real type-inference engine, which remains
/// out of scope for this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChecker;

impl TypeChecker for NullChecker {
    fn check(
        &self,
        graph: &Graph,
        _catalog: &dyn SignatureCatalog,
    ) -> Result<TypedGraph, Vec<TypeError>> {
        Ok(TypedGraph {
            graph: graph.clone(),
            annotations: serde_json::Value::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgraph_core::StaticCatalog;

    #[test]
    fn null_checker_accepts_any_graph() {
        let graph = Graph::new();
        let catalog = StaticCatalog::with_builtins();
        let typed = NullChecker.check(&graph, &catalog).unwrap();
        assert_eq!(typed.graph, graph);
        assert!(typed.annotations.is_null());
    }
}
