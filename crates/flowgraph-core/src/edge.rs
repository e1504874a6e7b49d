//! Edge payloads for the graph IR.

use serde::{Deserialize, Serialize};

/// A directed, named-port data edge: `(source node, source port) ->
/// (target node, target port)`. The source and target node identities live
/// in petgraph's own edge endpoints; this is the edge *weight*, carrying
/// only the port names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source_port: String,
    pub target_port: String,
}

impl Edge {
    pub fn new(source_port: impl Into<String>, target_port: impl Into<String>) -> Self {
        Edge {
            source_port: source_port.into(),
            target_port: target_port.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction() {
        let e = Edge::new("c", "a");
        assert_eq!(e.source_port, "c");
        assert_eq!(e.target_port, "a");
    }

    #[test]
    fn serde_roundtrip() {
        let e = Edge::new("value", "thunk");
        let json = serde_json::to_string(&e).unwrap();
        let back: Edge = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
