pub mod const_value;
pub mod edge;
pub mod error;
pub mod graph;
pub mod id;
pub mod node;
pub mod signature;
pub mod types;

pub use const_value::ConstValue;
pub use edge::Edge;
pub use error::CoreError;
pub use graph::Graph;
pub use id::{EdgeId, NodeId};
pub use node::{Node, NodeOp};
pub use signature::{FunctionEntry, SignatureCatalog, StaticCatalog, BUILTIN_NAMESPACE};
pub use types::{GraphSignature, GraphType, TypeScheme};
