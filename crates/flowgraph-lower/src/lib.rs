//! Lowers a parsed [`flowgraph_syntax::Program`] into the graph IR defined
//! by `flowgraph-core`, resolving names, types, and port wiring along the
//! way (§4.3 - §4.5).

pub mod context;
pub mod error;
pub mod lower;
pub mod typeresolve;

pub use context::{CallBinding, Context};
pub use error::LowerError;
pub use lower::lower_program;
pub use typeresolve::{resolve_type, TypeVarCounter};
