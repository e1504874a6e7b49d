//! The type-check bridge: hands a lowered [`flowgraph_core::Graph`] to an
//! external `TypeChecker` and aggregates every pipeline stage's errors into
//! one [`CompileError`] (§4.6, §7).

pub mod checker;
pub mod compile;
pub mod error;

pub use checker::{NullChecker, TypeChecker, TypedGraph};
pub use compile::compile;
pub use error::{CompileError, TypeError};
