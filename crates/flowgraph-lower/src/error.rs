//! Lowering-stage errors (§7). Every span-bearing variant carries the
//! [`Span`] of the AST node that produced it.

use flowgraph_core::NodeId;
use flowgraph_syntax::Span;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LowerError {
    #[error("unknown type alias '{name}' at {span}")]
    UnknownTypeAlias { name: String, span: Span },

    #[error("call to unknown function '{name}' at {span}")]
    UnknownFunction { name: String, span: Span },

    #[error("name '{name}' is not in scope, at {span}")]
    NameNotInScope { name: String, span: Span },

    #[error("'{var}' has no output port '{port}', at {span}")]
    PortNotFound {
        var: String,
        port: String,
        span: Span,
    },

    #[error("'{port}' is not a declared input port, at {span}")]
    UnknownPort { port: String, span: Span },

    #[error("expected {expected} positional argument(s), found {found}, at {span}")]
    ArityMismatch {
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("port '{port}' on node {node} is wired more than once, at {span}")]
    PortDoubleWired {
        node: NodeId,
        port: String,
        span: Span,
    },

    #[error("'{name}' is declared more than once (first at {first_span}, again at {span})")]
    DuplicateDeclaration {
        name: String,
        first_span: Span,
        span: Span,
    },
}
