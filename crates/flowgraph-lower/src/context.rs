//! Lowering scope (§4.4). A plain, owned, `Clone`-able struct -- no
//! `Rc`/`RefCell` sharing anywhere. Constructing a child context for a
//! nested block (`if`/`loop` sub-bodies) is an explicit copy, not a shared
//! handle, so nothing a child writes can ever be observed by its parent.

use std::collections::HashMap;

use flowgraph_core::{Graph, GraphSignature, GraphType, NodeId};
use indexmap::IndexMap;

/// What a previously-lowered call, boxed call, or thunk bound at a local
/// name. `outputs` is the callee's declared output order, which is what
/// outport resolution needs to expand a bare identifier into its full list
/// of `(node, port)` pairs (§4.5).
#[derive(Debug, Clone)]
pub struct CallBinding {
    pub node: NodeId,
    pub outputs: Vec<String>,
}

/// The lowering scope for one function body or nested block.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Locally declared functions visible by unqualified name: `name ->
    /// (graph, signature)`.
    pub functions: HashMap<String, (Graph, GraphSignature)>,
    /// Names bound by a call, thunk, `if`, or `loop` instruction.
    pub output_vars: HashMap<String, CallBinding>,
    /// Names bound by a `const` declaration; every constant has exactly one
    /// output port, `value`.
    pub constants: HashMap<String, NodeId>,
    /// This block's own declared inputs, in declaration order.
    pub inputs: IndexMap<String, GraphType>,
    /// This block's own declared outputs, in declaration order. Only
    /// meaningful when `outputs_known` is set -- a nested `if`/`loop` block
    /// has no predeclared output order of its own, and its `output`
    /// statement instead accepts whatever names it gives, so this is left
    /// empty there rather than treated as "zero outputs declared".
    pub outputs: IndexMap<String, GraphType>,
    /// Whether `outputs` reflects a real, enclosing `FuncDef` output
    /// signature (possibly empty) rather than "no predeclared order".
    pub outputs_known: bool,
    /// Type aliases visible in this scope: `name -> resolved type`.
    pub aliases: HashMap<String, GraphType>,
}

impl Context {
    pub fn new(inputs: IndexMap<String, GraphType>) -> Self {
        Context {
            inputs,
            ..Context::default()
        }
    }

    /// Builds the context for a nested block: inherits `functions` and
    /// `aliases` from `self` via a real, independent clone, and starts with
    /// fresh `output_vars`/`constants`/`outputs` plus the block's own
    /// `inputs`. `outputs_known` is always false here -- a nested block's
    /// output order is never predeclared.
    pub fn child(&self, inputs: IndexMap<String, GraphType>) -> Self {
        Context {
            functions: self.functions.clone(),
            output_vars: HashMap::new(),
            constants: HashMap::new(),
            inputs,
            outputs: IndexMap::new(),
            outputs_known: false,
            aliases: self.aliases.clone(),
        }
    }
}
