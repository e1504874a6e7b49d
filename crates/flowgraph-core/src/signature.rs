//! The signature interface (§4.2): a read-only catalog of callable
//! operations, keyed by `namespace -> function name -> FunctionEntry`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::TypeScheme;

/// The unqualified namespace every bare (non-`ns::name`) call resolves
/// against first.
pub const BUILTIN_NAMESPACE: &str = "builtin";

/// Everything the lowering visitor needs to know about one callable
/// operation: its canonical name, its ordered port names, and an opaque
/// type scheme passed through unchanged to the type-check bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub canonical_name: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub type_scheme: TypeScheme,
}

impl FunctionEntry {
    pub fn new(
        canonical_name: impl Into<String>,
        inputs: Vec<impl Into<String>>,
        outputs: Vec<impl Into<String>>,
    ) -> Self {
        FunctionEntry {
            canonical_name: canonical_name.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
            type_scheme: TypeScheme::Null,
        }
    }
}

/// A read-only directory of callable operations. Implemented by whatever
/// embeds this front-end: a live catalog fetched from a running evaluator,
/// a file loaded at startup, or (for tests) [`StaticCatalog`].
pub trait SignatureCatalog {
    fn lookup(&self, namespace: &str, name: &str) -> Option<&FunctionEntry>;
}

/// A simple in-memory [`SignatureCatalog`], pre-populated with the three
/// required `builtin` operations (§4.2). Not a stand-in for a real runtime
/// signature -- just the reference implementation used by this crate's own
/// tests and by callers with no live catalog of their own.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    namespaces: HashMap<String, HashMap<String, FunctionEntry>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        StaticCatalog::default()
    }

    /// A catalog containing only the three required `builtin` operations.
    pub fn with_builtins() -> Self {
        let mut cat = StaticCatalog::new();
        cat.register(
            BUILTIN_NAMESPACE,
            FunctionEntry::new("builtin/eval", vec!["thunk"], Vec::<&str>::new()),
        );
        cat.register(
            BUILTIN_NAMESPACE,
            FunctionEntry::new(
                "builtin/switch",
                vec!["pred", "if_true", "if_false"],
                vec!["value"],
            ),
        );
        cat.register(
            BUILTIN_NAMESPACE,
            FunctionEntry::new("builtin/loop", vec!["condition", "body"], Vec::<&str>::new()),
        );
        cat
    }

    pub fn register(&mut self, namespace: impl Into<String>, entry: FunctionEntry) {
        let local_name = entry
            .canonical_name
            .rsplit('/')
            .next()
            .unwrap_or(&entry.canonical_name)
            .to_string();
        self.namespaces
            .entry(namespace.into())
            .or_default()
            .insert(local_name, entry);
    }
}

impl SignatureCatalog for StaticCatalog {
    fn lookup(&self, namespace: &str, name: &str) -> Option<&FunctionEntry> {
        self.namespaces.get(namespace)?.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let cat = StaticCatalog::with_builtins();
        let eval = cat.lookup(BUILTIN_NAMESPACE, "eval").unwrap();
        assert_eq!(eval.canonical_name, "builtin/eval");
        assert_eq!(eval.inputs, vec!["thunk"]);

        let switch = cat.lookup(BUILTIN_NAMESPACE, "switch").unwrap();
        assert_eq!(switch.inputs, vec!["pred", "if_true", "if_false"]);
        assert_eq!(switch.outputs, vec!["value"]);

        let lp = cat.lookup(BUILTIN_NAMESPACE, "loop").unwrap();
        assert_eq!(lp.inputs, vec!["condition", "body"]);
    }

    #[test]
    fn unknown_function_is_none() {
        let cat = StaticCatalog::with_builtins();
        assert!(cat.lookup(BUILTIN_NAMESPACE, "frobnicate").is_none());
        assert!(cat.lookup("nope", "eval").is_none());
    }

    #[test]
    fn custom_namespace_registration() {
        let mut cat = StaticCatalog::new();
        cat.register(
            "math",
            FunctionEntry::new("math/iadd", vec!["a", "b"], vec!["c"]),
        );
        let entry = cat.lookup("math", "iadd").unwrap();
        assert_eq!(entry.canonical_name, "math/iadd");
    }
}
