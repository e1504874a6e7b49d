//! Top-level pipeline orchestration: source text in, a [`TypedGraph`] for
//! one named entry function out.

use flowgraph_core::SignatureCatalog;
use flowgraph_lower::lower_program;
use flowgraph_syntax::parse;

use crate::checker::{TypeChecker, TypedGraph};
use crate::error::CompileError;

/// Lexes, parses, and lowers `source`, then hands the graph declared under
/// `entry` to `checker` alongside `catalog`. Fails fast: the first error
/// from any stage aborts the whole pipeline and no partial graph is
/// returned (§6, "Exit behavior").
pub fn compile(
    source: &str,
    entry: &str,
    catalog: &dyn SignatureCatalog,
    checker: &dyn TypeChecker,
) -> Result<TypedGraph, CompileError> {
    let program = parse(source)?;
    let graphs = lower_program(&program, catalog)?;
    let graph = graphs
        .get(entry)
        .ok_or_else(|| CompileError::UnknownEntry(entry.to_string()))?;
    checker
        .check(graph, catalog)
        .map_err(CompileError::TypeCheck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::NullChecker;
    use flowgraph_core::StaticCatalog;

    #[test]
    fn compiles_identity_through_the_null_checker() {
        let catalog = StaticCatalog::with_builtins();
        let typed = compile(
            "main() -> (x: Int) { output(x = x); }",
            "main",
            &catalog,
            &NullChecker,
        )
        .unwrap();
        assert!(typed.graph.op_node_ids().is_empty());
    }

    #[test]
    fn unknown_entry_is_reported() {
        let catalog = StaticCatalog::with_builtins();
        let err = compile(
            "main() -> (x: Int) { output(x = x); }",
            "missing",
            &catalog,
            &NullChecker,
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::UnknownEntry(name) if name == "missing"));
    }

    #[test]
    fn parse_errors_propagate_through_compile() {
        let catalog = StaticCatalog::with_builtins();
        let err = compile("main( -> (x: Int) { }", "main", &catalog, &NullChecker).unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
    }

    #[test]
    fn lowering_errors_propagate_through_compile() {
        let catalog = StaticCatalog::with_builtins();
        let err = compile(
            "main(x: Int) -> (y: Int) { q = frobnicate(x); output(y = q.value); }",
            "main",
            &catalog,
            &NullChecker,
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::Lower(_)));
    }
}
