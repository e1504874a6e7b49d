//! The lowering visitor (§4.5): walks a parsed [`Program`] and emits one
//! [`Graph`] per declared function.

use std::collections::HashMap;

use flowgraph_core::{
    ConstValue, CoreError, Graph, GraphSignature, GraphType, NodeId, NodeOp, SignatureCatalog,
    BUILTIN_NAMESPACE,
};
use flowgraph_syntax::{
    ArgList, CallExpr, ConstExpr, Declaration, FuncDef, Ident, Instruction, OutportExpr,
    PortRef, Program, Span,
};
use indexmap::IndexMap;

use crate::context::{CallBinding, Context};
use crate::error::LowerError;
use crate::typeresolve::{resolve_params, resolve_type, TypeVarCounter};

/// Lowers every declaration in `program` against `catalog`, returning one
/// [`Graph`] per declared function keyed by name, in declaration order.
/// Picking an entry point among the returned graphs is the caller's job
/// (§9) -- this visitor has no notion of "the" entry function.
pub fn lower_program(
    program: &Program,
    catalog: &dyn SignatureCatalog,
) -> Result<IndexMap<String, Graph>, LowerError> {
    let mut declared: HashMap<String, Span> = HashMap::new();
    let mut aliases: HashMap<String, GraphType> = HashMap::new();
    let mut counter = TypeVarCounter::new();
    let mut functions: HashMap<String, (Graph, GraphSignature)> = HashMap::new();
    let mut graphs = IndexMap::new();

    for decl in &program.decls {
        match decl {
            Declaration::TypeAlias(d) => {
                check_duplicate(&mut declared, &d.name)?;
                let ty = resolve_type(&d.ty, &aliases, &mut counter)?;
                aliases.insert(d.name.name.clone(), ty);
            }
            Declaration::Func(f) => {
                check_duplicate(&mut declared, &f.name)?;
                let (graph, sig) = lower_func_def(f, &aliases, &functions, catalog, &mut counter)?;
                functions.insert(f.name.name.clone(), (graph.clone(), sig));
                graphs.insert(f.name.name.clone(), graph);
            }
        }
    }
    Ok(graphs)
}

fn check_duplicate(declared: &mut HashMap<String, Span>, name: &Ident) -> Result<(), LowerError> {
    if let Some(&first_span) = declared.get(&name.name) {
        return Err(LowerError::DuplicateDeclaration {
            name: name.name.clone(),
            first_span,
            span: name.span,
        });
    }
    declared.insert(name.name.clone(), name.span);
    Ok(())
}

fn lower_func_def(
    f: &FuncDef,
    aliases: &HashMap<String, GraphType>,
    functions: &HashMap<String, (Graph, GraphSignature)>,
    catalog: &dyn SignatureCatalog,
    counter: &mut TypeVarCounter,
) -> Result<(Graph, GraphSignature), LowerError> {
    let inputs = resolve_params(&f.signature.inputs, aliases, counter)?;
    let outputs = resolve_params(&f.signature.outputs, aliases, counter)?;
    let sig = GraphSignature::new(inputs.clone(), outputs.clone());

    let mut ctx = Context::new(inputs);
    ctx.functions = functions.clone();
    ctx.aliases = aliases.clone();
    ctx.outputs = outputs;
    ctx.outputs_known = true;

    let mut graph = Graph::new();
    lower_block(&f.body, &mut graph, &mut ctx, catalog, counter)?;
    Ok((graph, sig))
}

/// Lowers a nested block (an `if` branch or a `loop` body/condition) into
/// its own fresh [`Graph`], returning the graph plus the ordered list of
/// output port names its `output` statement actually wired.
fn lower_subgraph(
    instructions: &[Instruction],
    mut ctx: Context,
    catalog: &dyn SignatureCatalog,
    counter: &mut TypeVarCounter,
) -> Result<(Graph, Vec<String>), LowerError> {
    let mut graph = Graph::new();
    let outputs = lower_block(instructions, &mut graph, &mut ctx, catalog, counter)?;
    Ok((graph, outputs))
}

/// Lowers a flat instruction list into `graph`, mutating `ctx` as names are
/// bound. Returns the ordered output-port list wired by this block's
/// `output` statement (empty if it has none).
fn lower_block(
    instructions: &[Instruction],
    graph: &mut Graph,
    ctx: &mut Context,
    catalog: &dyn SignatureCatalog,
    counter: &mut TypeVarCounter,
) -> Result<Vec<String>, LowerError> {
    let mut output_order = Vec::new();
    for inst in instructions {
        match inst {
            Instruction::ConstDecl { name, value } => {
                let node = lower_const_expr(value, graph);
                ctx.constants.insert(name.name.clone(), node);
            }
            Instruction::CallAssign { target, call } => {
                let (node, outputs) = lower_call(call, graph, ctx, catalog, counter)?;
                ctx.output_vars
                    .insert(target.name.clone(), CallBinding { node, outputs });
            }
            Instruction::IfAssign {
                target,
                cond,
                inputs,
                then_block,
                else_block,
            } => {
                lower_if(
                    target, cond, inputs, then_block, else_block, graph, ctx, catalog, counter,
                )?;
            }
            Instruction::LoopAssign {
                target,
                inputs,
                body,
                cond,
            } => {
                lower_loop(target, inputs, body, cond, graph, ctx, catalog, counter)?;
            }
            Instruction::EdgeDecl { source, target } => {
                let (src_node, src_port) = resolve_portref(source, ctx)?;
                let tgt_node = resolve_local_node(&target.var, ctx)?;
                let span = target.var.span.to(target.port.span);
                graph
                    .add_edge(src_node, src_port, tgt_node, target.port.name.clone())
                    .map_err(|e| lower_core_err(e, span))?;
            }
            Instruction::Output { args, span } => {
                let declared: Option<Vec<String>> = ctx
                    .outputs_known
                    .then(|| ctx.outputs.keys().cloned().collect());
                let bound = bind_args(
                    args,
                    declared.as_deref(),
                    graph.output_node(),
                    graph,
                    ctx,
                    catalog,
                    counter,
                    *span,
                )?;
                output_order = bound;
            }
        }
    }
    Ok(output_order)
}

/// Resolves an `OutportExpr` to its ordered list of `(node, port)` pairs
/// (§4.5, "Outport resolution"). Usually a single pair; a bare identifier
/// naming a multi-output call result expands to all of its declared
/// outputs, in signature order.
fn resolve_outport(
    expr: &OutportExpr,
    graph: &mut Graph,
    ctx: &mut Context,
    catalog: &dyn SignatureCatalog,
    counter: &mut TypeVarCounter,
) -> Result<Vec<(NodeId, String)>, LowerError> {
    match expr {
        OutportExpr::Const(c) => {
            let node = lower_const_expr(c, graph);
            Ok(vec![(node, "value".to_string())])
        }
        OutportExpr::Call(call) => {
            let (node, outputs) = lower_call(call, graph, ctx, catalog, counter)?;
            Ok(outputs.into_iter().map(|p| (node, p)).collect())
        }
        OutportExpr::PortRef(pr) => Ok(vec![resolve_portref(pr, ctx)?]),
        OutportExpr::Ident(id) => {
            if ctx.inputs.contains_key(&id.name) {
                return Ok(vec![(graph.input_node(), id.name.clone())]);
            }
            if let Some(binding) = ctx.output_vars.get(&id.name) {
                return Ok(binding
                    .outputs
                    .iter()
                    .map(|p| (binding.node, p.clone()))
                    .collect());
            }
            if let Some((callee_graph, _sig)) = ctx.functions.get(&id.name).cloned() {
                let node = graph.add_node(NodeOp::Const {
                    value: ConstValue::Graph(Box::new(callee_graph)),
                });
                return Ok(vec![(node, "value".to_string())]);
            }
            if let Some(&node) = ctx.constants.get(&id.name) {
                return Ok(vec![(node, "value".to_string())]);
            }
            Err(LowerError::NameNotInScope {
                name: id.name.clone(),
                span: id.span,
            })
        }
    }
}

/// Resolves an explicit `var.port` reference against `output_vars` only --
/// never against constants or declared input ports, which are both always
/// referenced bare (§4.5).
fn resolve_portref(pr: &PortRef, ctx: &Context) -> Result<(NodeId, String), LowerError> {
    if let Some(binding) = ctx.output_vars.get(&pr.var.name) {
        if binding.outputs.iter().any(|p| p == &pr.port.name) {
            return Ok((binding.node, pr.port.name.clone()));
        }
        return Err(LowerError::PortNotFound {
            var: pr.var.name.clone(),
            port: pr.port.name.clone(),
            span: pr.var.span.to(pr.port.span),
        });
    }
    Err(LowerError::NameNotInScope {
        name: pr.var.name.clone(),
        span: pr.var.span,
    })
}

/// Resolves the bound node behind a local name, for use as the *sink* side
/// of an explicit `EdgeDecl` (the target port's name is not validated here
/// -- it names an input port on an arbitrary node, which this front-end
/// does not enumerate).
fn resolve_local_node(name: &Ident, ctx: &Context) -> Result<NodeId, LowerError> {
    if let Some(binding) = ctx.output_vars.get(&name.name) {
        return Ok(binding.node);
    }
    if let Some(&node) = ctx.constants.get(&name.name) {
        return Ok(node);
    }
    Err(LowerError::NameNotInScope {
        name: name.name.clone(),
        span: name.span,
    })
}

/// Binds a call site's (or an `output` statement's) argument list onto
/// `sink_node`'s named ports (§4.5, "Argument binding").
///
/// `declared_order` is the callee's declared input order, or the enclosing
/// function's declared output order for an `output` statement. `None`
/// means there is no predeclared order to validate against at all (a
/// nested `if`/`loop` block's `output` statement, or a thunk's forwarded
/// named inputs) -- named arguments are then accepted under whatever name
/// they give, and the bound names (in the order written) are returned.
/// `Some(&[])` is different: it means the callee genuinely declares zero
/// ports, so any named argument is rejected with `UnknownPort`.
fn bind_args(
    args: &ArgList,
    declared_order: Option<&[String]>,
    sink_node: NodeId,
    graph: &mut Graph,
    ctx: &mut Context,
    catalog: &dyn SignatureCatalog,
    counter: &mut TypeVarCounter,
    call_span: Span,
) -> Result<Vec<String>, LowerError> {
    match args {
        ArgList::Empty => Ok(declared_order.map(<[String]>::to_vec).unwrap_or_default()),
        ArgList::Positional(exprs) => {
            let declared = declared_order.unwrap_or(&[]);
            if declared.is_empty() {
                if exprs.is_empty() {
                    return Ok(Vec::new());
                }
                return Err(LowerError::ArityMismatch {
                    expected: 0,
                    found: exprs.len(),
                    span: call_span,
                });
            }
            let mut pairs = Vec::new();
            for e in exprs {
                pairs.extend(resolve_outport(e, graph, ctx, catalog, counter)?);
            }
            if pairs.len() != declared.len() {
                return Err(LowerError::ArityMismatch {
                    expected: declared.len(),
                    found: pairs.len(),
                    span: call_span,
                });
            }
            for (port_name, (src_node, src_port)) in declared.iter().zip(pairs) {
                graph
                    .add_edge(src_node, src_port, sink_node, port_name.clone())
                    .map_err(|e| lower_core_err(e, call_span))?;
            }
            Ok(declared.to_vec())
        }
        ArgList::Named(pairs) => {
            let mut bound_order = Vec::new();
            for (name, expr) in pairs {
                if let Some(declared) = declared_order {
                    if !declared.iter().any(|p| p == &name.name) {
                        return Err(LowerError::UnknownPort {
                            port: name.name.clone(),
                            span: name.span,
                        });
                    }
                }
                let resolved = resolve_outport(expr, graph, ctx, catalog, counter)?;
                let (src_node, src_port) = resolved
                    .into_iter()
                    .next()
                    .expect("outport resolution always yields at least one pair");
                graph
                    .add_edge(src_node, src_port, sink_node, name.name.clone())
                    .map_err(|e| lower_core_err(e, name.span))?;
                bound_order.push(name.name.clone());
            }
            Ok(match declared_order {
                Some(declared) => declared.to_vec(),
                None => bound_order,
            })
        }
    }
}

/// Lowers a call or thunk expression, returning the node it produced and
/// its ordered output port names.
fn lower_call(
    call: &CallExpr,
    graph: &mut Graph,
    ctx: &mut Context,
    catalog: &dyn SignatureCatalog,
    counter: &mut TypeVarCounter,
) -> Result<(NodeId, Vec<String>), LowerError> {
    match call {
        CallExpr::Call {
            namespace,
            name,
            args,
            span,
        } => {
            let ns = namespace
                .as_ref()
                .map(|n| n.name.as_str())
                .unwrap_or(BUILTIN_NAMESPACE);
            if let Some(entry) = catalog.lookup(ns, &name.name) {
                let inputs = entry.inputs.clone();
                let outputs = entry.outputs.clone();
                let node = graph.add_node(NodeOp::Call {
                    name: entry.canonical_name.clone(),
                });
                bind_args(args, Some(&inputs), node, graph, ctx, catalog, counter, *span)?;
                Ok((node, outputs))
            } else if namespace.is_none() {
                if let Some((callee_graph, callee_sig)) = ctx.functions.get(&name.name).cloned() {
                    let input_order = callee_sig.input_order();
                    let output_order = callee_sig.output_order();
                    let node = graph.add_node(NodeOp::Boxed {
                        name: name.name.clone(),
                        graph: Box::new(callee_graph),
                    });
                    bind_args(
                        args,
                        Some(&input_order),
                        node,
                        graph,
                        ctx,
                        catalog,
                        counter,
                        *span,
                    )?;
                    Ok((node, output_order))
                } else {
                    Err(LowerError::UnknownFunction {
                        name: name.name.clone(),
                        span: *span,
                    })
                }
            } else {
                Err(LowerError::UnknownFunction {
                    name: name.name.clone(),
                    span: *span,
                })
            }
        }
        CallExpr::Thunk { target, args, span } => {
            let outputs = outputs_of_graph_valued(target, ctx);
            let target_pairs = resolve_outport(target, graph, ctx, catalog, counter)?;
            let (thunk_node, thunk_port) = target_pairs
                .into_iter()
                .next()
                .expect("outport resolution always yields at least one pair");
            let node = graph.add_node(NodeOp::Call {
                name: "builtin/eval".to_string(),
            });
            graph
                .add_edge(thunk_node, thunk_port, node, "thunk")
                .map_err(|e| lower_core_err(e, *span))?;
            let named = ArgList::Named(args.clone());
            bind_args(&named, None, node, graph, ctx, catalog, counter, *span)?;
            Ok((node, outputs))
        }
    }
}

/// Recovers a thunk target's declared output port names when statically
/// known -- a reference to a locally declared function, or to a parameter
/// explicitly typed as a graph signature. Any other graph-valued
/// expression (e.g. a port reference into an opaque upstream binding)
/// yields no statically known output names; a later `.port` access on the
/// resulting binding then fails with `PortNotFound`, deferring the real
/// answer to the downstream type checker.
fn outputs_of_graph_valued(expr: &OutportExpr, ctx: &Context) -> Vec<String> {
    if let OutportExpr::Ident(id) = expr {
        if let Some((_, sig)) = ctx.functions.get(&id.name) {
            return sig.output_order();
        }
        if let Some(GraphType::Graph(sig)) = ctx.inputs.get(&id.name) {
            return sig.output_order();
        }
    }
    Vec::new()
}

fn lower_const_expr(c: &ConstExpr, graph: &mut Graph) -> NodeId {
    let value = const_value_of(c);
    graph.add_node(NodeOp::Const { value })
}

fn const_value_of(c: &ConstExpr) -> ConstValue {
    match c {
        ConstExpr::Int(n, _) => ConstValue::Int(*n),
        ConstExpr::Float(n, _) => ConstValue::Float(*n),
        ConstExpr::Bool(b, _) => ConstValue::Bool(*b),
        ConstExpr::Str(s, _) => ConstValue::Str(s.clone()),
        ConstExpr::List(items, _) => ConstValue::List(items.iter().map(const_value_of).collect()),
        ConstExpr::Struct { fields, .. } => {
            let mut map = IndexMap::new();
            for (name, val) in fields {
                map.insert(name.name.clone(), const_value_of(val));
            }
            ConstValue::Struct(map)
        }
    }
}

fn lower_core_err(e: CoreError, span: Span) -> LowerError {
    match e {
        CoreError::PortDoubleWired { node, port } => LowerError::PortDoubleWired { node, port, span },
        // `add_edge` never produces `NodeNotFound` for ids this visitor
        // mints itself; kept only so the match stays exhaustive.
        CoreError::NodeNotFound(node) => LowerError::PortDoubleWired {
            node,
            port: String::new(),
            span,
        },
    }
}

fn lower_if(
    target: &Ident,
    cond: &OutportExpr,
    inputs: &[(Ident, OutportExpr)],
    then_block: &[Instruction],
    else_block: &[Instruction],
    graph: &mut Graph,
    ctx: &mut Context,
    catalog: &dyn SignatureCatalog,
    counter: &mut TypeVarCounter,
) -> Result<(), LowerError> {
    let cond_pairs = resolve_outport(cond, graph, ctx, catalog, counter)?;
    let (cond_node, cond_port) = cond_pairs
        .into_iter()
        .next()
        .expect("outport resolution always yields at least one pair");

    let mut resolved_inputs = Vec::new();
    for (name, expr) in inputs {
        let pairs = resolve_outport(expr, graph, ctx, catalog, counter)?;
        let (n, p) = pairs
            .into_iter()
            .next()
            .expect("outport resolution always yields at least one pair");
        resolved_inputs.push((name.name.clone(), n, p));
    }

    let mut sub_inputs = IndexMap::new();
    for (name, _, _) in &resolved_inputs {
        sub_inputs.insert(name.clone(), GraphType::Var(counter.next()));
    }

    let then_ctx = ctx.child(sub_inputs.clone());
    let else_ctx = ctx.child(sub_inputs);
    let (then_graph, then_outputs) = lower_subgraph(then_block, then_ctx, catalog, counter)?;
    let (else_graph, else_outputs) = lower_subgraph(else_block, else_ctx, catalog, counter)?;

    let mut union_outputs = then_outputs.clone();
    for name in &else_outputs {
        if !union_outputs.contains(name) {
            union_outputs.push(name.clone());
        }
    }

    let then_const = graph.add_node(NodeOp::Const {
        value: ConstValue::Graph(Box::new(then_graph)),
    });
    let else_const = graph.add_node(NodeOp::Const {
        value: ConstValue::Graph(Box::new(else_graph)),
    });
    let switch_node = graph.add_node(NodeOp::Call {
        name: "builtin/switch".to_string(),
    });
    let span = target.span;
    graph
        .add_edge(cond_node, cond_port, switch_node, "pred")
        .map_err(|e| lower_core_err(e, span))?;
    graph
        .add_edge(then_const, "value", switch_node, "if_true")
        .map_err(|e| lower_core_err(e, span))?;
    graph
        .add_edge(else_const, "value", switch_node, "if_false")
        .map_err(|e| lower_core_err(e, span))?;

    let eval_node = graph.add_node(NodeOp::Call {
        name: "builtin/eval".to_string(),
    });
    graph
        .add_edge(switch_node, "value", eval_node, "thunk")
        .map_err(|e| lower_core_err(e, span))?;
    for (name, n, p) in resolved_inputs {
        graph
            .add_edge(n, p, eval_node, name)
            .map_err(|e| lower_core_err(e, span))?;
    }

    ctx.output_vars.insert(
        target.name.clone(),
        CallBinding {
            node: eval_node,
            outputs: union_outputs,
        },
    );
    Ok(())
}

fn lower_loop(
    target: &Ident,
    inputs: &[(Ident, OutportExpr)],
    body: &[Instruction],
    cond: &[Instruction],
    graph: &mut Graph,
    ctx: &mut Context,
    catalog: &dyn SignatureCatalog,
    counter: &mut TypeVarCounter,
) -> Result<(), LowerError> {
    let mut resolved_inputs = Vec::new();
    for (name, expr) in inputs {
        let pairs = resolve_outport(expr, graph, ctx, catalog, counter)?;
        let (n, p) = pairs
            .into_iter()
            .next()
            .expect("outport resolution always yields at least one pair");
        resolved_inputs.push((name.name.clone(), n, p));
    }

    let mut sub_inputs = IndexMap::new();
    for (name, _, _) in &resolved_inputs {
        sub_inputs.insert(name.clone(), GraphType::Var(counter.next()));
    }

    let body_ctx = ctx.child(sub_inputs.clone());
    let cond_ctx = ctx.child(sub_inputs);
    let (body_graph, body_outputs) = lower_subgraph(body, body_ctx, catalog, counter)?;
    let (cond_graph, _cond_outputs) = lower_subgraph(cond, cond_ctx, catalog, counter)?;

    let body_const = graph.add_node(NodeOp::Const {
        value: ConstValue::Graph(Box::new(body_graph)),
    });
    let cond_const = graph.add_node(NodeOp::Const {
        value: ConstValue::Graph(Box::new(cond_graph)),
    });
    let loop_node = graph.add_node(NodeOp::Call {
        name: "builtin/loop".to_string(),
    });
    let span = target.span;
    graph
        .add_edge(cond_const, "value", loop_node, "condition")
        .map_err(|e| lower_core_err(e, span))?;
    graph
        .add_edge(body_const, "value", loop_node, "body")
        .map_err(|e| lower_core_err(e, span))?;
    for (name, n, p) in resolved_inputs {
        graph
            .add_edge(n, p, loop_node, name)
            .map_err(|e| lower_core_err(e, span))?;
    }

    ctx.output_vars.insert(
        target.name.clone(),
        CallBinding {
            node: loop_node,
            outputs: body_outputs,
        },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgraph_core::{FunctionEntry, StaticCatalog};
    use flowgraph_syntax::parse;

    fn arith_catalog() -> StaticCatalog {
        let mut cat = StaticCatalog::with_builtins();
        cat.register(
            BUILTIN_NAMESPACE,
            FunctionEntry::new("builtin/iadd", vec!["a", "b"], vec!["c"]),
        );
        cat.register(
            BUILTIN_NAMESPACE,
            FunctionEntry::new("builtin/ilt", vec!["a", "b"], vec!["c"]),
        );
        cat
    }

    #[test]
    fn identity_produces_zero_op_nodes_and_one_boundary_edge() {
        let prog = parse("main() -> (x: Int) { output(x = x); }").unwrap();
        let cat = StaticCatalog::with_builtins();
        let graphs = lower_program(&prog, &cat).unwrap();
        let g = &graphs["main"];
        assert!(g.op_node_ids().is_empty());
        assert_eq!(
            g.edges(),
            vec![(g.input_node(), "x".to_string(), g.output_node(), "x".to_string())]
        );
    }

    #[test]
    fn add_emits_one_node_and_three_edges() {
        let prog = parse(
            "main(a: Int, b: Int) -> (r: Int) { s = iadd(a = a, b = b); output(r = s.c); }",
        )
        .unwrap();
        let cat = arith_catalog();
        let graphs = lower_program(&prog, &cat).unwrap();
        let g = &graphs["main"];
        assert_eq!(g.op_node_ids().len(), 1);
        let n = g.op_node_ids()[0];
        assert_eq!(g.edges().len(), 3);
        assert!(g.edges().contains(&(g.input_node(), "a".into(), n, "a".into())));
        assert!(g.edges().contains(&(g.input_node(), "b".into(), n, "b".into())));
        assert!(g.edges().contains(&(n, "c".into(), g.output_node(), "r".into())));
    }

    #[test]
    fn positional_call_matches_named_call() {
        let named = parse(
            "main(a: Int, b: Int) -> (r: Int) { s = iadd(a = a, b = b); output(r = s.c); }",
        )
        .unwrap();
        let positional = parse(
            "main(a: Int, b: Int) -> (r: Int) { s = iadd(a, b); output(r = s.c); }",
        )
        .unwrap();
        let cat = arith_catalog();
        let g_named = &lower_program(&named, &cat).unwrap()["main"];
        let g_positional = &lower_program(&positional, &cat).unwrap()["main"];
        assert_eq!(g_named, g_positional);
    }

    #[test]
    fn conditional_wires_switch_and_eval() {
        let src = "main(p: Bool) -> (v: Int) { \
            r = if p () { output(v = 1); } else { output(v = 2); }; \
            output(v = r.v); \
        }";
        let prog = parse(src).unwrap();
        let cat = StaticCatalog::with_builtins();
        let graphs = lower_program(&prog, &cat).unwrap();
        let g = &graphs["main"];
        let names: Vec<String> = g
            .op_node_ids()
            .iter()
            .filter_map(|id| match &g.node(*id).unwrap().op {
                NodeOp::Call { name } => Some(name.clone()),
                _ => None,
            })
            .collect();
        assert!(names.contains(&"builtin/switch".to_string()));
        assert!(names.contains(&"builtin/eval".to_string()));
        let const_count = g
            .op_node_ids()
            .iter()
            .filter(|id| matches!(g.node(**id).unwrap().op, NodeOp::Const { .. }))
            .count();
        assert_eq!(const_count, 2);
    }

    #[test]
    fn loop_wires_a_single_loop_node() {
        let src = "main(x: Int) -> (r: Int) { \
            r = loop (x = x) { y = iadd(x, 1); output(x = y.c); } \
                while { c = ilt(x, 10); output(pred = c.c); }; \
            output(r = r.x); \
        }";
        let prog = parse(src).unwrap();
        let cat = arith_catalog();
        let graphs = lower_program(&prog, &cat).unwrap();
        let g = &graphs["main"];
        let loop_nodes: Vec<NodeId> = g
            .op_node_ids()
            .iter()
            .copied()
            .filter(|id| {
                matches!(&g.node(*id).unwrap().op, NodeOp::Call { name } if name == "builtin/loop")
            })
            .collect();
        assert_eq!(loop_nodes.len(), 1);
    }

    #[test]
    fn unknown_function_is_rejected() {
        let prog = parse("main(x: Int) -> (y: Int) { q = frobnicate(x); output(y = q.value); }")
            .unwrap();
        let cat = StaticCatalog::with_builtins();
        let err = lower_program(&prog, &cat).unwrap_err();
        assert!(matches!(err, LowerError::UnknownFunction { name, .. } if name == "frobnicate"));
    }

    #[test]
    fn struct_and_list_constants_preserve_order() {
        let prog = parse(
            "main() -> (y: Int) { \
                const p = { x = 1, y = 2 }; \
                const xs = [1, 2, 3]; \
                output(y = p.value); \
            }",
        )
        .unwrap();
        let cat = StaticCatalog::with_builtins();
        let graphs = lower_program(&prog, &cat).unwrap();
        let g = &graphs["main"];
        let consts: Vec<&ConstValue> = g
            .op_node_ids()
            .iter()
            .filter_map(|id| match &g.node(*id).unwrap().op {
                NodeOp::Const { value } => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(consts.len(), 2);
        assert!(matches!(consts[0], ConstValue::Struct(_)));
        assert!(matches!(consts[1], ConstValue::List(_)));
    }

    #[test]
    fn duplicate_function_declaration_is_rejected() {
        let prog = parse(
            "f() -> (x: Int) { output(x = 1); } f() -> (x: Int) { output(x = 2); }",
        )
        .unwrap();
        let cat = StaticCatalog::with_builtins();
        let err = lower_program(&prog, &cat).unwrap_err();
        assert!(matches!(err, LowerError::DuplicateDeclaration { name, .. } if name == "f"));
    }

    #[test]
    fn duplicate_alias_and_function_name_is_rejected() {
        let prog = parse("type f = Int; f() -> (x: Int) { output(x = 1); }").unwrap();
        let cat = StaticCatalog::with_builtins();
        let err = lower_program(&prog, &cat).unwrap_err();
        assert!(matches!(err, LowerError::DuplicateDeclaration { .. }));
    }

    #[test]
    fn explicit_edge_decl_double_wires_a_port() {
        let src = "main(a: Int, b: Int) -> (r: Int) { \
            s = iadd(a = a, b = b); \
            t = iadd(a = a, b = b); \
            t.c -> s.a; \
            output(r = s.c); \
        }";
        let prog = parse(src).unwrap();
        let cat = arith_catalog();
        let err = lower_program(&prog, &cat).unwrap_err();
        assert!(matches!(err, LowerError::PortDoubleWired { .. }));
    }

    #[test]
    fn local_function_call_emits_a_boxed_node() {
        let src = "helper(x: Int) -> (y: Int) { output(y = x); } \
                   main(x: Int) -> (y: Int) { r = helper(x = x); output(y = r.y); }";
        let prog = parse(src).unwrap();
        let cat = StaticCatalog::with_builtins();
        let graphs = lower_program(&prog, &cat).unwrap();
        let g = &graphs["main"];
        let boxed = g
            .op_node_ids()
            .iter()
            .any(|id| matches!(&g.node(*id).unwrap().op, NodeOp::Boxed { name, .. } if name == "helper"));
        assert!(boxed);
    }

    #[test]
    fn lowering_is_deterministic() {
        let src = "main(a: Int, b: Int) -> (r: Int) { s = iadd(a, b); output(r = s.c); }";
        let prog = parse(src).unwrap();
        let cat = arith_catalog();
        let g1 = lower_program(&prog, &cat).unwrap();
        let g2 = lower_program(&prog, &cat).unwrap();
        assert_eq!(g1["main"], g2["main"]);
    }

    #[test]
    fn named_argument_to_a_zero_input_callee_is_rejected() {
        let src = "helper() -> (y: Int) { output(y = 1); } \
                   main() -> (z: Int) { r = helper(bogus = 1); output(z = r.y); }";
        let prog = parse(src).unwrap();
        let cat = StaticCatalog::with_builtins();
        let err = lower_program(&prog, &cat).unwrap_err();
        assert!(matches!(err, LowerError::UnknownPort { port, .. } if port == "bogus"));
    }

    #[test]
    fn named_argument_to_a_zero_output_declaration_is_rejected() {
        let src = "main() -> () { output(bogus = 1); }";
        let prog = parse(src).unwrap();
        let cat = StaticCatalog::with_builtins();
        let err = lower_program(&prog, &cat).unwrap_err();
        assert!(matches!(err, LowerError::UnknownPort { port, .. } if port == "bogus"));
    }

    #[test]
    fn dotted_reference_to_a_constant_is_not_in_scope() {
        let src = "main() -> (x: Int) { const c = 1; output(x = c.value); }";
        let prog = parse(src).unwrap();
        let cat = StaticCatalog::with_builtins();
        let err = lower_program(&prog, &cat).unwrap_err();
        assert!(matches!(err, LowerError::NameNotInScope { name, .. } if name == "c"));
    }
}
