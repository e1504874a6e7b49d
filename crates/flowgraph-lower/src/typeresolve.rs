//! The type resolver (§4.3): translates source-level [`TypeExpr`] terms
//! into the graph IR's [`GraphType`] language.

use std::collections::HashMap;

use flowgraph_core::{GraphSignature, GraphType};
use flowgraph_syntax::TypeExpr;
use indexmap::IndexMap;

use crate::error::LowerError;

/// Hands out fresh, globally unique type-variable ids for inference
/// placeholders. One counter is shared across an entire compilation run so
/// no two placeholders are ever confused with each other.
#[derive(Debug, Default)]
pub struct TypeVarCounter(u32);

impl TypeVarCounter {
    pub fn new() -> Self {
        TypeVarCounter(0)
    }

    pub fn next(&mut self) -> u32 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

/// Resolves `ty` against `aliases`, allocating fresh type variables from
/// `counter` for any inference placeholder encountered.
pub fn resolve_type(
    ty: &TypeExpr,
    aliases: &HashMap<String, GraphType>,
    counter: &mut TypeVarCounter,
) -> Result<GraphType, LowerError> {
    Ok(match ty {
        TypeExpr::Int => GraphType::Int,
        TypeExpr::Bool => GraphType::Bool,
        TypeExpr::Float => GraphType::Float,
        TypeExpr::Str => GraphType::Str,
        TypeExpr::Pair(a, b) => GraphType::Pair(
            Box::new(resolve_type(a, aliases, counter)?),
            Box::new(resolve_type(b, aliases, counter)?),
        ),
        TypeExpr::Vec(elem) => GraphType::Vec(Box::new(resolve_type(elem, aliases, counter)?)),
        TypeExpr::Map(k, v) => GraphType::Map(
            Box::new(resolve_type(k, aliases, counter)?),
            Box::new(resolve_type(v, aliases, counter)?),
        ),
        TypeExpr::Struct(fields) => {
            let mut map = IndexMap::new();
            for (name, field_ty) in fields {
                map.insert(name.name.clone(), resolve_type(field_ty, aliases, counter)?);
            }
            GraphType::Struct(map)
        }
        TypeExpr::Graph(sig) => {
            let inputs = resolve_params(&sig.inputs, aliases, counter)?;
            let outputs = resolve_params(&sig.outputs, aliases, counter)?;
            GraphType::Graph(GraphSignature::new(inputs, outputs))
        }
        TypeExpr::Alias(name) => aliases.get(&name.name).cloned().ok_or_else(|| {
            LowerError::UnknownTypeAlias {
                name: name.name.clone(),
                span: name.span,
            }
        })?,
        TypeExpr::Infer => GraphType::Var(counter.next()),
    })
}

pub(crate) fn resolve_params(
    params: &[(flowgraph_syntax::Ident, TypeExpr)],
    aliases: &HashMap<String, GraphType>,
    counter: &mut TypeVarCounter,
) -> Result<IndexMap<String, GraphType>, LowerError> {
    let mut map = IndexMap::new();
    for (name, ty) in params {
        map.insert(name.name.clone(), resolve_type(ty, aliases, counter)?);
    }
    Ok(map)
}
