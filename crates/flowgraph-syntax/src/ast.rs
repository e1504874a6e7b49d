//! The abstract syntax tree. Produced once by the parser, consumed once by
//! the lowering visitor, then discarded (§3 "Lifecycles").

use crate::span::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub decls: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    TypeAlias(TypeAliasDecl),
    Func(FuncDef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub name: Ident,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub name: Ident,
    pub signature: Signature,
    pub body: Vec<Instruction>,
}

/// An ordered input or output parameter list. Order is semantically
/// significant (invariant 4 -- positional zipping and boundary port order).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub inputs: Vec<(Ident, TypeExpr)>,
    pub outputs: Vec<(Ident, TypeExpr)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Int,
    Bool,
    Float,
    Str,
    Pair(Box<TypeExpr>, Box<TypeExpr>),
    Vec(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
    Struct(Vec<(Ident, TypeExpr)>),
    Graph(Box<Signature>),
    Alias(Ident),
    /// Never produced directly by the parser from surface syntax -- the
    /// lowering visitor constructs this when building a synthetic signature
    /// for an `if`/`loop` sub-block input whose type is "left to inference"
    /// (§4.5).
    Infer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    ConstDecl {
        name: Ident,
        value: ConstExpr,
    },
    CallAssign {
        target: Ident,
        call: CallExpr,
    },
    IfAssign {
        target: Ident,
        cond: Box<OutportExpr>,
        inputs: Vec<(Ident, OutportExpr)>,
        then_block: Vec<Instruction>,
        else_block: Vec<Instruction>,
    },
    LoopAssign {
        target: Ident,
        inputs: Vec<(Ident, OutportExpr)>,
        body: Vec<Instruction>,
        cond: Vec<Instruction>,
    },
    EdgeDecl {
        source: PortRef,
        target: PortRef,
    },
    Output {
        args: ArgList,
        span: Span,
    },
}

/// `var.port` -- always resolved via `output_vars`, never a bare identifier
/// or inline constant (§9, resolution of the `EdgeDecl` grammar production).
#[derive(Debug, Clone, PartialEq)]
pub struct PortRef {
    pub var: Ident,
    pub port: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallExpr {
    Call {
        namespace: Option<Ident>,
        name: Ident,
        args: ArgList,
        span: Span,
    },
    /// `!expr(named args)`.
    Thunk {
        target: Box<OutportExpr>,
        args: Vec<(Ident, OutportExpr)>,
        span: Span,
    },
}

impl CallExpr {
    pub fn span(&self) -> Span {
        match self {
            CallExpr::Call { span, .. } => *span,
            CallExpr::Thunk { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgList {
    Named(Vec<(Ident, OutportExpr)>),
    Positional(Vec<OutportExpr>),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutportExpr {
    Const(ConstExpr),
    Call(Box<CallExpr>),
    Ident(Ident),
    PortRef(PortRef),
}

impl OutportExpr {
    pub fn span(&self) -> Span {
        match self {
            OutportExpr::Const(c) => c.span(),
            OutportExpr::Call(c) => c.span(),
            OutportExpr::Ident(i) => i.span,
            OutportExpr::PortRef(p) => p.var.span.to(p.port.span),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstExpr {
    Int(i64, Span),
    Float(f64, Span),
    Bool(bool, Span),
    Str(String, Span),
    List(Vec<ConstExpr>, Span),
    Struct {
        /// `None` for an anonymous struct literal (`{ x = 1 }`); `Some` for
        /// the rarely-used named form (`Point { x = 1 }`), kept only as a
        /// display hint -- no nominal identity is tracked (§9).
        name: Option<Ident>,
        fields: Vec<(Ident, ConstExpr)>,
        span: Span,
    },
}

impl ConstExpr {
    pub fn span(&self) -> Span {
        match self {
            ConstExpr::Int(_, s)
            | ConstExpr::Float(_, s)
            | ConstExpr::Bool(_, s)
            | ConstExpr::Str(_, s)
            | ConstExpr::List(_, s)
            | ConstExpr::Struct { span: s, .. } => *s,
        }
    }
}
