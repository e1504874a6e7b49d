//! A hand-rolled recursive-descent parser: one method per grammar
//! production (§6). No parser-combinator or grammar-generator dependency,
//! matching the lexer.

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::lex;
use crate::span::Span;
use crate::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let tok = self.peek();
        ParseError::Unexpected {
            expected: expected.to_string(),
            found: tok.kind.clone(),
            span: tok.span,
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.peek().kind == kind {
            Ok(self.bump())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().kind == *kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                let span = self.bump().span;
                Ok(Ident::new(name, span))
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    // ---- top level ---------------------------------------------------

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut decls = Vec::new();
        while self.peek_kind() != &TokenKind::Eof {
            decls.push(self.parse_declaration()?);
        }
        Ok(Program { decls })
    }

    fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        if self.peek_kind() == &TokenKind::KwType {
            self.bump();
            let name = self.expect_ident()?;
            self.expect(TokenKind::Eq, "'='")?;
            let ty = self.parse_type_expr()?;
            self.expect(TokenKind::Semicolon, "';'")?;
            Ok(Declaration::TypeAlias(TypeAliasDecl { name, ty }))
        } else {
            Ok(Declaration::Func(self.parse_func_def()?))
        }
    }

    fn parse_func_def(&mut self) -> Result<FuncDef, ParseError> {
        let name = self.expect_ident()?;
        let inputs = self.parse_param_list()?;
        self.expect(TokenKind::Arrow, "'->'")?;
        let outputs = self.parse_param_list()?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut body = Vec::new();
        while self.peek_kind() != &TokenKind::RBrace {
            body.push(self.parse_instruction()?);
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(FuncDef {
            name,
            signature: Signature { inputs, outputs },
            body,
        })
    }

    fn parse_param_list(&mut self) -> Result<Vec<(Ident, TypeExpr)>, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        if self.peek_kind() != &TokenKind::RParen {
            loop {
                let name = self.expect_ident()?;
                self.expect(TokenKind::Colon, "':'")?;
                let ty = self.parse_type_expr()?;
                params.push((name, ty));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(params)
    }

    // ---- types ---------------------------------------------------------

    fn parse_type_expr(&mut self) -> Result<TypeExpr, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::TyInt => {
                self.bump();
                Ok(TypeExpr::Int)
            }
            TokenKind::TyBool => {
                self.bump();
                Ok(TypeExpr::Bool)
            }
            TokenKind::TyFloat => {
                self.bump();
                Ok(TypeExpr::Float)
            }
            TokenKind::TyStr => {
                self.bump();
                Ok(TypeExpr::Str)
            }
            TokenKind::TyPair => {
                self.bump();
                self.expect(TokenKind::LAngle, "'<'")?;
                let a = self.parse_type_expr()?;
                self.expect(TokenKind::Comma, "','")?;
                let b = self.parse_type_expr()?;
                self.expect(TokenKind::RAngle, "'>'")?;
                Ok(TypeExpr::Pair(Box::new(a), Box::new(b)))
            }
            TokenKind::TyVec => {
                self.bump();
                self.expect(TokenKind::LAngle, "'<'")?;
                let elem = self.parse_type_expr()?;
                self.expect(TokenKind::RAngle, "'>'")?;
                Ok(TypeExpr::Vec(Box::new(elem)))
            }
            TokenKind::TyMap => {
                self.bump();
                self.expect(TokenKind::LAngle, "'<'")?;
                let k = self.parse_type_expr()?;
                self.expect(TokenKind::Comma, "','")?;
                let v = self.parse_type_expr()?;
                self.expect(TokenKind::RAngle, "'>'")?;
                Ok(TypeExpr::Map(Box::new(k), Box::new(v)))
            }
            TokenKind::TyStruct => {
                self.bump();
                self.expect(TokenKind::LBrace, "'{'")?;
                let mut fields = Vec::new();
                if self.peek_kind() != &TokenKind::RBrace {
                    loop {
                        let name = self.expect_ident()?;
                        self.expect(TokenKind::Colon, "':'")?;
                        let ty = self.parse_type_expr()?;
                        fields.push((name, ty));
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RBrace, "'}'")?;
                Ok(TypeExpr::Struct(fields))
            }
            TokenKind::LParen => {
                let inputs = self.parse_param_list()?;
                self.expect(TokenKind::Arrow, "'->'")?;
                let outputs = self.parse_param_list()?;
                Ok(TypeExpr::Graph(Box::new(Signature { inputs, outputs })))
            }
            TokenKind::Ident(_) => {
                let name = self.expect_ident()?;
                Ok(TypeExpr::Alias(name))
            }
            _ => Err(self.unexpected("a type")),
        }
    }

    // ---- instructions ---------------------------------------------------

    fn parse_instruction(&mut self) -> Result<Instruction, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::KwConst => self.parse_const_decl(),
            TokenKind::KwOutput => self.parse_output_stmt(),
            TokenKind::Ident(_) => self.parse_ident_led_instruction(),
            _ => Err(self.unexpected("an instruction")),
        }
    }

    fn parse_const_decl(&mut self) -> Result<Instruction, ParseError> {
        self.bump(); // 'const'
        let name = self.expect_ident()?;
        self.expect(TokenKind::Eq, "'='")?;
        let value = self.parse_const_expr()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Instruction::ConstDecl { name, value })
    }

    fn parse_output_stmt(&mut self) -> Result<Instruction, ParseError> {
        let start = self.bump().span; // 'output'
        let args = self.parse_arg_list()?;
        let end = self.expect(TokenKind::Semicolon, "';'")?.span;
        Ok(Instruction::Output {
            args,
            span: start.to(end),
        })
    }

    /// Dispatches the three `ID ...` instruction forms: an edge declaration
    /// (`var.port -> var.port;`), or one of the three assignment forms
    /// (`var = call(...);` / `var = if ...` / `var = loop ...`).
    fn parse_ident_led_instruction(&mut self) -> Result<Instruction, ParseError> {
        let first = self.expect_ident()?;
        if self.peek_kind() == &TokenKind::Dot {
            let source = self.parse_port_ref_rest(first)?;
            self.expect(TokenKind::Arrow, "'->'")?;
            let target = self.parse_port_ref()?;
            self.expect(TokenKind::Semicolon, "';'")?;
            return Ok(Instruction::EdgeDecl { source, target });
        }

        self.expect(TokenKind::Eq, "'='")?;
        match self.peek_kind() {
            TokenKind::KwIf => self.parse_if_assign(first),
            TokenKind::KwLoop => self.parse_loop_assign(first),
            _ => {
                let call = self.parse_call_expr()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Instruction::CallAssign {
                    target: first,
                    call,
                })
            }
        }
    }

    fn parse_port_ref(&mut self) -> Result<PortRef, ParseError> {
        let var = self.expect_ident()?;
        self.parse_port_ref_rest(var)
    }

    fn parse_port_ref_rest(&mut self, var: Ident) -> Result<PortRef, ParseError> {
        self.expect(TokenKind::Dot, "'.'")?;
        let port = self.expect_ident()?;
        Ok(PortRef { var, port })
    }

    fn parse_if_assign(&mut self, target: Ident) -> Result<Instruction, ParseError> {
        self.bump(); // 'if'
        let cond = Box::new(self.parse_cond_outport()?);
        let inputs = self.parse_named_arg_list_parenthesized()?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let then_block = self.parse_instructions_until(&TokenKind::RBrace)?;
        self.expect(TokenKind::RBrace, "'}'")?;
        self.expect(TokenKind::KwElse, "'else'")?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let else_block = self.parse_instructions_until(&TokenKind::RBrace)?;
        self.expect(TokenKind::RBrace, "'}'")?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Instruction::IfAssign {
            target,
            cond,
            inputs,
            then_block,
            else_block,
        })
    }

    fn parse_loop_assign(&mut self, target: Ident) -> Result<Instruction, ParseError> {
        self.bump(); // 'loop'
        let inputs = self.parse_named_arg_list_parenthesized()?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let body = self.parse_instructions_until(&TokenKind::RBrace)?;
        self.expect(TokenKind::RBrace, "'}'")?;
        self.expect(TokenKind::KwWhile, "'while'")?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let cond = self.parse_instructions_until(&TokenKind::RBrace)?;
        self.expect(TokenKind::RBrace, "'}'")?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Instruction::LoopAssign {
            target,
            inputs,
            body,
            cond,
        })
    }

    fn parse_instructions_until(&mut self, end: &TokenKind) -> Result<Vec<Instruction>, ParseError> {
        let mut out = Vec::new();
        while self.peek_kind() != end {
            out.push(self.parse_instruction()?);
        }
        Ok(out)
    }

    fn parse_named_arg_list_parenthesized(&mut self) -> Result<Vec<(Ident, OutportExpr)>, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        if self.peek_kind() != &TokenKind::RParen {
            loop {
                let name = self.expect_ident()?;
                self.expect(TokenKind::Eq, "'='")?;
                let value = self.parse_outport_expr()?;
                args.push((name, value));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(args)
    }

    // ---- calls and arguments -------------------------------------------

    fn parse_call_expr(&mut self) -> Result<CallExpr, ParseError> {
        if self.peek_kind() == &TokenKind::Bang {
            let start = self.bump().span; // '!'
            let target = Box::new(self.parse_outport_primary()?);
            let args = self.parse_named_arg_list_parenthesized()?;
            let end = self.tokens[self.pos.saturating_sub(1)].span;
            return Ok(CallExpr::Thunk {
                target,
                args,
                span: start.to(end),
            });
        }

        let first = self.expect_ident()?;
        let start = first.span;
        let (namespace, name) = if self.eat(&TokenKind::ColonColon) {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };
        let args = self.parse_arg_list()?;
        let end = self.tokens[self.pos.saturating_sub(1)].span;
        Ok(CallExpr::Call {
            namespace,
            name,
            args,
            span: start.to(end),
        })
    }

    /// Parses a parenthesized argument list and rejects a call site that
    /// mixes named (`x = expr`) and positional (`expr`) arguments (§9).
    fn parse_arg_list(&mut self) -> Result<ArgList, ParseError> {
        let open = self.expect(TokenKind::LParen, "'('")?.span;
        if self.peek_kind() == &TokenKind::RParen {
            self.bump();
            return Ok(ArgList::Empty);
        }

        let is_named = matches!(self.peek_kind(), TokenKind::Ident(_))
            && matches!(self.tokens.get(self.pos + 1).map(|t| &t.kind), Some(TokenKind::Eq));

        let list = if is_named {
            let mut named = Vec::new();
            loop {
                let name = self.expect_ident()?;
                self.expect(TokenKind::Eq, "'='")?;
                let value = self.parse_outport_expr()?;
                named.push((name, value));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
                if self.looks_like_positional_arg() {
                    return Err(ParseError::MixedArgumentStyle {
                        span: open.to(self.peek().span),
                    });
                }
            }
            ArgList::Named(named)
        } else {
            let mut positional = Vec::new();
            loop {
                let value = self.parse_outport_expr()?;
                positional.push(value);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
                if self.looks_like_named_arg() {
                    return Err(ParseError::MixedArgumentStyle {
                        span: open.to(self.peek().span),
                    });
                }
            }
            ArgList::Positional(positional)
        };

        self.expect(TokenKind::RParen, "')'")?;
        Ok(list)
    }

    fn looks_like_named_arg(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Ident(_))
            && matches!(self.tokens.get(self.pos + 1).map(|t| &t.kind), Some(TokenKind::Eq))
    }

    fn looks_like_positional_arg(&self) -> bool {
        !matches!(self.peek_kind(), TokenKind::RParen) && !self.looks_like_named_arg()
    }

    // ---- outport expressions --------------------------------------------

    fn parse_outport_expr(&mut self) -> Result<OutportExpr, ParseError> {
        self.parse_outport_primary()
    }

    /// A restricted outport used only for an `if`'s condition: the `(named)`
    /// input list that immediately follows the condition in the grammar
    /// would otherwise be ambiguous with a call's own argument list, so a
    /// bare call form is not accepted here -- only a constant, a plain
    /// identifier, or a `var.port` reference.
    fn parse_cond_outport(&mut self) -> Result<OutportExpr, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Str(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::LBracket
            | TokenKind::LBrace => Ok(OutportExpr::Const(self.parse_const_expr()?)),
            TokenKind::Ident(_) => {
                let name = self.expect_ident()?;
                if self.peek_kind() == &TokenKind::Dot {
                    Ok(OutportExpr::PortRef(self.parse_port_ref_rest(name)?))
                } else {
                    Ok(OutportExpr::Ident(name))
                }
            }
            _ => Err(self.unexpected("an `if` condition")),
        }
    }

    fn parse_outport_primary(&mut self) -> Result<OutportExpr, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Str(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::LBracket
            | TokenKind::LBrace => Ok(OutportExpr::Const(self.parse_const_expr()?)),
            TokenKind::Bang => Ok(OutportExpr::Call(Box::new(self.parse_call_expr()?))),
            TokenKind::Ident(_) => {
                let name = self.expect_ident()?;
                if self.peek_kind() == &TokenKind::Dot {
                    Ok(OutportExpr::PortRef(self.parse_port_ref_rest(name)?))
                } else if self.peek_kind() == &TokenKind::LParen
                    || self.peek_kind() == &TokenKind::ColonColon
                {
                    let start = name.span;
                    let (namespace, call_name) = if self.eat(&TokenKind::ColonColon) {
                        (Some(name), self.expect_ident()?)
                    } else {
                        (None, name)
                    };
                    let args = self.parse_arg_list()?;
                    let end = self.tokens[self.pos.saturating_sub(1)].span;
                    Ok(OutportExpr::Call(Box::new(CallExpr::Call {
                        namespace,
                        name: call_name,
                        args,
                        span: start.to(end),
                    })))
                } else {
                    Ok(OutportExpr::Ident(name))
                }
            }
            _ => Err(self.unexpected("a value, call, or port reference")),
        }
    }

    // ---- constant expressions -------------------------------------------

    fn parse_const_expr(&mut self) -> Result<ConstExpr, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Int(n) => {
                let span = self.bump().span;
                Ok(ConstExpr::Int(n, span))
            }
            TokenKind::Float(n) => {
                let span = self.bump().span;
                Ok(ConstExpr::Float(n, span))
            }
            TokenKind::True => {
                let span = self.bump().span;
                Ok(ConstExpr::Bool(true, span))
            }
            TokenKind::False => {
                let span = self.bump().span;
                Ok(ConstExpr::Bool(false, span))
            }
            TokenKind::Str(s) => {
                let span = self.bump().span;
                Ok(ConstExpr::Str(s, span))
            }
            TokenKind::LBracket => {
                let start = self.bump().span;
                let mut items = Vec::new();
                if self.peek_kind() != &TokenKind::RBracket {
                    loop {
                        items.push(self.parse_const_expr()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                let end = self.expect(TokenKind::RBracket, "']'")?.span;
                Ok(ConstExpr::List(items, start.to(end)))
            }
            TokenKind::LBrace => {
                let span = self.parse_struct_literal_body()?;
                let (fields, span) = span;
                Ok(ConstExpr::Struct {
                    name: None,
                    fields,
                    span,
                })
            }
            TokenKind::Ident(_) => {
                let name = self.expect_ident()?;
                let start = name.span;
                let (fields, end_span) = self.parse_struct_literal_body()?;
                Ok(ConstExpr::Struct {
                    name: Some(name),
                    fields,
                    span: start.to(end_span),
                })
            }
            _ => Err(self.unexpected("a constant value")),
        }
    }

    fn parse_struct_literal_body(&mut self) -> Result<(Vec<(Ident, ConstExpr)>, Span), ParseError> {
        let start = self.expect(TokenKind::LBrace, "'{'")?.span;
        let mut fields = Vec::new();
        if self.peek_kind() != &TokenKind::RBrace {
            loop {
                let name = self.expect_ident()?;
                self.expect(TokenKind::Eq, "'='")?;
                let value = self.parse_const_expr()?;
                fields.push((name, value));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self.expect(TokenKind::RBrace, "'}'")?.span;
        Ok((fields, start.to(end)))
    }
}

/// Convenience wrapper: lex then parse, matching the other stages'
/// `fn(&str) -> Result<_, _>` shape.
pub fn parse(src: &str) -> Result<Program, ParseError> {
    let tokens = lex(src)?;
    Parser::new(tokens).parse_program()
}
