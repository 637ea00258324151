//! Parser state and entry points.
//!
//! The parser is a Pratt parser: every token kind may have a NUD (null
//! denotation) handler for prefix position, a LED (left denotation) handler
//! for infix position with a binding power, a statement handler and a top
//! level declaration handler. Type expressions have their own NUD table.

use std::{collections::HashMap, sync::Arc};

use crate::{
    ast::ast::{Decl, Expr},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    Position, Span,
};

use super::{
    decl::parse_decl,
    expr::parse_expr,
    lookups::{
        create_token_lookups, BPLookup, BindingPower, DeclHandler, DeclLookup, LEDHandler,
        LEDLookup, NUDHandler, NUDLookup, StmtHandler, StmtLookup,
    },
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    file: Arc<String>,
    decl_lookup: DeclLookup,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
    type_nud_lookup: TypeNUDLookup,
    /// Cleared while parsing `if` conditions, where `{` opens the body.
    allow_struct_init: bool,
    current_id: i32,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>, file: Arc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Arc::clone(&file)));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span {
                    start: end.clone(),
                    end,
                },
            });
        }

        Parser {
            tokens,
            pos: 0,
            file,
            decl_lookup: HashMap::new(),
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            allow_struct_init: true,
            current_id: 1024, // Give some space for reserved ids
        }
    }

    /// Returns the current token without advancing.
    ///
    /// The stream always ends in EOF and the parser never moves past it.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Kind of the token after the current one.
    pub fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map_or(TokenKind::EOF, |token| token.kind)
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> &Token {
        let current = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            return Err(error.unwrap_or_else(|| {
                Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )
            }));
        }

        Ok(self.advance().clone())
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Expects a token, failing with a message naming what was wanted.
    pub fn expect_detailed(&mut self, expected_kind: TokenKind, message: &str) -> Result<Token, Error> {
        let error = self.unexpected_detailed(message);
        self.expect_error(expected_kind, Some(error))
    }

    pub fn unexpected(&self) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: self.current_token().value.clone(),
            },
            self.get_position(),
        )
    }

    pub fn unexpected_detailed(&self, message: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.current_token().value.clone(),
                message: message.to_string(),
            },
            self.get_position(),
        )
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn decl_handler(&self, kind: TokenKind) -> Option<DeclHandler> {
        self.decl_lookup.get(&kind).copied()
    }

    pub fn stmt_handler(&self, kind: TokenKind) -> Option<StmtHandler> {
        self.stmt_lookup.get(&kind).copied()
    }

    pub fn nud_handler(&self, kind: TokenKind) -> Option<NUDHandler> {
        self.nud_lookup.get(&kind).copied()
    }

    pub fn led_handler(&self, kind: TokenKind) -> Option<LEDHandler> {
        self.led_lookup.get(&kind).copied()
    }

    pub fn type_nud_handler(&self, kind: TokenKind) -> Option<TypeNUDHandler> {
        self.type_nud_lookup.get(&kind).copied()
    }

    /// Binding power of `kind` in infix position.
    pub fn binding_power(&self, kind: TokenKind) -> BindingPower {
        if kind == TokenKind::OpenCurly && !self.allow_struct_init {
            return BindingPower::Default;
        }

        self.binding_power_lookup
            .get(&kind)
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    /// Sets whether `Name { ... }` parses as a struct initializer and
    /// returns the previous setting.
    pub fn set_struct_init(&mut self, allow: bool) -> bool {
        std::mem::replace(&mut self.allow_struct_init, allow)
    }

    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    pub fn decl(&mut self, kind: TokenKind, decl_fn: DeclHandler) {
        self.decl_lookup.insert(kind, decl_fn);
    }

    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Advances the internal ID counter and returns the previous value.
    pub fn advance_id(&mut self) -> i32 {
        let id = self.current_id;
        self.current_id += 1;
        id
    }

    /// Position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// End of the most recently consumed token.
    pub fn previous_end(&self) -> Position {
        match self.pos.checked_sub(1).and_then(|index| self.tokens.get(index)) {
            Some(token) => token.span.end.clone(),
            None => Position(0, Arc::clone(&self.file)),
        }
    }
}

fn new_parser(tokens: Vec<Token>, file: Arc<String>) -> Parser {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);
    parser
}

/// Parses a token stream into the ordered declarations of one unit.
pub fn parse(tokens: Vec<Token>, file: Arc<String>) -> Result<Vec<Decl>, Error> {
    let mut parser = new_parser(tokens, file);
    let mut declarations = vec![];

    while parser.has_tokens() {
        declarations.push(parse_decl(&mut parser)?);
    }

    Ok(declarations)
}

/// Tokenizes and parses a whole source file.
pub fn parse_source(source: &str, file: &str) -> Result<Vec<Decl>, Error> {
    let tokens = tokenize(source, Some(file.to_string()))?;
    parse(tokens, Arc::new(file.to_string()))
}

/// Parses a single expression, rejecting trailing tokens.
pub fn parse_expression(source: &str) -> Result<Expr, Error> {
    let tokens = tokenize(source, None)?;
    let mut parser = new_parser(tokens, Arc::new(String::from("shell")));

    let expr = parse_expr(&mut parser, BindingPower::Default)?;
    if parser.has_tokens() {
        return Err(parser.unexpected());
    }

    Ok(expr)
}
