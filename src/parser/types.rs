//! Type expression parsing.
//!
//! Every type constructor is written in prefix position, so a type is a
//! single NUD lookup on its first token:
//!
//! - `int`, `Point` symbols
//! - `*T` owned pointers, `extern *T` extern pointers
//! - `&T` references
//! - `[T]` arrays, `[T; N]` fixed arrays
//! - `fn(A, B) -> R` function pointers

use std::collections::HashMap;

use crate::{
    ast::types::{
        ArrayType, FixedArrayType, FunctionType, PointerType, ReferenceType, SymbolType, TypeExpr,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    types::types::PointerKind,
};

use super::{expr::parse_expr, lookups::BindingPower, parser::Parser};

pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeExpr, Error>;

pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::Star, parse_pointer_type);
    parser.type_nud(TokenKind::Extern, parse_pointer_type);
    parser.type_nud(TokenKind::Ampersand, parse_reference_type);
    parser.type_nud(TokenKind::OpenBracket, parse_array_type);
    parser.type_nud(TokenKind::Fn, parse_function_type);
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let handler = parser
        .type_nud_handler(parser.current_token_kind())
        .ok_or_else(|| parser.unexpected_detailed("expected a type"))?;

    handler(parser)
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(TypeExpr::Symbol(SymbolType {
        name: token.value,
        position: token.span.start,
    }))
}

pub fn parse_pointer_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let start = parser.advance().clone();

    let kind = if start.kind == TokenKind::Extern {
        parser.expect_detailed(TokenKind::Star, "expected `*` after `extern`")?;
        PointerKind::Extern
    } else {
        PointerKind::Owned
    };

    Ok(TypeExpr::Pointer(PointerType {
        underlying: Box::new(parse_type(parser)?),
        kind,
        position: start.span.start,
    }))
}

pub fn parse_reference_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let position = parser.advance().span.start.clone();

    Ok(TypeExpr::Reference(ReferenceType {
        underlying: Box::new(parse_type(parser)?),
        position,
    }))
}

pub fn parse_array_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let position = parser.advance().span.start.clone();
    let underlying = Box::new(parse_type(parser)?);

    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        let length = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::CloseBracket)?;

        return Ok(TypeExpr::FixedArray(FixedArrayType {
            underlying,
            length: Box::new(length),
            position,
        }));
    }

    parser.expect(TokenKind::CloseBracket)?;
    Ok(TypeExpr::Array(ArrayType {
        underlying,
        position,
    }))
}

pub fn parse_function_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let position = parser.advance().span.start.clone();
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        parameters.push(parse_type(parser)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected());
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        Some(Box::new(parse_type(parser)?))
    } else {
        None
    };

    Ok(TypeExpr::Function(FunctionType {
        parameters,
        return_type,
        position,
    }))
}
