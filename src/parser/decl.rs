//! Top level declarations.

use crate::{
    ast::{
        ast::Decl,
        declarations::{ConstDecl, ExternDecl, FieldDecl, FnDecl, Parameter, StructDecl, TypedefDecl},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    expr::parse_expr, lookups::BindingPower, parser::Parser, stmt::parse_block, types::parse_type,
};

pub fn parse_decl(parser: &mut Parser) -> Result<Decl, Error> {
    match parser.decl_handler(parser.current_token_kind()) {
        Some(handler) => handler(parser),
        None => Err(parser.unexpected_detailed(
            "expected `let`, `struct`, `typedef`, `fn` or `extern` at top level",
        )),
    }
}

/// `let NAME: const T = value;`
pub fn parse_const_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let start = parser.advance().span.start.clone();

    let name = parser
        .expect_detailed(TokenKind::Identifier, "expected constant name")?
        .value;
    parser.expect(TokenKind::Colon)?;
    parser.expect_detailed(
        TokenKind::Const,
        "top level bindings must be declared `const`",
    )?;
    let const_type = parse_type(parser)?;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Decl::Const(ConstDecl {
        name,
        const_type,
        value,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_struct_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let start = parser.advance().span.start.clone();

    let name = parser
        .expect_detailed(TokenKind::Identifier, "expected struct name")?
        .value;

    parser.expect(TokenKind::OpenCurly)?;

    let mut fields = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        let field_token = parser.expect_detailed(TokenKind::Identifier, "expected field name")?;
        parser.expect(TokenKind::Colon)?;
        let field_type = parse_type(parser)?;

        fields.push(FieldDecl {
            name: field_token.value,
            field_type,
            span: Span {
                start: field_token.span.start,
                end: parser.previous_end(),
            },
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseCurly {
            return Err(parser.unexpected());
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Decl::Struct(StructDecl {
        name,
        fields,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

/// `typedef NAME = T;`
pub fn parse_typedef_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let start = parser.advance().span.start.clone();

    let name = parser
        .expect_detailed(TokenKind::Identifier, "expected typedef name")?
        .value;
    parser.expect(TokenKind::Assignment)?;
    let target = parse_type(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Decl::Typedef(TypedefDecl {
        name,
        target,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_fn_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let start = parser.advance().span.start.clone();

    let name = parser
        .expect_detailed(TokenKind::Identifier, "expected function name")?
        .value;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let parameter = parser.expect_detailed(TokenKind::Identifier, "expected parameter name")?;
        parser.expect(TokenKind::Colon)?;
        let param_type = parse_type(parser)?;

        parameters.push(Parameter {
            name: parameter.value,
            param_type,
            span: Span {
                start: parameter.span.start,
                end: parser.previous_end(),
            },
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected());
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let body = parse_block(parser)?;

    Ok(Decl::Function(FnDecl {
        name,
        parameters,
        return_type,
        body,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

/// `extern NAME: T;`
pub fn parse_extern_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let start = parser.advance().span.start.clone();

    let name = parser
        .expect_detailed(TokenKind::Identifier, "expected extern name")?
        .value;
    parser.expect(TokenKind::Colon)?;
    let element = parse_type(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Decl::Extern(ExternDecl {
        name,
        element,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}
