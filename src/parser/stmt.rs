use crate::{
    ast::{
        ast::Stmt,
        statements::{BlockStmt, ExpressionStmt, IfLetStmt, IfStmt, ReturnStmt, VarDeclStmt},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Span,
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.stmt_handler(parser.current_token_kind()) {
        return handler(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expression(ExpressionStmt {
        span: expr.get_span().clone(),
        expression: expr,
    }))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let variable_name = parser
        .expect_detailed(
            TokenKind::Identifier,
            "expected identifier during variable declaration",
        )?
        .value;

    let explicit_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let assigned_value = if parser.current_token_kind() != TokenKind::Semicolon {
        parser.expect(TokenKind::Assignment)?;
        Some(parse_expr(parser, BindingPower::Default)?)
    } else if explicit_type.is_none() {
        return Err(parser.unexpected_detailed("expected rhs or explicit type"));
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        span: Span {
            start,
            end: parser.previous_end(),
        },
        identifier: variable_name,
        assigned_value,
        explicit_type,
    }))
}

/// `if cond { } [else ...]` or `if let x = ptr { } [else ...]`
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let binding = if parser.current_token_kind() == TokenKind::Let {
        parser.advance();
        let name = parser
            .expect_detailed(TokenKind::Identifier, "expected binding name in `if let`")?
            .value;
        parser.expect(TokenKind::Assignment)?;
        Some(name)
    } else {
        None
    };

    let previous = parser.set_struct_init(false);
    let condition = parse_expr(parser, BindingPower::Default);
    parser.set_struct_init(previous);
    let condition = condition?;

    let then_body = parse_block(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        if parser.current_token_kind() == TokenKind::If {
            Some(Box::new(parse_if_stmt(parser)?))
        } else {
            Some(Box::new(Stmt::Block(parse_block(parser)?)))
        }
    } else {
        None
    };

    let span = Span {
        start,
        end: parser.previous_end(),
    };

    Ok(match binding {
        Some(binding) => Stmt::IfLet(IfLetStmt {
            binding,
            value: condition,
            then_body,
            else_body,
            span,
        }),
        None => Stmt::If(IfStmt {
            condition,
            then_body,
            else_body,
            span,
        }),
    })
}

pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser
        .expect_detailed(TokenKind::OpenCurly, "expected `{` to open a block")?
        .span
        .start;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected_detailed("unterminated block"));
        }
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        body: statements,
        id: parser.advance_id(),
        span: Span {
            start,
            end: parser.previous_end(),
        },
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}
