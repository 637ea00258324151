use crate::{
    ast::{
        ast::Expr,
        expressions::{
            ArrayInitExpr, AssignmentExpr, BinaryExpr, BinaryOperator, CallExpr, MemberExpr,
            NewExpr, NumberExpr, NumberLiteral, PrefixExpr, PrefixOperator, StringExpr,
            StructInitExpr, SymbolExpr, UnwrapExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let nud = parser
        .nud_handler(parser.current_token_kind())
        .ok_or_else(|| parser.unexpected())?;
    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let token_bp = parser.binding_power(token_kind);
        if token_bp <= bp {
            break;
        }

        let led = parser
            .led_handler(token_kind)
            .ok_or_else(|| parser.unexpected())?;
        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}

fn parse_number(value: &str) -> Option<NumberLiteral> {
    if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(NumberLiteral::Int);
    }

    if value.contains('.') {
        return value.parse().ok().map(NumberLiteral::Float);
    }

    value.parse().ok().map(NumberLiteral::Int)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    match token.kind {
        TokenKind::Number => match parse_number(&token.value) {
            Some(value) => Ok(Expr::Number(NumberExpr {
                value,
                span: token.span,
            })),
            None => Err(Error::new(
                ErrorImpl::NumberParseError { token: token.value },
                token.span.start,
            )),
        },
        TokenKind::Identifier => Ok(Expr::Symbol(SymbolExpr {
            value: token.value,
            span: token.span,
        })),
        TokenKind::String => Ok(Expr::String(StringExpr {
            value: token.value,
            span: token.span,
        })),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken { token: token.value },
            token.span.start,
        )),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = BinaryOperator::from_token_kind(operator_token.kind).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.value.clone(),
            },
            operator_token.span.start.clone(),
        )
    })?;

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone(),
        },
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Dash => PrefixOperator::Negate,
        TokenKind::Not => PrefixOperator::Not,
        _ => PrefixOperator::BitNot,
    };
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Prefix(PrefixExpr {
        span: Span {
            start: operator_token.span.start,
            end: rhs.get_span().end.clone(),
        },
        operator,
        right_expr: Box::new(rhs),
    }))
}

pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    // Right associative
    let rhs = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::Assignment(AssignmentExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: rhs.get_span().end.clone(),
        },
        assignee: Box::new(left),
        value: Box::new(rhs),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let previous = parser.set_struct_init(true);
    let expr = parse_expr(parser, BindingPower::Default);
    parser.set_struct_init(previous);
    let expr = expr?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Comma separated expressions up to `close`, which is consumed.
fn parse_expr_list(parser: &mut Parser, close: TokenKind) -> Result<Vec<Expr>, Error> {
    let previous = parser.set_struct_init(true);
    let mut items = vec![];

    let result = loop {
        if parser.current_token_kind() == close {
            break Ok(());
        }

        match parse_expr(parser, BindingPower::Default) {
            Ok(item) => items.push(item),
            Err(error) => break Err(error),
        }

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != close {
            break Err(parser.unexpected());
        }
    };

    parser.set_struct_init(previous);
    result?;
    parser.expect(close)?;

    Ok(items)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: parser.previous_end(),
        },
        callee: Box::new(left),
        arguments,
    }))
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let property = parser
        .expect_detailed(TokenKind::Identifier, "expected member name after `.`")?
        .value;

    Ok(Expr::Member(MemberExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: parser.previous_end(),
        },
        object: Box::new(left),
        property,
    }))
}

pub fn parse_struct_init_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    // Point { x: 1, y: 2 }
    let Expr::Symbol(SymbolExpr { value: name, span }) = left else {
        return Err(parser.unexpected_detailed("expected struct name before `{`"));
    };

    parser.advance();
    let previous = parser.set_struct_init(true);
    let fields = parse_struct_init_fields(parser);
    parser.set_struct_init(previous);
    let fields = fields?;

    Ok(Expr::StructInit(StructInitExpr {
        name,
        fields,
        span: Span {
            start: span.start,
            end: parser.previous_end(),
        },
    }))
}

fn parse_struct_init_fields(parser: &mut Parser) -> Result<Vec<(String, Expr)>, Error> {
    let mut fields = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly {
        let field_name = parser
            .expect_detailed(TokenKind::Identifier, "expected field name")?
            .value;
        parser.expect(TokenKind::Colon)?;
        let field_value = parse_expr(parser, BindingPower::Default)?;

        fields.push((field_name, field_value));

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseCurly {
            return Err(parser.unexpected());
        }
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(fields)
}

pub fn parse_array_init_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let elements = parse_expr_list(parser, TokenKind::CloseBracket)?;

    Ok(Expr::ArrayInit(ArrayInitExpr {
        elements,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_new_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let init = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::New(NewExpr {
        span: Span {
            start,
            end: init.get_span().end.clone(),
        },
        init: Box::new(init),
    }))
}

pub fn parse_unwrap_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let value = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unwrap(UnwrapExpr {
        span: Span {
            start,
            end: value.get_span().end.clone(),
        },
        value: Box::new(value),
    }))
}
