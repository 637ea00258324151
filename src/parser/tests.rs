use pretty_assertions::assert_eq;

use crate::{
    ast::{
        ast::{Decl, Expr, Stmt},
        expressions::{BinaryOperator, NumberLiteral, PrefixOperator},
        types::TypeExpr,
    },
    types::types::PointerKind,
};

use super::parser::{parse_expression, parse_source};

fn parse_ok(source: &str) -> Vec<Decl> {
    parse_source(source, "test.cs").unwrap()
}

fn binary(expr: &Expr) -> (&Expr, BinaryOperator, &Expr) {
    match expr {
        Expr::Binary(binary) => (&binary.left, binary.operator, &binary.right),
        other => panic!("expected binary expression, found {:?}", other),
    }
}

fn int(expr: &Expr) -> u64 {
    match expr {
        Expr::Number(number) => match number.value {
            NumberLiteral::Int(value) => value,
            NumberLiteral::Float(_) => panic!("expected int literal"),
        },
        other => panic!("expected number, found {:?}", other),
    }
}

#[test]
fn test_parse_const_declaration() {
    let decls = parse_ok("let MAX: const uint = 0x10;");

    let Decl::Const(decl) = &decls[0] else {
        panic!("expected const");
    };
    assert_eq!(decl.name, "MAX");
    assert_eq!(decl.const_type.to_string(), "uint");
    assert_eq!(int(&decl.value), 16);
}

#[test]
fn test_top_level_let_requires_const() {
    let error = parse_source("let x: int = 1;", "test.cs").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_precedence_shift_below_additive() {
    // 5 + 2 >> 5 * 5  ==  (5 + 2) >> (5 * 5)
    let expr = parse_expression("5 + 2 >> 5 * 5").unwrap();

    let (left, operator, right) = binary(&expr);
    assert_eq!(operator, BinaryOperator::ShiftRight);
    assert_eq!(binary(left).1, BinaryOperator::Add);
    assert_eq!(binary(right).1, BinaryOperator::Multiply);
}

#[test]
fn test_precedence_multiplicative_over_additive() {
    let expr = parse_expression("5 + 2 * 3").unwrap();

    let (left, operator, right) = binary(&expr);
    assert_eq!(operator, BinaryOperator::Add);
    assert_eq!(int(left), 5);
    assert_eq!(binary(right).1, BinaryOperator::Multiply);
}

#[test]
fn test_binary_operators_are_left_associative() {
    let expr = parse_expression("10 - 3 - 2").unwrap();

    let (left, operator, right) = binary(&expr);
    assert_eq!(operator, BinaryOperator::Subtract);
    assert_eq!(binary(left).1, BinaryOperator::Subtract);
    assert_eq!(int(right), 2);
}

#[test]
fn test_bitwise_below_equality() {
    let expr = parse_expression("1 & 2 == 2 || 0").unwrap();

    let (left, operator, _) = binary(&expr);
    assert_eq!(operator, BinaryOperator::Or);
    let (_, inner, inner_right) = binary(left);
    assert_eq!(inner, BinaryOperator::BitAnd);
    assert_eq!(binary(inner_right).1, BinaryOperator::Equals);
}

#[test]
fn test_prefix_binds_tighter_than_binary() {
    let expr = parse_expression("-1 + ~2").unwrap();

    let (left, operator, right) = binary(&expr);
    assert_eq!(operator, BinaryOperator::Add);
    assert!(matches!(left, Expr::Prefix(prefix) if prefix.operator == PrefixOperator::Negate));
    assert!(matches!(right, Expr::Prefix(prefix) if prefix.operator == PrefixOperator::BitNot));
}

#[test]
fn test_grouping() {
    let expr = parse_expression("(1 + 2) * 3").unwrap();

    let (left, operator, _) = binary(&expr);
    assert_eq!(operator, BinaryOperator::Multiply);
    assert_eq!(binary(left).1, BinaryOperator::Add);
}

#[test]
fn test_float_and_string_literals() {
    assert!(matches!(
        parse_expression("2.5").unwrap(),
        Expr::Number(number) if number.value == NumberLiteral::Float(2.5)
    ));
    assert!(matches!(
        parse_expression("\"hi\"").unwrap(),
        Expr::String(string) if string.value == "hi"
    ));
}

#[test]
fn test_trailing_tokens_rejected() {
    assert!(parse_expression("1 2").is_err());
}

#[test]
fn test_parse_struct_with_all_type_forms() {
    let decls = parse_ok(
        "struct Node {
            value: int,
            next: *Node,
            handle: extern *Node,
            items: [u8],
            fixed: [int; 4],
            callback: fn(int, &Node) -> int,
        }",
    );

    let Decl::Struct(decl) = &decls[0] else {
        panic!("expected struct");
    };
    let spellings: Vec<String> = decl
        .fields
        .iter()
        .map(|field| format!("{}: {}", field.name, field.field_type))
        .collect();

    assert_eq!(
        spellings,
        vec![
            "value: int",
            "next: *Node",
            "handle: extern *Node",
            "items: [u8]",
            "fixed: [int; _]",
            "callback: fn(int, &Node) -> int",
        ]
    );

    let TypeExpr::Pointer(pointer) = &decl.fields[2].field_type else {
        panic!("expected pointer");
    };
    assert_eq!(pointer.kind, PointerKind::Extern);
}

#[test]
fn test_parse_typedef_and_extern() {
    let decls = parse_ok("typedef Handle = extern *int;\nextern stdout: int;");

    assert_eq!(decls.len(), 2);
    assert!(matches!(&decls[0], Decl::Typedef(decl) if decl.name == "Handle"));
    assert!(matches!(&decls[1], Decl::Extern(decl) if decl.name == "stdout"));
    assert_eq!(decls[1].name(), "stdout");
}

#[test]
fn test_parse_function_body() {
    let decls = parse_ok(
        "fn make(seed: int) -> *Point {
            let p: *Point = new Point { x: seed, y: 2 };
            if let r = p {
                r.x = 3;
            } else {
                return p;
            }
            return p;
        }",
    );

    let Decl::Function(decl) = &decls[0] else {
        panic!("expected function");
    };
    assert_eq!(decl.parameters.len(), 1);
    assert_eq!(decl.return_type.as_ref().map(|ty| ty.to_string()), Some("*Point".to_string()));
    assert_eq!(decl.body.body.len(), 3);

    let Stmt::VarDecl(var) = &decl.body.body[0] else {
        panic!("expected let");
    };
    let Some(Expr::New(new)) = &var.assigned_value else {
        panic!("expected new");
    };
    assert!(matches!(&*new.init, Expr::StructInit(init) if init.fields.len() == 2));

    let Stmt::IfLet(if_let) = &decl.body.body[1] else {
        panic!("expected if let");
    };
    assert_eq!(if_let.binding, "r");
    assert!(matches!(&if_let.value, Expr::Symbol(symbol) if symbol.value == "p"));
    assert!(if_let.else_body.is_some());
}

#[test]
fn test_if_condition_does_not_take_struct_init() {
    let decls = parse_ok("fn f(a: int) { if a { a = 1; } else if a == 2 { } }");

    let Decl::Function(decl) = &decls[0] else {
        panic!("expected function");
    };
    let Stmt::If(stmt) = &decl.body.body[0] else {
        panic!("expected if");
    };
    assert!(matches!(&stmt.condition, Expr::Symbol(_)));
    assert!(matches!(stmt.else_body.as_deref(), Some(Stmt::If(_))));
}

#[test]
fn test_unwrap_and_member_access() {
    let expr = parse_expression("unwrap node.next").unwrap();

    let Expr::Unwrap(unwrap) = expr else {
        panic!("expected unwrap");
    };
    assert!(matches!(&*unwrap.value, Expr::Member(member) if member.property == "next"));
}

#[test]
fn test_call_and_array_init() {
    let expr = parse_expression("sum([1, 2, 3], 4)").unwrap();

    let Expr::Call(call) = expr else {
        panic!("expected call");
    };
    assert_eq!(call.arguments.len(), 2);
    assert!(matches!(&call.arguments[0], Expr::ArrayInit(array) if array.elements.len() == 3));
}

#[test]
fn test_spans_point_at_source() {
    let decls = parse_ok("\n\nstruct A { x: int }");

    assert_eq!(decls[0].get_position().0, 2);
    assert_eq!(decls[0].get_span().end.0, 21);
}

#[test]
fn test_missing_semicolon() {
    let error = parse_source("typedef A = int", "test.cs").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_number_parse_error() {
    let error = parse_expression("99999999999999999999999").unwrap_err();

    assert_eq!(error.get_error_name(), "NumberParseError");
}
