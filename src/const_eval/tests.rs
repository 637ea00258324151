use pretty_assertions::assert_eq;

use crate::{
    errors::errors::ErrorKind,
    parser::parser::parse_expression,
    types::types::{IntWidth, Primitive},
};

use super::{
    evaluator::evaluate,
    value::{ConstEnv, ConstValue},
};

fn eval_in(source: &str, expected: Primitive, env: &ConstEnv) -> Result<ConstValue, ErrorKind> {
    let expr = parse_expression(source).unwrap();
    evaluate(&expr, expected, env).map_err(|error| error.kind())
}

fn eval(source: &str, expected: Primitive) -> Result<ConstValue, ErrorKind> {
    eval_in(source, expected, &ConstEnv::new())
}

#[test]
fn test_shift_binds_looser_than_arithmetic() {
    // (5 + 2) >> (5 * 5) == 7 >> 25
    assert_eq!(eval("5 + 2 >> 5 * 5", Primitive::UINT), Ok(ConstValue::UInt(0)));
}

#[test]
fn test_multiplication_before_addition() {
    assert_eq!(eval("5 + 2 * 3", Primitive::INT), Ok(ConstValue::Int(11)));
    assert_eq!(eval("(5 + 2) * 3", Primitive::INT), Ok(ConstValue::Int(21)));
}

#[test]
fn test_division_by_zero() {
    assert_eq!(eval("1 / 0", Primitive::INT), Err(ErrorKind::DivisionByZeroError));
    assert_eq!(eval("7 % (2 - 2)", Primitive::UINT), Err(ErrorKind::DivisionByZeroError));
    assert_eq!(eval("1.0 / 0", Primitive::Float), Err(ErrorKind::DivisionByZeroError));
}

#[test]
fn test_shift_overflow() {
    assert_eq!(eval("1 << 32", Primitive::UINT), Err(ErrorKind::ShiftOverflowError));
    assert_eq!(eval("1 << -1", Primitive::INT), Err(ErrorKind::ShiftOverflowError));
    assert_eq!(eval("1 << 31", Primitive::UINT), Ok(ConstValue::UInt(2147483648)));
    assert_eq!(
        eval("1 << 8", Primitive::UInt(IntWidth::W8)),
        Err(ErrorKind::ShiftOverflowError)
    );
}

#[test]
fn test_shift_amount_overflow_reports_amount() {
    let expr = parse_expression("1 << 40").unwrap();
    let error = evaluate(&expr, Primitive::UINT, &ConstEnv::new()).unwrap_err();

    assert_eq!(error.get_error_name(), "ShiftOverflowError");
    assert!(error.to_string().contains("40"));
    assert!(error.to_string().contains("32"));
}

#[test]
fn test_wraparound_at_declared_width() {
    assert_eq!(eval("255 + 1", Primitive::UInt(IntWidth::W8)), Ok(ConstValue::UInt(0)));
    assert_eq!(eval("127 + 1", Primitive::Int(IntWidth::W8)), Ok(ConstValue::Int(-128)));
    assert_eq!(eval("0 - 1", Primitive::UINT), Ok(ConstValue::UInt(4294967295)));
    assert_eq!(eval("-1", Primitive::UInt(IntWidth::W16)), Ok(ConstValue::UInt(65535)));
    assert_eq!(
        eval("0xFFFFFFFFFFFFFFFF + 2", Primitive::UInt(IntWidth::W64)),
        Ok(ConstValue::UInt(1))
    );
}

#[test]
fn test_right_shift_signedness() {
    assert_eq!(eval("-8 >> 1", Primitive::INT), Ok(ConstValue::Int(-4)));
    assert_eq!(eval("-8 >> 1", Primitive::UINT), Ok(ConstValue::UInt(2147483644)));
}

#[test]
fn test_comparison_and_logical_results() {
    assert_eq!(eval("3 < 4", Primitive::INT), Ok(ConstValue::Int(1)));
    assert_eq!(eval("3 == 4", Primitive::INT), Ok(ConstValue::Int(0)));
    assert_eq!(eval("1 && 0 || 2", Primitive::INT), Ok(ConstValue::Int(1)));
    assert_eq!(eval("!5", Primitive::INT), Ok(ConstValue::Int(0)));
    assert_eq!(eval("-1 < 0", Primitive::INT), Ok(ConstValue::Int(1)));
    // Unsigned: -1 wraps to the maximum value
    assert_eq!(eval("-1 < 0", Primitive::UINT), Ok(ConstValue::UInt(0)));
}

#[test]
fn test_bitwise_operators() {
    assert_eq!(eval("0xF0 | 0x0F", Primitive::UINT), Ok(ConstValue::UInt(255)));
    assert_eq!(eval("6 & 3 ^ 1", Primitive::INT), Ok(ConstValue::Int(3)));
    assert_eq!(eval("~0", Primitive::UInt(IntWidth::W8)), Ok(ConstValue::UInt(255)));
    assert_eq!(eval("~0", Primitive::INT), Ok(ConstValue::Int(-1)));
}

#[test]
fn test_float_folding() {
    assert_eq!(eval("1.5 * 2", Primitive::Float), Ok(ConstValue::Float(3.0)));
    assert_eq!(eval("1 / 4", Primitive::Float), Ok(ConstValue::Float(0.25)));
    assert_eq!(eval("-2.5", Primitive::Float), Ok(ConstValue::Float(-2.5)));
}

#[test]
fn test_float_literal_truncates_in_integer_context() {
    assert_eq!(eval("2.9 + 1", Primitive::INT), Ok(ConstValue::Int(3)));
    assert_eq!(eval("-2.9", Primitive::INT), Ok(ConstValue::Int(-2)));
}

#[test]
fn test_integer_only_operators_on_float() {
    assert_eq!(eval("5 % 2", Primitive::Float), Err(ErrorKind::InvalidOperandError));
    assert_eq!(eval("1 << 2", Primitive::Float), Err(ErrorKind::InvalidOperandError));
    assert_eq!(eval("~1", Primitive::Float), Err(ErrorKind::InvalidOperandError));
}

#[test]
fn test_string_constants() {
    assert_eq!(
        eval("\"hello\"", Primitive::Str),
        Ok(ConstValue::Str("hello".to_string()))
    );
    assert_eq!(eval("\"a\" + \"b\"", Primitive::Str), Err(ErrorKind::InvalidOperandError));
    assert_eq!(eval("1", Primitive::Str), Err(ErrorKind::InvalidOperandError));
    assert_eq!(eval("\"1\"", Primitive::INT), Err(ErrorKind::InvalidOperandError));
}

#[test]
fn test_previous_constants_are_usable() {
    let mut env = ConstEnv::new();
    env.define("WIDTH", ConstValue::UInt(8));
    env.define("GREETING", ConstValue::Str("hi".to_string()));

    assert_eq!(eval_in("WIDTH * 2", Primitive::INT, &env), Ok(ConstValue::Int(16)));
    assert_eq!(
        eval_in("GREETING", Primitive::Str, &env),
        Ok(ConstValue::Str("hi".to_string()))
    );
}

#[test]
fn test_unknown_and_poisoned_symbols() {
    let mut env = ConstEnv::new();
    env.poison("BROKEN");

    assert_eq!(eval_in("LATER + 1", Primitive::INT, &env), Err(ErrorKind::NotConstantError));
    assert_eq!(eval_in("BROKEN", Primitive::INT, &env), Err(ErrorKind::NotConstantError));
}

#[test]
fn test_runtime_expressions_are_not_constant() {
    assert_eq!(eval("f(1)", Primitive::INT), Err(ErrorKind::NotConstantError));
    assert_eq!(eval("p.x", Primitive::INT), Err(ErrorKind::NotConstantError));
    assert_eq!(eval("new 1", Primitive::INT), Err(ErrorKind::NotConstantError));
}
