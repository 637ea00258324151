use crate::{
    ast::{
        ast::Expr,
        expressions::{BinaryExpr, BinaryOperator, NumberLiteral, PrefixExpr, PrefixOperator},
    },
    errors::errors::{Error, ErrorImpl},
    types::types::Primitive,
    Position,
};

use super::value::{ConstEnv, ConstValue};

/// Intermediate folding result. Integers are kept sign or zero extended to
/// `i128` and always already wrapped to the target width.
#[derive(Debug, Clone, PartialEq)]
enum Folded {
    Int(i128),
    Float(f64),
    Str(String),
}

/// Folds `expr` as a constant of type `expected`.
pub fn evaluate(expr: &Expr, expected: Primitive, env: &ConstEnv) -> Result<ConstValue, Error> {
    let folded = fold_expr(expr, expected, env)?;
    tracing::trace!(%expected, ?folded, "folded constant");

    Ok(match (folded, expected) {
        (Folded::Int(value), Primitive::Int(_)) => ConstValue::Int(value as i64),
        (Folded::Int(value), _) => ConstValue::UInt(value as u64),
        (Folded::Float(value), _) => ConstValue::Float(value),
        (Folded::Str(value), _) => ConstValue::Str(value),
    })
}

/// Truncates `value` to the width of `target`, sign extending signed types.
fn wrap(value: i128, target: Primitive) -> i128 {
    let bits = target.bits();
    let modulus = 1i128 << bits;
    let truncated = value & (modulus - 1);

    if target.is_signed() && truncated >= modulus >> 1 {
        truncated - modulus
    } else {
        truncated
    }
}

/// Rounds to single precision.
fn round_float(value: f64) -> f64 {
    value as f32 as f64
}

fn invalid_operand(operator: impl ToString, target: Primitive, position: &Position) -> Error {
    Error::new(
        ErrorImpl::InvalidOperand {
            operator: operator.to_string(),
            type_: target.to_string(),
        },
        position.clone(),
    )
}

fn not_constant(name: &str, reason: &str, position: &Position) -> Error {
    Error::new(
        ErrorImpl::NotConstant {
            name: name.to_string(),
            reason: reason.to_string(),
        },
        position.clone(),
    )
}

/// Converts a literal or a previously folded constant into the target type.
fn convert(value: &ConstValue, target: Primitive, position: &Position) -> Result<Folded, Error> {
    match (value, target) {
        (ConstValue::Str(value), Primitive::Str) => Ok(Folded::Str(value.clone())),
        (ConstValue::Str(_), _) | (_, Primitive::Str) => Err(invalid_operand("as", target, position)),
        (ConstValue::Float(value), Primitive::Float) => Ok(Folded::Float(round_float(*value))),
        (ConstValue::Int(value), Primitive::Float) => Ok(Folded::Float(round_float(*value as f64))),
        (ConstValue::UInt(value), Primitive::Float) => {
            Ok(Folded::Float(round_float(*value as f64)))
        }
        // Float to integer truncates toward zero
        (ConstValue::Float(value), _) => Ok(Folded::Int(wrap(value.trunc() as i128, target))),
        (ConstValue::Int(value), _) => Ok(Folded::Int(wrap(*value as i128, target))),
        (ConstValue::UInt(value), _) => Ok(Folded::Int(wrap(*value as i128, target))),
    }
}

fn fold_expr(expr: &Expr, target: Primitive, env: &ConstEnv) -> Result<Folded, Error> {
    match expr {
        Expr::Number(number) => {
            let value = match number.value {
                NumberLiteral::Int(value) => ConstValue::UInt(value),
                NumberLiteral::Float(value) => ConstValue::Float(value),
            };
            convert(&value, target, expr.get_position())
        }
        Expr::String(string) => convert(
            &ConstValue::Str(string.value.clone()),
            target,
            expr.get_position(),
        ),
        Expr::Symbol(symbol) => match env.get(&symbol.value) {
            Some(Some(value)) => convert(value, target, expr.get_position()),
            Some(None) => Err(not_constant(
                &symbol.value,
                "its own value failed to fold",
                expr.get_position(),
            )),
            None => Err(not_constant(
                &symbol.value,
                "only literals and previously declared constants can be used",
                expr.get_position(),
            )),
        },
        Expr::Binary(binary) => fold_binary(binary, target, env),
        Expr::Prefix(prefix) => fold_prefix(prefix, target, env),
        Expr::Call(_) => Err(not_constant(
            "call",
            "function calls are evaluated at run time",
            expr.get_position(),
        )),
        Expr::Member(member) => Err(not_constant(
            &member.property,
            "member access is evaluated at run time",
            expr.get_position(),
        )),
        Expr::Assignment(_) => Err(not_constant(
            "assignment",
            "assignments have no constant value",
            expr.get_position(),
        )),
        Expr::StructInit(init) => Err(not_constant(
            &init.name,
            "struct initializers are not constants",
            expr.get_position(),
        )),
        Expr::ArrayInit(_) => Err(not_constant(
            "array",
            "array initializers are not constants",
            expr.get_position(),
        )),
        Expr::New(_) => Err(not_constant(
            "new",
            "allocations happen at run time",
            expr.get_position(),
        )),
        Expr::Unwrap(_) => Err(not_constant(
            "unwrap",
            "unwrapping happens at run time",
            expr.get_position(),
        )),
    }
}

fn fold_prefix(prefix: &PrefixExpr, target: Primitive, env: &ConstEnv) -> Result<Folded, Error> {
    let position = &prefix.span.start;
    let value = fold_expr(&prefix.right_expr, target, env)?;

    match (value, prefix.operator) {
        (Folded::Str(_), operator) => Err(invalid_operand(operator, target, position)),
        (Folded::Int(value), PrefixOperator::Negate) => {
            Ok(Folded::Int(wrap(value.wrapping_neg(), target)))
        }
        (Folded::Int(value), PrefixOperator::Not) => Ok(Folded::Int((value == 0) as i128)),
        (Folded::Int(value), PrefixOperator::BitNot) => Ok(Folded::Int(wrap(!value, target))),
        (Folded::Float(value), PrefixOperator::Negate) => Ok(Folded::Float(-value)),
        (Folded::Float(value), PrefixOperator::Not) => {
            Ok(Folded::Float(if value == 0.0 { 1.0 } else { 0.0 }))
        }
        (Folded::Float(_), PrefixOperator::BitNot) => {
            Err(invalid_operand(PrefixOperator::BitNot, target, position))
        }
    }
}

fn fold_binary(binary: &BinaryExpr, target: Primitive, env: &ConstEnv) -> Result<Folded, Error> {
    let left = fold_expr(&binary.left, target, env)?;
    let right = fold_expr(&binary.right, target, env)?;

    match (left, right) {
        (Folded::Int(left), Folded::Int(right)) => {
            fold_integer(binary, left, right, target).map(Folded::Int)
        }
        (Folded::Float(left), Folded::Float(right)) => {
            fold_float(binary, left, right, target).map(Folded::Float)
        }
        _ => Err(invalid_operand(binary.operator, target, &binary.span.start)),
    }
}

fn fold_integer(
    binary: &BinaryExpr,
    left: i128,
    right: i128,
    target: Primitive,
) -> Result<i128, Error> {
    let bits = target.bits();

    let value = match binary.operator {
        BinaryOperator::Add => left.wrapping_add(right),
        BinaryOperator::Subtract => left.wrapping_sub(right),
        BinaryOperator::Multiply => left.wrapping_mul(right),
        BinaryOperator::Divide | BinaryOperator::Modulo => {
            if right == 0 {
                return Err(Error::new(
                    ErrorImpl::DivisionByZero,
                    binary.right.get_position().clone(),
                ));
            }

            if binary.operator == BinaryOperator::Divide {
                left.wrapping_div(right)
            } else {
                left.wrapping_rem(right)
            }
        }
        BinaryOperator::ShiftLeft | BinaryOperator::ShiftRight => {
            if right < 0 || right >= bits as i128 {
                return Err(Error::new(
                    ErrorImpl::ShiftOverflow {
                        amount: right,
                        width: bits,
                    },
                    binary.right.get_position().clone(),
                ));
            }

            // Signed values are stored sign extended, unsigned ones are
            // never negative, so `>>` is arithmetic or logical as needed
            if binary.operator == BinaryOperator::ShiftLeft {
                left.wrapping_shl(right as u32)
            } else {
                left >> right
            }
        }
        BinaryOperator::BitAnd => left & right,
        BinaryOperator::BitOr => left | right,
        BinaryOperator::BitXor => left ^ right,
        BinaryOperator::Less => (left < right) as i128,
        BinaryOperator::LessEquals => (left <= right) as i128,
        BinaryOperator::Greater => (left > right) as i128,
        BinaryOperator::GreaterEquals => (left >= right) as i128,
        BinaryOperator::Equals => (left == right) as i128,
        BinaryOperator::NotEquals => (left != right) as i128,
        BinaryOperator::And => (left != 0 && right != 0) as i128,
        BinaryOperator::Or => (left != 0 || right != 0) as i128,
    };

    Ok(wrap(value, target))
}

fn fold_float(binary: &BinaryExpr, left: f64, right: f64, target: Primitive) -> Result<f64, Error> {
    let truth = |condition: bool| if condition { 1.0 } else { 0.0 };

    let value = match binary.operator {
        BinaryOperator::Add => left + right,
        BinaryOperator::Subtract => left - right,
        BinaryOperator::Multiply => left * right,
        BinaryOperator::Divide => {
            if right == 0.0 {
                return Err(Error::new(
                    ErrorImpl::DivisionByZero,
                    binary.right.get_position().clone(),
                ));
            }
            left / right
        }
        BinaryOperator::Less => truth(left < right),
        BinaryOperator::LessEquals => truth(left <= right),
        BinaryOperator::Greater => truth(left > right),
        BinaryOperator::GreaterEquals => truth(left >= right),
        BinaryOperator::Equals => truth(left == right),
        BinaryOperator::NotEquals => truth(left != right),
        BinaryOperator::And => truth(left != 0.0 && right != 0.0),
        BinaryOperator::Or => truth(left != 0.0 || right != 0.0),
        operator => return Err(invalid_operand(operator, target, &binary.span.start)),
    };

    Ok(round_float(value))
}
