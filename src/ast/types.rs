//! Type expressions as written in source.
//!
//! These are the unresolved spellings produced by the parser. The session
//! resolver turns them into [`TypeId`](crate::types::types::TypeId)s:
//!
//! - Symbols (`int`, `uint`, struct and typedef names)
//! - Arrays `[T]` and fixed arrays `[T; N]`
//! - Owned pointers `*T` and extern pointers `extern *T`
//! - References `&T`
//! - Function pointers `fn(A, B) -> R`

use std::fmt::Display;

use crate::{types::types::PointerKind, Position};

use super::ast::Expr;

/// Represents a symbolic type reference that needs resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolType {
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub underlying: Box<TypeExpr>, // [T]
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedArrayType {
    pub underlying: Box<TypeExpr>, // [T; N]
    pub length: Box<Expr>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerType {
    pub underlying: Box<TypeExpr>,
    pub kind: PointerKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceType {
    pub underlying: Box<TypeExpr>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub parameters: Vec<TypeExpr>,
    pub return_type: Option<Box<TypeExpr>>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Symbol(SymbolType),
    Array(ArrayType),
    FixedArray(FixedArrayType),
    Pointer(PointerType),
    Reference(ReferenceType),
    Function(FunctionType),
}

impl TypeExpr {
    pub fn get_position(&self) -> &Position {
        match self {
            TypeExpr::Symbol(ty) => &ty.position,
            TypeExpr::Array(ty) => &ty.position,
            TypeExpr::FixedArray(ty) => &ty.position,
            TypeExpr::Pointer(ty) => &ty.position,
            TypeExpr::Reference(ty) => &ty.position,
            TypeExpr::Function(ty) => &ty.position,
        }
    }

    pub fn symbol(name: &str, position: Position) -> Self {
        TypeExpr::Symbol(SymbolType {
            name: name.to_string(),
            position,
        })
    }
}

impl Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeExpr::Symbol(ty) => write!(f, "{}", ty.name),
            TypeExpr::Array(ty) => write!(f, "[{}]", ty.underlying),
            TypeExpr::FixedArray(ty) => write!(f, "[{}; _]", ty.underlying),
            TypeExpr::Pointer(ty) if ty.kind == PointerKind::Extern => {
                write!(f, "extern *{}", ty.underlying)
            }
            TypeExpr::Pointer(ty) => write!(f, "*{}", ty.underlying),
            TypeExpr::Reference(ty) => write!(f, "&{}", ty.underlying),
            TypeExpr::Function(ty) => {
                let parameters = ty
                    .parameters
                    .iter()
                    .map(|parameter| parameter.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                match &ty.return_type {
                    Some(return_type) => write!(f, "fn({}) -> {}", parameters, return_type),
                    None => write!(f, "fn({})", parameters),
                }
            }
        }
    }
}
