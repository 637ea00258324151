use std::slice::Iter;

use crate::Span;

use super::{ast::{Expr, Stmt}, types::TypeExpr};

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub id: i32,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

/// `let name: T = value;` inside a function body.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub identifier: String,
    pub assigned_value: Option<Expr>,
    pub explicit_type: Option<TypeExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: BlockStmt,
    pub else_body: Option<Box<Stmt>>,
    pub span: Span,
}

/// `if let binding = value { ... } else { ... }`
///
/// `binding` is a reference to the pointee, live only inside `then_body`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfLetStmt {
    pub binding: String,
    pub value: Expr,
    pub then_body: BlockStmt,
    pub else_body: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}
