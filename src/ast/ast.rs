use crate::{Position, Span};

use super::{
    declarations::{ConstDecl, ExternDecl, FnDecl, StructDecl, TypedefDecl},
    expressions::{
        ArrayInitExpr, AssignmentExpr, BinaryExpr, CallExpr, MemberExpr, NewExpr, NumberExpr,
        PrefixExpr, PrefixOperator, StringExpr, StructInitExpr, SymbolExpr, UnwrapExpr,
    },
    statements::{BlockStmt, ExpressionStmt, IfLetStmt, IfStmt, ReturnStmt, VarDeclStmt},
};

/// Statements
///
/// Only appear inside function bodies.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(ExpressionStmt),
    Block(BlockStmt),
    VarDecl(VarDeclStmt),
    If(IfStmt),
    IfLet(IfLetStmt),
    Return(ReturnStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::Block(stmt) => &stmt.span,
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::IfLet(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(NumberExpr),
    String(StringExpr),
    Symbol(SymbolExpr),
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Assignment(AssignmentExpr),
    Call(CallExpr),
    Member(MemberExpr),
    StructInit(StructInitExpr),
    ArrayInit(ArrayInitExpr),
    New(NewExpr),
    Unwrap(UnwrapExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Number(expr) => &expr.span,
            Expr::String(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::Assignment(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::Member(expr) => &expr.span,
            Expr::StructInit(expr) => &expr.span,
            Expr::ArrayInit(expr) => &expr.span,
            Expr::New(expr) => &expr.span,
            Expr::Unwrap(expr) => &expr.span,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.get_span().start
    }

    /// Number or string literal, including a negated number.
    pub fn is_literal(&self) -> bool {
        match self {
            Expr::Number(_) | Expr::String(_) => true,
            Expr::Prefix(prefix) => {
                prefix.operator == PrefixOperator::Negate
                    && matches!(*prefix.right_expr, Expr::Number(_))
            }
            _ => false,
        }
    }

    /// Literal, struct initializer or array initializer - the shapes `new`
    /// accepts.
    pub fn is_initializer(&self) -> bool {
        self.is_literal() || matches!(self, Expr::StructInit(_) | Expr::ArrayInit(_))
    }
}

/// Declarations
///
/// The ordered list of these is the unit of work for the checker.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Const(ConstDecl),
    Struct(StructDecl),
    Typedef(TypedefDecl),
    Function(FnDecl),
    Extern(ExternDecl),
}

impl Decl {
    pub fn get_span(&self) -> &Span {
        match self {
            Decl::Const(decl) => &decl.span,
            Decl::Struct(decl) => &decl.span,
            Decl::Typedef(decl) => &decl.span,
            Decl::Function(decl) => &decl.span,
            Decl::Extern(decl) => &decl.span,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.get_span().start
    }

    pub fn name(&self) -> &str {
        match self {
            Decl::Const(decl) => &decl.name,
            Decl::Struct(decl) => &decl.name,
            Decl::Typedef(decl) => &decl.name,
            Decl::Function(decl) => &decl.name,
            Decl::Extern(decl) => &decl.name,
        }
    }
}
