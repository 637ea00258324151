/// AST (Abstract Syntax Tree) module
/// Contains the declaration trees the checker consumes
///
/// Submodules:
/// - ast: Statement, expression and declaration enums
/// - declarations: Top level declaration nodes
/// - expressions: Definitions for various expression types
/// - statements: Definitions for function body statements
/// - types: Unresolved type expressions
pub mod ast;
pub mod declarations;
pub mod expressions;
pub mod statements;
pub mod types;
