//! Parser module for building the declaration list of a unit.
//!
//! Transforms a stream of tokens into top level declarations. Expressions
//! use a Pratt parser with NUD (null denotation) and LED (left denotation)
//! handlers and binding powers for precedence. Handles:
//!
//! - Declarations (constants, structs, typedefs, functions, externs)
//! - Statements inside function bodies
//! - Expressions, including initializers, `new` and `unwrap`
//! - Type expressions

pub mod decl;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
