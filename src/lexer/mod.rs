//! Lexical analysis for cscript source.
//!
//! Converts source text into a stream of tokens for the parser. Handles
//! keywords, identifiers, decimal, hex and float literals, operators, and
//! skips whitespace and comments. Every token carries a byte-offset span.

pub mod lexer;
pub mod tokens;
