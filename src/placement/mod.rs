//! Structural placement rules.
//!
//! References are transient local bindings, so they may not appear inside
//! anything that outlives a block: struct fields, array elements, pointer
//! elements or function pointer signatures. Fixed array lengths must fold
//! to a positive constant.

pub mod validator;

#[cfg(test)]
mod tests;
