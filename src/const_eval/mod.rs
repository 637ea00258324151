//! Compile time constant folding.
//!
//! Folds literal expressions and references to previously declared
//! constants into a [`ConstValue`](value::ConstValue) of the declared
//! primitive type. Integer folding happens at the declared width with two's
//! complement wraparound.

pub mod evaluator;
pub mod value;

#[cfg(test)]
mod tests;
