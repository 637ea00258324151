//! Pointer lifecycle rules for function bodies.
//!
//! Owned pointers are created by `new`, pointers of either kind are
//! narrowed to references by `unwrap` or `if let`, and references never
//! leave the block they were narrowed in.

pub mod checker;

#[cfg(test)]
mod tests;
