//! Semantic checking of compilation units.
//!
//! A [`Session`](session::Session) owns one unit's type table and constant
//! environment. [`check_unit`](checker::check_unit) drives the declaration
//! phases over it and [`check_units`](merge::check_units) checks several
//! units in parallel before merging their tables.

pub mod checker;
pub mod merge;
pub mod session;

#[cfg(test)]
mod tests;
