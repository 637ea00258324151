//! Error types and error handling for the checker.
//!
//! This module defines the error types used throughout semantic analysis.
//! It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for each analysis phase
//! - Helpful error messages and suggestions
//! - The position-ordered diagnostic accumulator

pub mod diagnostics;
pub mod errors;
