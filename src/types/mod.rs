//! Type table module.
//!
//! Holds the canonical, interned representation of every type declared or
//! spelled in a compilation unit:
//!
//! - Primitives (sized integers, float, str), pre-interned at fixed ids
//! - Structs and typedefs, registered by name in two phases
//! - Arrays, fixed arrays, pointers, references and function pointers,
//!   deduplicated structurally

pub mod table;
pub mod types;
