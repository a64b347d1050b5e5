//! Instruction builders.

/// Encoders for each Alpha instruction format.
pub mod instruction;
