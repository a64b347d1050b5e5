//! Functional unit tests.

/// Ebox integer operates.
pub mod alu;

/// Mbox addressing and data formatting.
pub mod lsu;
