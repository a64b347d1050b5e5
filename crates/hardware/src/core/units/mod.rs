//! Functional units.
//!
//! The 21264 splits execution across the integer box (Ebox), the
//! floating-point box (Fbox) and the memory box (Mbox). Units are pure:
//! they compute a result or a trap from operand values and leave all
//! architectural updates to retirement.

/// Integer ALU: arithmetic, logical, shift, byte manipulation and multiply.
pub mod alu;

/// Branch resolution and prediction.
pub mod bru;

/// IEEE and VAX floating-point operations.
pub mod fpu;

/// Load/store address generation, alignment and forwarding.
pub mod lsu;
