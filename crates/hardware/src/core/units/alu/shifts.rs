//! ALU shift operations.
//!
//! Alpha shifts always operate on the full quadword; the shift count is
//! taken from bits 5:0 of Rb or the literal.

use crate::core::pipeline::signals::IntOp;

/// Mask for the 6-bit shift amount.
const SHAMT_MASK: u64 = 0x3F;

/// Executes a shift operation.
///
/// # Returns
///
/// The shifted quadword. Returns `0` for non-shift operations.
pub fn execute(op: IntOp, a: u64, b: u64) -> u64 {
    let shamt = (b & SHAMT_MASK) as u32;
    match op {
        IntOp::Sll => a << shamt,
        IntOp::Srl => a >> shamt,
        IntOp::Sra => ((a as i64) >> shamt) as u64,
        _ => 0,
    }
}
