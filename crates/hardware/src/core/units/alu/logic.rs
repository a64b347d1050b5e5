//! Ebox logical operations.
//!
//! Implements the bitwise operations of the INTL group, the conditional
//! moves, and the implementation queries AMASK and IMPLVER.
//!
//! A conditional move tests Ra and yields Rb when the condition holds,
//! otherwise the old value of Rc (operand `c`), so the destination is
//! always written and renaming stays unconditional.

use crate::common::constants::{AMASK_FEATURES, IMPLVER_EV6};
use crate::core::pipeline::signals::IntOp;

/// Executes a logical operation.
///
/// # Arguments
///
/// * `op` - The logical operation (must be an INTL variant).
/// * `a`  - Ra, the condition operand of CMOVxx.
/// * `b`  - Rb or the literal.
/// * `c`  - Old destination value, read by CMOVxx.
///
/// # Returns
///
/// The 64-bit result. Returns `0` for non-logical operations.
pub fn execute(op: IntOp, a: u64, b: u64, c: u64) -> u64 {
    match op {
        IntOp::And => a & b,
        IntOp::Bic => a & !b,
        IntOp::Bis => a | b,
        IntOp::Ornot => a | !b,
        IntOp::Xor => a ^ b,
        IntOp::Eqv => a ^ !b,
        IntOp::Cmov(cond) => {
            if cond.eval_int(a) {
                b
            } else {
                c
            }
        }
        IntOp::Amask => b & !AMASK_FEATURES,
        IntOp::Implver => IMPLVER_EV6,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::signals::Cond;

    #[test]
    fn bitwise_forms() {
        assert_eq!(execute(IntOp::Bic, 0xFF, 0x0F, 0), 0xF0);
        assert_eq!(execute(IntOp::Ornot, 0, 0, 0), u64::MAX);
        assert_eq!(execute(IntOp::Eqv, 0xF0, 0xF0, 0), u64::MAX);
    }

    #[test]
    fn cmov_keeps_old_value_when_false() {
        assert_eq!(execute(IntOp::Cmov(Cond::Eq), 0, 7, 9), 7);
        assert_eq!(execute(IntOp::Cmov(Cond::Eq), 1, 7, 9), 9);
        assert_eq!(execute(IntOp::Cmov(Cond::Lbs), 3, 7, 9), 7);
    }

    #[test]
    fn amask_clears_implemented_features() {
        assert_eq!(execute(IntOp::Amask, 0, 0xFFFF, 0), 0xFCF8);
        assert_eq!(execute(IntOp::Implver, 0, 0, 0), 2);
    }
}
