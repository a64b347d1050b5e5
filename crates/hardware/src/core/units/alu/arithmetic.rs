//! Integer arithmetic.
//!
//! Implements address arithmetic (LDA/LDAH), longword and quadword add,
//! subtract and multiply, the scaled adds, UMULH and the compares.
//!
//! Longword (L) results are computed on the low 32 bits and sign-extended
//! to 64 bits. The /V forms report signed overflow as an integer overflow
//! arithmetic trap instead of producing a result.

use crate::common::error::{ExceptionSummary, TrapKind};
use crate::core::pipeline::signals::IntOp;

/// Number of bits in a quadword (used for the high-multiply shift).
const QUAD_BITS: u32 = 64;

/// Integer overflow trap raised by the /V forms.
const OVERFLOW: TrapKind = TrapKind::ArithmeticTrap {
    summary: ExceptionSummary::IOV,
};

/// Sign-extends a longword result.
#[inline(always)]
const fn sext_long(value: i32) -> u64 {
    value as i64 as u64
}

/// Executes an arithmetic or compare operation.
///
/// `disp` is the byte displacement of LDA/LDAH (already scaled for LDAH);
/// `a` and `b` are Ra and Rb (or the literal).
///
/// # Errors
///
/// Returns an integer overflow `ArithmeticTrap` for a /V form whose signed
/// result does not fit the operand width.
pub fn execute(op: IntOp, a: u64, b: u64, disp: i64) -> Result<u64, TrapKind> {
    let value = match op {
        IntOp::Lda | IntOp::Ldah => b.wrapping_add(disp as u64),

        IntOp::Addl => sext_long((a as i32).wrapping_add(b as i32)),
        IntOp::Subl => sext_long((a as i32).wrapping_sub(b as i32)),
        IntOp::ScaledAddl(scale) => {
            sext_long((a as i32).wrapping_mul(i32::from(scale)).wrapping_add(b as i32))
        }
        IntOp::ScaledSubl(scale) => {
            sext_long((a as i32).wrapping_mul(i32::from(scale)).wrapping_sub(b as i32))
        }
        IntOp::AddlV => sext_long((a as i32).checked_add(b as i32).ok_or(OVERFLOW)?),
        IntOp::SublV => sext_long((a as i32).checked_sub(b as i32).ok_or(OVERFLOW)?),

        IntOp::Addq => a.wrapping_add(b),
        IntOp::Subq => a.wrapping_sub(b),
        IntOp::ScaledAddq(scale) => a.wrapping_mul(u64::from(scale)).wrapping_add(b),
        IntOp::ScaledSubq(scale) => a.wrapping_mul(u64::from(scale)).wrapping_sub(b),
        IntOp::AddqV => (a as i64).checked_add(b as i64).ok_or(OVERFLOW)? as u64,
        IntOp::SubqV => (a as i64).checked_sub(b as i64).ok_or(OVERFLOW)? as u64,

        IntOp::Mull => sext_long((a as i32).wrapping_mul(b as i32)),
        IntOp::MullV => sext_long((a as i32).checked_mul(b as i32).ok_or(OVERFLOW)?),
        IntOp::Mulq => a.wrapping_mul(b),
        IntOp::MulqV => (a as i64).checked_mul(b as i64).ok_or(OVERFLOW)? as u64,
        IntOp::Umulh => ((u128::from(a) * u128::from(b)) >> QUAD_BITS) as u64,

        IntOp::Cmpeq => u64::from(a == b),
        IntOp::Cmplt => u64::from((a as i64) < (b as i64)),
        IntOp::Cmple => u64::from((a as i64) <= (b as i64)),
        IntOp::Cmpult => u64::from(a < b),
        IntOp::Cmpule => u64::from(a <= b),
        IntOp::Cmpbge => cmpbge(a, b),

        _ => 0,
    };
    Ok(value)
}

/// Byte-wise unsigned `a >= b`; bit n of the result covers byte n.
fn cmpbge(a: u64, b: u64) -> u64 {
    let a = a.to_le_bytes();
    let b = b.to_le_bytes();
    a.iter()
        .zip(b.iter())
        .enumerate()
        .filter(|(_, (x, y))| x >= y)
        .fold(0, |acc, (i, _)| acc | (1 << i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longword_add_sign_extends() {
        assert_eq!(execute(IntOp::Addl, 0x7FFF_FFFF, 1, 0), Ok(0xFFFF_FFFF_8000_0000));
        assert_eq!(execute(IntOp::AddlV, 0x7FFF_FFFF, 1, 0), Err(OVERFLOW));
    }

    #[test]
    fn scaled_forms() {
        assert_eq!(execute(IntOp::ScaledAddq(8), 3, 1, 0), Ok(25));
        assert_eq!(execute(IntOp::ScaledSubl(4), 2, 10, 0), Ok((-2i64) as u64));
    }

    #[test]
    fn lda_adds_displacement() {
        assert_eq!(execute(IntOp::Lda, 0, 0x1000, -16), Ok(0xFF0));
        assert_eq!(execute(IntOp::Ldah, 0, 0, 0x10000), Ok(0x10000));
    }

    #[test]
    fn umulh_high_bits() {
        assert_eq!(execute(IntOp::Umulh, u64::MAX, 2, 0), Ok(1));
    }

    #[test]
    fn multiply_overflow_traps() {
        assert_eq!(execute(IntOp::MulqV, i64::MAX as u64, 2, 0), Err(OVERFLOW));
        assert_eq!(execute(IntOp::MullV, 0x10000, 0x10000, 0), Err(OVERFLOW));
        assert_eq!(execute(IntOp::Mull, 0x10000, 0x10000, 0), Ok(0));
    }

    #[test]
    fn byte_compare() {
        assert_eq!(execute(IntOp::Cmpbge, 0x00FF_0000_0000_0001, 0x0001_0000_0000_0002, 0), Ok(0b1111_1110));
        assert_eq!(execute(IntOp::Cmpbge, 0, 0, 0), Ok(0xFF));
    }

    #[test]
    fn signed_and_unsigned_compares() {
        let minus_one = u64::MAX;
        assert_eq!(execute(IntOp::Cmplt, minus_one, 0, 0), Ok(1));
        assert_eq!(execute(IntOp::Cmpult, minus_one, 0, 0), Ok(0));
        assert_eq!(execute(IntOp::Cmpule, 5, 5, 0), Ok(1));
    }
}
