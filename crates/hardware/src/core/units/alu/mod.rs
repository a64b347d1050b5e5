//! Integer execution box (Ebox).
//!
//! This module implements the integer operate instructions executed by the
//! Ebox, plus the FP-to-integer register moves that the 21264 routes
//! through the Fbox pipes but that produce integer results.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: LDA/LDAH, add, subtract, scaled add, multiply, compares
//! - [`logic`]:      AND, BIC, BIS, ORNOT, XOR, EQV, CMOVxx, AMASK, IMPLVER
//! - [`shifts`]:     SLL, SRL, SRA
//! - [`byte_ops`]:   MSKxx, EXTxx, INSxx, ZAP, ZAPNOT, SEXTB, SEXTW
//! - [`mvi`]:        CTPOP, CTLZ, CTTZ, PERR, pack/unpack, lane min/max

/// Address arithmetic, add, subtract, multiply and compares.
pub mod arithmetic;

/// Byte manipulation and sign extension.
pub mod byte_ops;

/// Bitwise logical operations, conditional moves and implementation queries.
pub mod logic;

/// Count and multimedia operations.
pub mod mvi;

/// Shift operations (sll, srl, sra).
pub mod shifts;

use crate::common::error::TrapKind;
use crate::core::pipeline::signals::IntOp;
use crate::core::units::fpu::convert::register_to_longword;

/// Integer operands of one Ebox operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntOperands {
    /// Ra (or Fa for FTOIx).
    pub a: u64,
    /// Rb or the operate literal.
    pub b: u64,
    /// Old destination value (conditional moves).
    pub c: u64,
    /// Byte displacement of LDA/LDAH.
    pub disp: i64,
}

/// Integer execution unit.
///
/// Stateless; every operation is a pure function of its operands.
pub struct Alu;

impl Alu {
    /// Executes an integer operation.
    ///
    /// # Arguments
    ///
    /// * `op`       - The integer operation to perform
    /// * `operands` - Source values as captured at rename time
    ///
    /// # Returns
    ///
    /// The 64-bit result written to the destination register.
    ///
    /// # Errors
    ///
    /// The /V forms return an `ArithmeticTrap` with the IOV summary bit on
    /// signed overflow. No other operation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use axp_core::core::pipeline::signals::IntOp;
    /// use axp_core::core::units::alu::{Alu, IntOperands};
    ///
    /// let ops = IntOperands { a: 40, b: 2, ..IntOperands::default() };
    /// assert_eq!(Alu::execute(IntOp::Addq, ops), Ok(42));
    ///
    /// // ADDL sign-extends the longword result.
    /// let ops = IntOperands { a: 0x7FFF_FFFF, b: 1, ..IntOperands::default() };
    /// assert_eq!(Alu::execute(IntOp::Addl, ops), Ok(0xFFFF_FFFF_8000_0000));
    ///
    /// // EXTBL pulls byte 2 down.
    /// use axp_core::core::pipeline::signals::{ByteWidth, Half};
    /// let ops = IntOperands { a: 0x00AB_0000, b: 2, ..IntOperands::default() };
    /// assert_eq!(Alu::execute(IntOp::Ext(ByteWidth::Byte, Half::Low), ops), Ok(0xAB));
    ///
    /// // ADDQ/V traps instead of wrapping.
    /// let ops = IntOperands { a: i64::MAX as u64, b: 1, ..IntOperands::default() };
    /// assert!(Alu::execute(IntOp::AddqV, ops).is_err());
    /// ```
    pub fn execute(op: IntOp, operands: IntOperands) -> Result<u64, TrapKind> {
        let IntOperands { a, b, c, disp } = operands;
        let value = match op {
            IntOp::Lda
            | IntOp::Ldah
            | IntOp::Addl
            | IntOp::AddlV
            | IntOp::ScaledAddl(_)
            | IntOp::Subl
            | IntOp::SublV
            | IntOp::ScaledSubl(_)
            | IntOp::Addq
            | IntOp::AddqV
            | IntOp::ScaledAddq(_)
            | IntOp::Subq
            | IntOp::SubqV
            | IntOp::ScaledSubq(_)
            | IntOp::Mull
            | IntOp::MullV
            | IntOp::Mulq
            | IntOp::MulqV
            | IntOp::Umulh
            | IntOp::Cmpbge
            | IntOp::Cmpeq
            | IntOp::Cmplt
            | IntOp::Cmple
            | IntOp::Cmpult
            | IntOp::Cmpule => arithmetic::execute(op, a, b, disp)?,

            IntOp::And
            | IntOp::Bic
            | IntOp::Bis
            | IntOp::Ornot
            | IntOp::Xor
            | IntOp::Eqv
            | IntOp::Cmov(_)
            | IntOp::Amask
            | IntOp::Implver => logic::execute(op, a, b, c),

            IntOp::Sll | IntOp::Srl | IntOp::Sra => shifts::execute(op, a, b),

            IntOp::Msk(..)
            | IntOp::Ext(..)
            | IntOp::Ins(..)
            | IntOp::Zap
            | IntOp::Zapnot
            | IntOp::Sextb
            | IntOp::Sextw => byte_ops::execute(op, a, b),

            IntOp::Ctpop
            | IntOp::Ctlz
            | IntOp::Cttz
            | IntOp::Perr
            | IntOp::Unpkbw
            | IntOp::Unpkbl
            | IntOp::Pkwb
            | IntOp::Pklb
            | IntOp::MinMax(_) => mvi::execute(op, a, b),

            IntOp::Ftoit => a,
            IntOp::Ftois => register_to_longword(a) as u64,
        };
        Ok(value)
    }
}
