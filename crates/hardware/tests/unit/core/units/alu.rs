//! Ebox Tests.
//!
//! Operate instructions as the issue stage executes them: one call per
//! operation with operands already read from the physical register file.

use axp_core::common::error::{ExceptionSummary, TrapKind};
use axp_core::core::pipeline::signals::{Cond, IntOp};
use axp_core::core::units::alu::{Alu, IntOperands};
use pretty_assertions::assert_eq;
use rstest::rstest;

const fn ops(a: u64, b: u64) -> IntOperands {
    IntOperands { a, b, c: 0, disp: 0 }
}

#[rstest]
#[case::addq_wraps(IntOp::Addq, u64::MAX, 2, 1)]
#[case::subq(IntOp::Subq, 5, 7, (-2i64) as u64)]
#[case::addl_sign_extends(IntOp::Addl, 0x7FFF_FFFF, 1, 0xFFFF_FFFF_8000_0000)]
#[case::s4addq(IntOp::ScaledAddq(4), 3, 1, 13)]
#[case::s8subl(IntOp::ScaledSubl(8), 1, 9, (-1i64) as u64)]
#[case::mulq(IntOp::Mulq, 6, 7, 42)]
#[case::umulh(IntOp::Umulh, u64::MAX, 2, 1)]
#[case::cmplt_signed(IntOp::Cmplt, (-1i64) as u64, 0, 1)]
#[case::cmpult_unsigned(IntOp::Cmpult, (-1i64) as u64, 0, 0)]
#[case::cmpeq(IntOp::Cmpeq, 9, 9, 1)]
#[case::bic(IntOp::Bic, 0xFF, 0x0F, 0xF0)]
#[case::ornot(IntOp::Ornot, 0, 0, u64::MAX)]
#[case::eqv(IntOp::Eqv, 0xF0, 0xF0, u64::MAX)]
#[case::sll(IntOp::Sll, 1, 63, 1 << 63)]
#[case::srl(IntOp::Srl, 1 << 63, 63, 1)]
#[case::sra(IntOp::Sra, 1 << 63, 63, u64::MAX)]
#[case::shift_uses_six_bits(IntOp::Sll, 1, 64 + 4, 16)]
#[case::zapnot(IntOp::Zapnot, 0x1122_3344_5566_7788, 0x0F, 0x5566_7788)]
#[case::zap(IntOp::Zap, 0x1122_3344_5566_7788, 0x0F, 0x1122_3344_0000_0000)]
fn integer_operates(#[case] op: IntOp, #[case] a: u64, #[case] b: u64, #[case] expected: u64) {
    assert_eq!(Alu::execute(op, ops(a, b)), Ok(expected));
}

/// LDA and LDAH add the displacement to Rb; Ra is not an input.
#[test]
fn address_arithmetic_uses_rb_and_disp() {
    let operands = IntOperands {
        a: 0xDEAD,
        b: 0x1000,
        c: 0,
        disp: -8,
    };
    assert_eq!(Alu::execute(IntOp::Lda, operands), Ok(0xFF8));

    let operands = IntOperands {
        disp: 1 << 16,
        ..operands
    };
    assert_eq!(Alu::execute(IntOp::Ldah, operands), Ok(0x1_1000));
}

/// CMOVxx selects Rb when Ra satisfies the condition and keeps Rc otherwise.
#[rstest]
#[case::taken(0, 7)]
#[case::not_taken(1, 9)]
fn conditional_move(#[case] a: u64, #[case] expected: u64) {
    let operands = IntOperands { a, b: 7, c: 9, disp: 0 };
    assert_eq!(Alu::execute(IntOp::Cmov(Cond::Eq), operands), Ok(expected));
}

/// The /V forms trap on signed overflow with IOV set.
#[rstest]
#[case::addqv(IntOp::AddqV, i64::MAX as u64, 1)]
#[case::subqv(IntOp::SubqV, i64::MIN as u64, 1)]
#[case::addlv(IntOp::AddlV, 0x7FFF_FFFF, 1)]
#[case::mulqv(IntOp::MulqV, 1 << 62, 4)]
fn overflow_traps(#[case] op: IntOp, #[case] a: u64, #[case] b: u64) {
    let Err(TrapKind::ArithmeticTrap { summary }) = Alu::execute(op, ops(a, b)) else {
        panic!("{op:?} did not trap");
    };
    assert!(summary.contains(ExceptionSummary::IOV));
}

/// Without overflow the /V forms match their wrapping twins.
#[test]
fn overflow_forms_agree_when_in_range() {
    for (checked, plain) in [(IntOp::AddqV, IntOp::Addq), (IntOp::SubqV, IntOp::Subq)] {
        assert_eq!(
            Alu::execute(checked, ops(100, 58)),
            Alu::execute(plain, ops(100, 58))
        );
    }
}
