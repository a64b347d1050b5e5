//! Decoder Tests.
//!
//! Known encodings decode to the expected descriptor, reserved encodings
//! are rejected, and decoding is a pure function of the word.

use axp_core::common::error::TrapKind;
use axp_core::common::reg::ArchReg;
use axp_core::core::pipeline::signals::{BranchOp, Cond, IntOp, Operation, StoreOp, SystemOp};
use axp_core::isa::decode::decode;
use axp_core::isa::instruction::OperandB;
use axp_core::isa::pal;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::builder::instruction::{
    NOP, ZERO, addq, addq_lit, beq, br, call_pal, hw_mtpr, li, stq,
};

#[test]
fn lda_loads_a_literal() {
    let d = decode(li(1, -4)).unwrap();
    assert_eq!(d.op, Operation::Int(IntOp::Lda));
    assert_eq!(d.dest, Some(ArchReg::int(1)));
    assert_eq!(d.b, OperandB::Reg(ArchReg::int(31)));
    assert_eq!(d.disp, -4);
}

#[test]
fn operate_literal_replaces_rb() {
    let d = decode(addq_lit(3, 200, 4)).unwrap();
    assert_eq!(d.op, Operation::Int(IntOp::Addq));
    assert_eq!(d.a, Some(ArchReg::int(3)));
    assert_eq!(d.b, OperandB::Literal(200));
    assert_eq!(d.dest, Some(ArchReg::int(4)));
}

#[test]
fn store_reads_data_from_ra() {
    let d = decode(stq(5, 6, -16)).unwrap();
    assert_eq!(d.op, Operation::Store(StoreOp::Stq));
    assert_eq!(d.a, Some(ArchReg::int(5)));
    assert_eq!(d.b, OperandB::Reg(ArchReg::int(6)));
    assert_eq!(d.dest, None);
    assert_eq!(d.disp, -16);
}

/// Branch displacements are scaled to bytes.
#[rstest]
#[case::forward(beq(2, 3), Operation::Branch(BranchOp::Int(Cond::Eq)), 12)]
#[case::backward(br(-2), Operation::Branch(BranchOp::Br), -8)]
fn branch_displacement_in_bytes(#[case] word: u32, #[case] op: Operation, #[case] disp: i64) {
    let d = decode(word).unwrap();
    assert_eq!(d.op, op);
    assert_eq!(d.disp, disp);
}

/// Non-trapping operates writing R31 fold to no-ops.
#[rstest]
#[case::canonical(NOP)]
#[case::addq_to_zero(addq(1, 2, ZERO))]
#[case::lda_to_zero(li(ZERO, 5))]
fn writes_to_r31_are_nops(#[case] word: u32) {
    assert_eq!(decode(word).unwrap().op, Operation::Nop);
}

#[test]
fn pal_instructions() {
    let d = decode(call_pal(pal::CALLSYS)).unwrap();
    assert_eq!(d.op, Operation::System(SystemOp::CallPal(pal::CALLSYS)));
    assert!(!d.pal_only);
    assert!(decode(hw_mtpr(1, 0)).unwrap().pal_only);
}

#[rstest]
#[case::reserved_opcode(0x0400_0000)]
#[case::unknown_pal_function(call_pal(0x40))]
#[case::unknown_intl_function(0x4400_1FE0)]
fn reserved_encodings_are_illegal(#[case] word: u32) {
    assert_eq!(decode(word), Err(TrapKind::IllegalInstruction { word }));
}

proptest! {
    #[test]
    fn decode_is_pure(word in any::<u32>()) {
        let first = decode(word);
        prop_assert_eq!(first, decode(word));
        match first {
            Ok(d) => prop_assert_eq!(d.raw, word),
            Err(kind) => prop_assert_eq!(kind, TrapKind::IllegalInstruction { word }),
        }
    }
}
