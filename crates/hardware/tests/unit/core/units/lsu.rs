//! Mbox Tests.
//!
//! Address formation, alignment and register formatting of loads and stores.

use axp_core::common::error::{AccessKind, FaultReason, TrapKind};
use axp_core::core::pipeline::signals::{LoadOp, MemWidth, StoreOp};
use axp_core::core::units::lsu::Lsu;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::byte_anywhere(0x1003, MemWidth::Byte, true)]
#[case::word_even(0x1002, MemWidth::Word, true)]
#[case::word_odd(0x1001, MemWidth::Word, false)]
#[case::long_aligned(0x1004, MemWidth::Long, true)]
#[case::long_off_by_two(0x1006, MemWidth::Long, false)]
#[case::quad_aligned(0x1008, MemWidth::Quad, true)]
#[case::quad_on_long_boundary(0x1004, MemWidth::Quad, false)]
fn natural_alignment(#[case] addr: u64, #[case] width: MemWidth, #[case] aligned: bool) {
    let result = Lsu::check_alignment(addr, width, AccessKind::Write);
    if aligned {
        assert_eq!(result, Ok(()));
    } else {
        assert_eq!(
            result,
            Err(TrapKind::MemoryFault {
                address: addr,
                access: AccessKind::Write,
                reason: FaultReason::Unaligned,
            })
        );
    }
}

/// LDQ_U and STQ_U address the containing quadword.
#[test]
fn unaligned_quadword_forms_clear_low_bits() {
    assert_eq!(Lsu::load_address(LoadOp::LdqU, 0x1000, 0xB), 0x1008);
    assert_eq!(Lsu::store_address(StoreOp::StqU, 0x1007, 0), 0x1000);
    assert_eq!(Lsu::load_address(LoadOp::Ldq, 0x1000, -8), 0xFF8);
}

#[rstest]
#[case::ldbu_zero_extends(LoadOp::Ldbu, 0xFF, 0xFF)]
#[case::ldwu_zero_extends(LoadOp::Ldwu, 0x8000, 0x8000)]
#[case::ldl_sign_extends(LoadOp::Ldl, 0x8000_0000, 0xFFFF_FFFF_8000_0000)]
#[case::ldq_passes_through(LoadOp::Ldq, u64::MAX, u64::MAX)]
fn load_results(#[case] op: LoadOp, #[case] raw: u64, #[case] expected: u64) {
    assert_eq!(Lsu::load_result(op, raw), expected);
}

/// LDS and STS convert between memory S_floating and register format.
#[test]
fn s_floating_round_trips_through_register_format() {
    let one = 1.0f32.to_bits();
    let reg = Lsu::load_result(LoadOp::Lds, u64::from(one));
    assert_eq!(reg, 1.0f64.to_bits());
    assert_eq!(Lsu::store_data(StoreOp::Sts, reg), u64::from(one));
}
