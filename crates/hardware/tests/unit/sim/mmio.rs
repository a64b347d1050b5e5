//! MMIO Tests.
//!
//! Device accesses have side effects, so each one must happen exactly once
//! and only for instructions that retire.

use axp_core::StopReason;
use axp_core::SimError;
use axp_core::common::error::MemoryError;
use axp_core::core::pipeline::signals::MemWidth;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::{ZERO, ldah, ldl, ldq, li, stq};
use crate::common::harness::TestContext;
use crate::common::mocks::device::{MockRegisters, MockedDevice};

/// Device window above the end of RAM.
const DEVICE_BASE: u64 = 0x1000_0000;

fn context_with(registers: MockRegisters, program: &[u32]) -> TestContext {
    let mut ctx = TestContext::new().load(program);
    ctx.sim
        .map_mmio(DEVICE_BASE, Box::new(MockedDevice::new(0x100, registers)))
        .unwrap();
    ctx
}

/// A device load and store each reach the device once, in program order.
#[test]
fn device_register_copy() {
    let mut registers = MockRegisters::new();
    let mut seq = mockall::Sequence::new();
    let _ = registers
        .expect_read()
        .with(eq(8), eq(MemWidth::Quad))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(0xCAFE_u64);
    let _ = registers
        .expect_write()
        .with(eq(0x10), eq(MemWidth::Quad), eq(0xCAFE))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    let program = [ldah(1, ZERO, 0x1000), ldq(2, 1, 8), stq(2, 1, 0x10)];
    let mut ctx = context_with(registers, &program);

    assert_eq!(ctx.run(3).retired, 3);
    assert_eq!(ctx.reg(2), 0xCAFE);
}

/// A narrow device load is formatted like any other load.
#[test]
fn device_longword_is_sign_extended() {
    let mut registers = MockRegisters::new();
    let _ = registers
        .expect_read()
        .with(eq(4), eq(MemWidth::Long))
        .times(1)
        .return_const(0x8000_0000_u64);
    let mut ctx = context_with(registers, &[ldah(1, ZERO, 0x1000), ldl(2, 1, 4)]);

    assert_eq!(ctx.run(2).retired, 2);
    assert_eq!(ctx.reg(2), 0xFFFF_FFFF_8000_0000);
}

/// A store younger than a faulting instruction never reaches the device.
#[test]
fn squashed_store_never_reaches_device() {
    let mut registers = MockRegisters::new();
    let _ = registers.expect_write().never();
    let program = [ldah(1, ZERO, 0x1000), li(2, 1), 0x0400_0000, stq(2, 1, 0)];
    let mut ctx = context_with(registers, &program);

    let outcome = ctx.run(4);

    assert_eq!(outcome.retired, 2);
    assert!(matches!(outcome.stop, StopReason::Trap(_)));
}

/// Device windows may not overlap.
#[test]
fn overlapping_windows_are_rejected() {
    let mut ctx = context_with(MockRegisters::new(), &[]);
    let second = MockedDevice::new(0x100, MockRegisters::new());

    let err = ctx
        .sim
        .map_mmio(DEVICE_BASE + 0x80, Box::new(second))
        .unwrap_err();

    assert!(matches!(
        err,
        SimError::Memory(MemoryError::OverlappingMmio { base, .. }) if base == DEVICE_BASE + 0x80
    ));
}
