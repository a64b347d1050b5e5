//! Trap Delivery Tests.
//!
//! Verifies that faults stop `run` at the faulting instruction with the
//! right vector and IPR contents, that CALL_PAL and interrupts continue in
//! PALcode, and that HALT stops the engine.

use axp_core::StopReason;
use axp_core::common::error::{AccessKind, FaultReason, TrapEvent, TrapKind};
use axp_core::config::{Config, TrapVector};
use axp_core::core::arch::ipr;
use axp_core::isa::functions::ints;
use axp_core::isa::opcodes::OP_INTS;
use axp_core::isa::pal;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::instruction::{
    NOP, ZERO, addq_lit, call_pal, hw_mtpr, hw_ret, lda, ldah, ldq, ldq_l, li, opr_lit, stq_c,
};
use crate::common::harness::TestContext;

/// Opcode 0x01 is reserved on every Alpha.
const RESERVED: u32 = 0x0400_0000;

fn expect_trap(stop: StopReason) -> TrapEvent {
    match stop {
        StopReason::Trap(event) => event,
        other => panic!("expected a trap, got {other:?}"),
    }
}

/// Starts in PAL mode, runs `setup` and returns to native code at index 8
/// with the given CM and IER values.
fn native_context(cm: i16, enable_interrupts: bool, native: &[u32]) -> TestContext {
    let mut config = Config::default();
    config.general.start_in_pal_mode = true;
    let enable = if enable_interrupts { 1 } else { 0 };
    let program = [
        li(1, cm),
        hw_mtpr(1, ipr::CM),
        li(1, enable),
        opr_lit(OP_INTS, ints::SLL, 1, 33, 1),
        hw_mtpr(1, ipr::IER),
        ldah(2, ZERO, 2),
        lda(2, 2, 0x20),
        hw_ret(2),
    ];
    let mut ctx = TestContext::with_config(config).load(&program);
    let native_pc = ctx.pc_of(8);
    ctx = ctx.load_at(native_pc, native);
    assert_eq!(ctx.run(8).retired, 8);
    assert_eq!(ctx.state().pc, native_pc);
    assert!(!ctx.state().status.pal_mode);
    ctx
}

// ══════════════════════════════════════════════════════════
// 1. Faults
// ══════════════════════════════════════════════════════════

/// Reserved opcodes trap to OPCDEC without retiring.
#[test]
fn reserved_opcode_is_illegal() {
    let mut ctx = TestContext::new().load(&[li(1, 1), RESERVED, li(2, 2)]);

    let outcome = ctx.run(3);

    assert_eq!(outcome.retired, 1);
    let event = expect_trap(outcome.stop);
    assert_eq!(event.kind, TrapKind::IllegalInstruction { word: RESERVED });
    assert_eq!(event.pc, ctx.pc_of(1));
    assert_eq!(event.handler, ctx.config.traps.handler(TrapVector::Opcdec));
    assert_eq!(ctx.reg(2), 0);
}

/// Misaligned and out-of-range loads report the right fault, and a range
/// violation outranks misalignment.
#[rstest]
#[case::unaligned(0, 0x1004, FaultReason::Unaligned, TrapVector::Unaligned)]
#[case::out_of_range(0x100, 0, FaultReason::AccessViolation, TrapVector::Dfault)]
#[case::out_of_range_and_unaligned(0x100, 4, FaultReason::AccessViolation, TrapVector::Dfault)]
fn load_faults(
    #[case] high: i16,
    #[case] low: i16,
    #[case] reason: FaultReason,
    #[case] vector: TrapVector,
) {
    let address = ((high as u64) << 16) + low as u64;
    let mut ctx = TestContext::new().load(&[ldah(1, ZERO, high), ldq(2, 1, low)]);

    let event = expect_trap(ctx.run(2).stop);

    assert_eq!(
        event.kind,
        TrapKind::MemoryFault {
            address,
            access: AccessKind::Read,
            reason,
        }
    );
    assert_eq!(event.pc, ctx.pc_of(1));
    assert_eq!(event.handler, ctx.config.traps.handler(vector));
    let status = ctx.state().status;
    assert_eq!(status.va, address);
    assert_eq!(ipr::read(&status, ipr::VA), address);
}

/// Configured vector overrides are absolute.
#[test]
fn vector_override_is_used() {
    let mut config = Config::default();
    let _ = config.traps.vectors.insert(TrapVector::Opcdec, 0x4_0000);
    let mut ctx = TestContext::with_config(config).load(&[RESERVED]);

    let event = expect_trap(ctx.run(1).stop);

    assert_eq!(event.handler, 0x4_0000);
    assert_eq!(ctx.state().pc, 0x4_0000);
}

// ══════════════════════════════════════════════════════════
// 2. PALcode entry
// ══════════════════════════════════════════════════════════

/// CALL_PAL HALT stops `run` after retiring.
#[test]
fn halt_stops_the_engine() {
    let mut ctx = TestContext::new().load(&[li(1, 1), call_pal(pal::HALT), li(2, 2)]);

    let outcome = ctx.run(10);

    assert_eq!(outcome.stop, StopReason::Halted);
    assert_eq!(outcome.retired, 2);
    assert_eq!(ctx.reg(2), 0);
    assert_eq!(ctx.state().pc, ctx.pc_of(2));
}

/// HALT is privileged: user mode gets OPCDEC instead.
#[test]
fn halt_in_user_mode_is_illegal() {
    let mut ctx = native_context(0x18, false, &[call_pal(pal::HALT)]);

    let outcome = ctx.run(1);

    assert_eq!(outcome.retired, 0);
    let event = expect_trap(outcome.stop);
    assert_eq!(event.kind, TrapKind::IllegalInstruction { word: call_pal(pal::HALT) });
    assert_eq!(event.pc, ctx.pc_of(8));
    assert!(ctx.state().status.mode.is_kernel());
}

/// HW_* instructions are illegal outside PAL mode.
#[test]
fn hw_instructions_need_pal_mode() {
    let mut ctx = TestContext::new().load(&[hw_mtpr(1, ipr::PAL_BASE)]);

    let event = expect_trap(ctx.run(1).stop);

    assert!(matches!(event.kind, TrapKind::IllegalInstruction { .. }));
    assert_eq!(ctx.state().status.pal_base, ctx.config.traps.pal_base);
}

/// Unprivileged CALL_PAL enters PALcode at its own entry and continues there.
#[test]
fn callsys_enters_pal_and_continues() {
    let mut ctx = TestContext::new().load(&[call_pal(pal::CALLSYS), li(1, 1)]);
    let entry = ctx.config.traps.pal_base + pal::UNPRIVILEGED_ENTRY + 0x03 * pal::ENTRY_STRIDE;
    ctx = ctx.load_at(entry, &[li(5, 5), call_pal(pal::HALT)]);

    let outcome = ctx.run(10);

    assert_eq!(outcome.stop, StopReason::Halted);
    assert_eq!(outcome.retired, 3);
    let state = ctx.state();
    assert_eq!(state.int(5), 5);
    assert_eq!(state.int(1), 0);
    assert_eq!(state.status.exc_addr, ctx.pc_of(1));
    assert!(state.status.pal_mode);
    assert_eq!(ctx.sim.stats().pal_calls, 1);
}

// ══════════════════════════════════════════════════════════
// 3. Interrupts
// ══════════════════════════════════════════════════════════

/// A raised interrupt is taken at the next retirement boundary.
#[test]
fn interrupt_is_taken_between_instructions() {
    let mut ctx = native_context(0, true, &[li(4, 4), li(5, 5)]);
    ctx.sim.raise_interrupt().unwrap();

    let outcome = ctx.run(5);

    // The interrupt vector holds zeros, which decode as CALL_PAL HALT.
    assert_eq!(outcome.stop, StopReason::Halted);
    let state = ctx.state();
    assert_eq!(state.int(4), 0);
    assert_eq!(state.status.exc_addr, ctx.pc_of(8));
    assert_eq!(
        state.pc,
        ctx.config.traps.handler(TrapVector::Interrupt) + 4
    );
    assert_eq!(ctx.sim.stats().interrupts, 1);
}

/// Interrupts wait while IER is clear.
#[test]
fn interrupt_waits_while_disabled() {
    let mut ctx = native_context(0, false, &[li(4, 4), li(5, 5)]);
    ctx.sim.raise_interrupt().unwrap();

    let outcome = ctx.run(2);

    assert_eq!(outcome.stop, StopReason::Completed);
    assert_eq!(ctx.reg(5), 5);
    assert_eq!(ctx.sim.stats().interrupts, 0);
}

// ══════════════════════════════════════════════════════════
// 4. Lock flag
// ══════════════════════════════════════════════════════════

/// LDQ_L / STQ_C succeed when nothing intervenes.
#[test]
fn locked_increment_succeeds() {
    let program = [li(1, 0x1000), ldq_l(2, 1, 0), addq_lit(2, 1, 2), stq_c(2, 1, 0)];
    let mut ctx = TestContext::new().load(&program);
    ctx.write_u64(0x1000, 41);

    assert_eq!(ctx.run(4).retired, 4);

    assert_eq!(ctx.reg(2), 1);
    assert_eq!(ctx.read_u64(0x1000), 42);
    assert!(!ctx.state().lock_flag);
}

/// STQ_C without a preceding LDQ_L fails and stores nothing.
#[test]
fn store_conditional_without_lock_fails() {
    let program = [li(1, 0x1000), li(2, 7), stq_c(2, 1, 0)];
    let mut ctx = TestContext::new().load(&program);

    assert_eq!(ctx.run(3).retired, 3);

    assert_eq!(ctx.reg(2), 0);
    assert_eq!(ctx.read_u64(0x1000), 0);
}

/// A host write between LDQ_L and STQ_C breaks the lock.
#[test]
fn host_write_breaks_the_lock() {
    let program = [li(1, 0x1000), ldq_l(2, 1, 0), stq_c(2, 1, 0)];
    let mut ctx = TestContext::new().load(&program);

    assert_eq!(ctx.run(2).retired, 2);
    assert!(ctx.state().lock_flag);
    ctx.write_u64(0x1000, 9);
    assert_eq!(ctx.run(1).retired, 1);

    assert_eq!(ctx.reg(2), 0);
    assert_eq!(ctx.read_u64(0x1000), 9);
}

/// Trap delivery clears the lock flag.
#[test]
fn trap_clears_the_lock() {
    let program = [li(1, 0x1000), ldq_l(2, 1, 0), NOP, RESERVED];
    let mut ctx = TestContext::new().load(&program);

    assert_eq!(ctx.run(3).retired, 3);
    assert!(ctx.state().lock_flag);
    let _ = expect_trap(ctx.run(1).stop);

    assert!(!ctx.state().lock_flag);
}
