//! End-to-end program scenarios.
//!
//! Each test loads a short program, runs it through the full pipeline and
//! checks only architectural results: registers, memory, the PC and the
//! reported stop reason.

use axp_core::common::error::{ExceptionSummary, TrapKind};
use axp_core::config::{BranchPredictor, Config, TrapVector};
use axp_core::StopReason;
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::{ZERO, addq_lit, addt, beq, br, divt, li, stq};
use crate::common::harness::TestContext;

// ══════════════════════════════════════════════════════════
// 1. Straight-line retirement
// ══════════════════════════════════════════════════════════

/// LDA, ADDQ and STQ retire in order and their results are architectural.
#[test]
fn literal_add_store_retires_three() {
    let mut ctx = TestContext::new().load(&[li(1, 40), addq_lit(1, 2, 2), stq(2, ZERO, 0x1000)]);

    let outcome = ctx.run(3);

    assert_eq!(outcome.retired, 3);
    assert_eq!(outcome.stop, StopReason::Completed);
    assert_eq!(ctx.reg(1), 40);
    assert_eq!(ctx.reg(2), 42);
    assert_eq!(ctx.read_u64(0x1000), 42);
    assert_eq!(ctx.state().pc, ctx.pc_of(3));
}

/// `run` counts retired instructions and resumes where it stopped.
#[test]
fn run_resumes_at_quiescent_point() {
    let mut ctx = TestContext::new().load(&[li(1, 1), li(2, 2), li(3, 3), li(4, 4)]);

    assert_eq!(ctx.run(2).retired, 2);
    assert_eq!(ctx.state().pc, ctx.pc_of(2));
    assert_eq!(ctx.reg(3), 0);

    assert_eq!(ctx.run(2).retired, 2);
    assert_eq!(ctx.reg(3), 3);
    assert_eq!(ctx.reg(4), 4);
}

/// A dependent chain of T_floating adds sees each predecessor's result.
#[test]
fn dependent_fp_adds_chain() {
    let mut ctx = TestContext::new().load(&[addt(1, 2, 3), addt(3, 3, 4)]);
    ctx.sim.set_fp_reg(1, 1.5).unwrap();
    ctx.sim.set_fp_reg(2, 2.25).unwrap();

    assert_eq!(ctx.run(2).retired, 2);

    let state = ctx.state();
    assert_eq!(f64::from_bits(state.fp_regs[3]), 3.75);
    assert_eq!(f64::from_bits(state.fp_regs[4]), 7.5);
    assert_eq!(ctx.sim.stats().inst_fp, 2);
}

// ══════════════════════════════════════════════════════════
// 2. Precise arithmetic trap
// ══════════════════════════════════════════════════════════

/// A divide by zero at position 5 of 10 retires exactly the four older
/// instructions and reports the trap at its own PC.
#[test]
fn divide_by_zero_is_precise() {
    let program = [
        li(1, 1),
        li(2, 2),
        li(3, 3),
        li(4, 4),
        divt(1, ZERO, 3),
        li(5, 5),
        li(6, 6),
        li(7, 7),
        li(8, 8),
        li(9, 9),
    ];
    let mut ctx = TestContext::new().load(&program);
    ctx.sim.set_fp_reg(1, 1.0).unwrap();

    let outcome = ctx.run(10);

    assert_eq!(outcome.retired, 4);
    let StopReason::Trap(event) = outcome.stop else {
        panic!("expected a trap, got {:?}", outcome.stop);
    };
    let TrapKind::ArithmeticTrap { summary } = event.kind else {
        panic!("expected an arithmetic trap, got {:?}", event.kind);
    };
    assert_ne!(summary.bits() & ExceptionSummary::DZE.bits(), 0);
    assert_eq!(event.pc, ctx.pc_of(4));
    assert_eq!(event.handler, ctx.config.traps.handler(TrapVector::Arith));

    let state = ctx.state();
    assert_eq!(&state.int_regs[1..=4], &[1, 2, 3, 4]);
    assert_eq!(&state.int_regs[5..=9], &[0; 5]);
    assert_eq!(state.fp_regs[3], 0);
    assert_eq!(state.pc, event.handler);
    assert_eq!(state.status.exc_addr, ctx.pc_of(4));
    assert_eq!(state.status.exc_sum, summary);
    assert!(state.status.pal_mode);
    assert_eq!(ctx.sim.stats().faults, 1);
}

// ══════════════════════════════════════════════════════════
// 3. Branch misprediction
// ══════════════════════════════════════════════════════════

/// A branch predicted taken but resolved not-taken discards the taken path.
#[test]
fn mispredicted_taken_branch_resumes_on_fall_through() {
    let mut config = Config::default();
    config.pipeline.branch_predictor = BranchPredictor::AlwaysTaken;
    let program = [
        li(1, 1),
        beq(1, 2), // predicted taken to index 4, falls through
        li(2, 2),
        br(1), // to index 5
        li(3, 99),
        li(4, 4),
    ];
    let mut ctx = TestContext::with_config(config).load(&program);

    let outcome = ctx.run(5);

    assert_eq!(outcome.retired, 5);
    assert_eq!(outcome.stop, StopReason::Completed);
    assert_eq!(ctx.reg(2), 2);
    assert_eq!(ctx.reg(3), 0);
    assert_eq!(ctx.reg(4), 4);
    assert_eq!(ctx.state().pc, ctx.pc_of(6));
    let stats = ctx.sim.stats();
    assert!(stats.branch_mispredictions >= 1);
    assert!(stats.instructions_squashed >= 1);
    assert_eq!(stats.inst_branch, 2);
}

/// A store fetched on the predicted-taken path never reaches memory once the
/// branch resolves not-taken.
#[test]
fn store_on_mispredicted_path_is_never_written() {
    let mut config = Config::default();
    config.pipeline.branch_predictor = BranchPredictor::AlwaysTaken;
    let program = [
        li(1, 1),
        beq(1, 1), // predicted taken to the store, falls through
        br(1),     // over the store
        stq(1, ZERO, 0x1000),
        li(2, 2),
    ];
    let mut ctx = TestContext::with_config(config).load(&program);
    ctx.write_u64(0x1000, 0xDEAD);

    let outcome = ctx.run(4);

    assert_eq!(outcome.retired, 4);
    assert_eq!(outcome.stop, StopReason::Completed);
    assert_eq!(ctx.reg(2), 2);
    assert_eq!(ctx.state().pc, ctx.pc_of(5));
    assert_eq!(ctx.read_u64(0x1000), 0xDEAD);
    let stats = ctx.sim.stats();
    assert!(stats.branch_mispredictions >= 1);
    assert!(stats.instructions_squashed >= 1);
    assert_eq!(stats.inst_store, 0);
}
