//! Speculation Transparency Tests.
//!
//! The architectural result of a program must not depend on the branch
//! predictor: every predictor runs the same code to the same state.

use axp_core::StopReason;
use axp_core::config::{BranchPredictor, Config};
use axp_core::isa::pal;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::instruction::{
    NOP, ZERO, addq, addq_lit, bne, call_pal, jsr, lda, ldah, li, ret, subq_lit,
};
use crate::common::harness::TestContext;

fn context(predictor: BranchPredictor) -> TestContext {
    let mut config = Config::default();
    config.pipeline.branch_predictor = predictor;
    TestContext::with_config(config)
}

/// Sums 5 + 4 + 3 + 2 + 1 with a backward loop, then halts.
#[rstest]
#[case::static_bp(BranchPredictor::Static)]
#[case::always_taken(BranchPredictor::AlwaysTaken)]
#[case::gshare(BranchPredictor::GShare)]
#[case::tournament(BranchPredictor::Tournament)]
fn countdown_loop(#[case] predictor: BranchPredictor) {
    let program = [
        li(1, 5),
        addq(2, 1, 2),
        subq_lit(1, 1, 1),
        bne(1, -3),
        call_pal(pal::HALT),
    ];
    let mut ctx = context(predictor).load(&program);

    let outcome = ctx.run(100);

    assert_eq!(outcome.stop, StopReason::Halted);
    assert_eq!(outcome.retired, 1 + 3 * 5 + 1);
    assert_eq!(ctx.reg(2), 15);
    assert_eq!(ctx.reg(1), 0);
    assert_eq!(ctx.sim.stats().inst_branch, 5);
}

/// Two calls to the same subroutine return to their own call sites.
#[rstest]
#[case::static_bp(BranchPredictor::Static)]
#[case::tournament(BranchPredictor::Tournament)]
fn call_and_return(#[case] predictor: BranchPredictor) {
    let program = [
        ldah(27, ZERO, 2),
        lda(27, 27, 0x20), // R27 = index 8
        jsr(26, 27),
        jsr(26, 27),
        call_pal(pal::HALT),
        NOP,
        NOP,
        NOP,
        addq_lit(1, 10, 1),
        ret(26),
    ];
    let mut ctx = context(predictor).load(&program);
    assert_eq!(ctx.pc_of(8), 0x2_0020);

    let outcome = ctx.run(100);

    assert_eq!(outcome.stop, StopReason::Halted);
    assert_eq!(outcome.retired, 9);
    assert_eq!(ctx.reg(1), 20);
    assert_eq!(ctx.reg(26), ctx.pc_of(4));
}
