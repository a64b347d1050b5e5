//! Register Renaming Tests.
//!
//! Random straight-line programs run through the pipeline must leave the
//! same registers as a sequential reference interpreter, whatever the size
//! of the physical register pool.

use axp_core::StopReason;
use axp_core::config::Config;
use proptest::prelude::*;

use crate::common::builder::instruction::{addq, addq_lit, bis, li, subq, xor};
use crate::common::harness::TestContext;

/// Registers the generated programs use (R0-R7).
const REGS: u32 = 8;

#[derive(Clone, Copy, Debug)]
enum Step {
    Li(u32, i16),
    Addq(u32, u32, u32),
    AddqLit(u32, u8, u32),
    Subq(u32, u32, u32),
    Xor(u32, u32, u32),
    Mov(u32, u32),
}

impl Step {
    const fn encode(self) -> u32 {
        match self {
            Self::Li(rc, v) => li(rc, v),
            Self::Addq(a, b, c) => addq(a, b, c),
            Self::AddqLit(a, lit, c) => addq_lit(a, lit, c),
            Self::Subq(a, b, c) => subq(a, b, c),
            Self::Xor(a, b, c) => xor(a, b, c),
            Self::Mov(b, c) => bis(31, b, c),
        }
    }

    fn apply(self, regs: &mut [u64; REGS as usize]) {
        let r = |i: u32| regs[i as usize];
        let (dest, value) = match self {
            Self::Li(c, v) => (c, v as i64 as u64),
            Self::Addq(a, b, c) => (c, r(a).wrapping_add(r(b))),
            Self::AddqLit(a, lit, c) => (c, r(a).wrapping_add(u64::from(lit))),
            Self::Subq(a, b, c) => (c, r(a).wrapping_sub(r(b))),
            Self::Xor(a, b, c) => (c, r(a) ^ r(b)),
            Self::Mov(b, c) => (c, r(b)),
        };
        regs[dest as usize] = value;
    }
}

fn step() -> impl Strategy<Value = Step> {
    let reg = || 0..REGS;
    prop_oneof![
        (reg(), any::<i16>()).prop_map(|(c, v)| Step::Li(c, v)),
        (reg(), reg(), reg()).prop_map(|(a, b, c)| Step::Addq(a, b, c)),
        (reg(), any::<u8>(), reg()).prop_map(|(a, l, c)| Step::AddqLit(a, l, c)),
        (reg(), reg(), reg()).prop_map(|(a, b, c)| Step::Subq(a, b, c)),
        (reg(), reg(), reg()).prop_map(|(a, b, c)| Step::Xor(a, b, c)),
        (reg(), reg()).prop_map(|(b, c)| Step::Mov(b, c)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pipeline_matches_sequential_reference(
        steps in prop::collection::vec(step(), 1..60),
        phys in 33usize..48,
    ) {
        let mut config = Config::default();
        config.pipeline.int_phys_regs = phys;
        let program: Vec<u32> = steps.iter().map(|s| s.encode()).collect();
        let mut ctx = TestContext::with_config(config).load(&program);

        let mut expected = [0u64; REGS as usize];
        for s in &steps {
            s.apply(&mut expected);
        }

        let outcome = ctx.run(steps.len() as u64);
        prop_assert_eq!(outcome.stop, StopReason::Completed);
        prop_assert_eq!(outcome.retired, steps.len() as u64);
        let state = ctx.state();
        prop_assert_eq!(&state.int_regs[..REGS as usize], &expected[..]);
    }

    #[test]
    fn split_runs_match_one_run(
        steps in prop::collection::vec(step(), 2..40),
        split in 1usize..39,
    ) {
        let split = split.min(steps.len() - 1);
        let program: Vec<u32> = steps.iter().map(|s| s.encode()).collect();

        let mut whole = TestContext::new().load(&program);
        let _ = whole.run(steps.len() as u64);

        let mut parts = TestContext::new().load(&program);
        let first = parts.run(split as u64);
        let second = parts.run((steps.len() - split) as u64);

        prop_assert_eq!(first.retired + second.retired, steps.len() as u64);
        prop_assert_eq!(whole.state().int_regs, parts.state().int_regs);
    }
}
