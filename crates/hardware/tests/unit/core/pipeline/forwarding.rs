//! Store-to-Load Forwarding Tests.
//!
//! Loads read the youngest older store that covers them, wait for older
//! stores with unknown addresses or partial overlap, and never observe
//! younger stores.

use pretty_assertions::assert_eq;

use crate::common::builder::instruction::{ZERO, ldl, ldq, li, stl, stq};
use crate::common::harness::TestContext;

/// A load fully covered by an older in-flight store takes the store's data.
#[test]
fn covered_load_is_forwarded() {
    let program = [li(2, 77), stq(2, ZERO, 0x1000), ldq(3, ZERO, 0x1000)];
    let mut ctx = TestContext::new().load(&program);

    assert_eq!(ctx.run(3).retired, 3);

    assert_eq!(ctx.reg(3), 77);
    assert_eq!(ctx.read_u64(0x1000), 77);
    assert!(ctx.sim.stats().loads_forwarded >= 1);
}

/// The youngest of several matching stores wins.
#[test]
fn youngest_older_store_wins() {
    let program = [
        li(2, 1),
        li(3, 2),
        stq(2, ZERO, 0x1000),
        stq(3, ZERO, 0x1000),
        ldq(4, ZERO, 0x1000),
    ];
    let mut ctx = TestContext::new().load(&program);

    assert_eq!(ctx.run(5).retired, 5);

    assert_eq!(ctx.reg(4), 2);
    assert_eq!(ctx.read_u64(0x1000), 2);
}

/// A narrower load inside a store forwards only its own bytes.
#[test]
fn narrow_load_takes_its_slice() {
    let program = [li(2, -2), stq(2, ZERO, 0x1000), ldl(3, ZERO, 0x1004)];
    let mut ctx = TestContext::new().load(&program);

    assert_eq!(ctx.run(3).retired, 3);

    // The upper longword of -2 is all ones; LDL sign-extends it.
    assert_eq!(ctx.reg(3), u64::MAX);
}

/// A partial overlap waits for the store to reach memory and then merges.
#[test]
fn partial_overlap_waits_for_memory() {
    let program = [li(2, 0x3333), stl(2, ZERO, 0x1004), ldq(3, ZERO, 0x1000)];
    let mut ctx = TestContext::new().load(&program);
    ctx.write_u64(0x1000, 0x1111_1111_2222_2222);

    assert_eq!(ctx.run(3).retired, 3);

    assert_eq!(ctx.reg(3), 0x0000_3333_2222_2222);
    assert!(ctx.sim.stats().load_retries >= 1);
}

/// A load never observes a younger store to the same address.
#[test]
fn younger_store_is_invisible() {
    let program = [li(2, 5), ldq(3, ZERO, 0x1000), stq(2, ZERO, 0x1000)];
    let mut ctx = TestContext::new().load(&program);
    ctx.write_u64(0x1000, 9);

    assert_eq!(ctx.run(3).retired, 3);

    assert_eq!(ctx.reg(3), 9);
    assert_eq!(ctx.read_u64(0x1000), 5);
}
