//! Statistics Tests.
//!
//! Counters gathered from a real run, and their JSON and text reports.

use axp_core::stats::{STATS_SECTIONS, SimStats};
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::{ZERO, bne, ldq, li, stq, subq_lit};
use crate::common::harness::TestContext;

fn loop_stats() -> SimStats {
    let program = [
        li(1, 4),
        stq(1, ZERO, 0x1000),
        ldq(2, ZERO, 0x1000),
        subq_lit(1, 1, 1),
        bne(1, -4),
    ];
    let mut ctx = TestContext::new().load(&program);
    assert_eq!(ctx.run(17).retired, 17);
    ctx.sim.stats().clone()
}

#[test]
fn run_counts_the_instruction_mix() {
    let stats = loop_stats();
    assert_eq!(stats.instructions_retired, 17);
    assert_eq!(stats.inst_store, 4);
    assert_eq!(stats.inst_load, 4);
    assert_eq!(stats.inst_branch, 4);
    assert_eq!(stats.inst_int, 5);
    assert!(stats.cycles >= 17 / 4);
    assert!(stats.ipc() > 0.0);
    assert!(stats.branch_mispredictions <= stats.branch_lookups);
}

#[test]
fn json_report_is_flat() {
    let stats = loop_stats();
    let value: serde_json::Value = serde_json::from_str(&stats.to_json().unwrap()).unwrap();
    assert_eq!(value["instructions_retired"], 17);
    assert_eq!(value["inst_load"], 4);
    assert!(value["branch_mispredictions"].is_u64());
    assert!(value["loads_forwarded"].is_u64());
}

#[test]
fn sections_can_be_selected() {
    let stats = loop_stats();

    let speculation = stats.render_sections(&["speculation"]);
    assert!(speculation.contains("bp.mispredicts"));
    assert!(!speculation.contains("sim_ipc"));
    assert!(!speculation.contains("traps.faults"));

    let everything = stats.render_sections(&[]);
    assert_eq!(everything, stats.render_sections(STATS_SECTIONS));
    assert_eq!(everything, stats.to_string());
}
