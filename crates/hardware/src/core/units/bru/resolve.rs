//! Branch evaluation.
//!
//! Computes the actual outcome of a control-flow instruction from its
//! renamed operands. The result is compared against the prediction made at
//! fetch; a mismatch squashes everything younger.

use crate::common::constants::INSTRUCTION_BYTES;
use crate::core::pipeline::signals::BranchOp;

/// Outcome of a resolved branch or jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BranchResolution {
    /// True if control leaves the fall-through path.
    pub taken: bool,
    /// PC of the next instruction to execute.
    pub next_pc: u64,
    /// Value written to Ra (the updated PC) for BR, BSR and jumps.
    pub link: Option<u64>,
}

/// Evaluates `op` at `pc`.
///
/// # Arguments
///
/// * `a`    - Ra/Fa value: the condition operand of conditional branches
/// * `b`    - Rb value: the target of computed jumps
/// * `disp` - Byte displacement from the updated PC
pub const fn resolve(op: BranchOp, pc: u64, a: u64, b: u64, disp: i64) -> BranchResolution {
    let updated = pc.wrapping_add(INSTRUCTION_BYTES);
    let target = updated.wrapping_add(disp as u64);
    let (taken, dest, link) = match op {
        BranchOp::Br | BranchOp::Bsr => (true, target, Some(updated)),
        BranchOp::Int(cond) => (cond.eval_int(a), target, None),
        BranchOp::Fp(cond) => (cond.eval_fp(a), target, None),
        BranchOp::Jump(_) => (true, b & !3, Some(updated)),
    };
    BranchResolution {
        taken,
        next_pc: if taken { dest } else { updated },
        link,
    }
}
