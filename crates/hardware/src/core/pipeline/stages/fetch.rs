//! Instruction Fetch Stage.
//!
//! Reads up to `fetch_width` instruction words along the predicted path,
//! decodes them and queues them for dispatch. Control transfers consult the
//! branch unit; a taken prediction ends the fetch block for the cycle.
//!
//! Fetch stops and waits for a redirect after:
//! - a fetch or decode fault (the faulting entry is queued so it traps in order);
//! - an instruction that changes state younger instructions depend on
//!   (CALL_PAL, HW_RET, HW_MTPR, MT_FPCR); they are refetched after it retires.

use tracing::trace;

use crate::common::constants::INSTRUCTION_BYTES;
use crate::core::pipeline::engine::{Engine, FetchedInstruction};
use crate::core::pipeline::signals::Operation;
use crate::isa::decode::decode;
use crate::isa::instruction::InstructionBits;

/// Executes the fetch stage.
///
/// Nothing is fetched beyond what the current run may retire, so the
/// window drains completely when the run's budget is reached.
pub fn fetch_stage(engine: &mut Engine) {
    let width = engine.config.pipeline.fetch_width;
    let queue_size = engine.config.pipeline.fetch_queue_size;

    for _ in 0..width {
        if engine.fetch_stalled || engine.fetch_queue.len() >= queue_size {
            break;
        }
        let in_flight = (engine.rob.len() + engine.fetch_queue.len()) as u64;
        if in_flight >= engine.retire_budget {
            break;
        }

        let pc = engine.fetch_pc;
        let decoded = engine
            .bus
            .fetch(pc, engine.status.mode, engine.status.pal_mode)
            .and_then(decode);

        let mut next_pc = pc.wrapping_add(INSTRUCTION_BYTES);
        let mut prediction = None;
        match &decoded {
            Err(_) => engine.fetch_stalled = true,
            Ok(d) => match d.op {
                Operation::Branch(op) => {
                    let p = engine.branch_unit.predict(op, pc, d.disp, d.raw.jump_hint());
                    next_pc = p.next_pc;
                    prediction = Some(p);
                }
                op if op.refetches_after_retire() => engine.fetch_stalled = true,
                _ => {}
            },
        }

        trace!(pc = format_args!("{pc:#x}"), next = format_args!("{next_pc:#x}"), "fetch");
        engine.fetch_queue.push_back(FetchedInstruction {
            pc,
            decoded,
            prediction,
        });
        engine.fetch_pc = next_pc;

        if prediction.is_some_and(|p| p.taken) {
            break;
        }
    }
}
