//! Dispatch Stage: privilege checks, renaming, ROB and store buffer allocation.
//!
//! Takes instructions from the fetch queue in program order. Every resource
//! an instruction needs (ROB slot, physical register, checkpoint, store
//! buffer entry) is checked before any is taken, so a stall leaves no
//! partial state behind. Source operands are renamed before the
//! destination, so an instruction reading its own destination sees the
//! previous producer.

use tracing::trace;

use crate::common::error::{SimError, TrapKind};
use crate::core::arch::state::ProcessorStatus;
use crate::core::pipeline::engine::{Engine, invariant};
use crate::core::pipeline::rename::{Renamer, Source};
use crate::core::pipeline::rob::{EntryState, InstructionEntry, RenamedDest};
use crate::core::pipeline::signals::{Operation, SystemOp};
use crate::isa::instruction::{Decoded, OperandB};
use crate::isa::pal::{self, PalClass};

/// Rejects instructions the committed mode may not execute.
///
/// HW_* instructions need PAL mode; privileged CALL_PAL functions need
/// kernel mode (or PAL mode).
fn check_privilege(decoded: Decoded, status: &ProcessorStatus) -> Result<Decoded, TrapKind> {
    let illegal = TrapKind::IllegalInstruction { word: decoded.raw };
    if decoded.pal_only && !status.pal_mode {
        return Err(illegal);
    }
    if let Operation::System(SystemOp::CallPal(function)) = decoded.op {
        let privileged = pal::classify(function) == Some(PalClass::Privileged);
        if privileged && !status.mode.is_kernel() && !status.pal_mode {
            return Err(illegal);
        }
    }
    Ok(decoded)
}

/// Renames the three operand slots.
fn rename_sources(renamer: &Renamer, decoded: &Decoded) -> [Source; 3] {
    let reg = |r: Option<_>| r.map_or(Source::Ready(0), |r| renamer.source(r));
    let b = match decoded.b {
        OperandB::Reg(r) => renamer.source(r),
        OperandB::Literal(value) => Source::Ready(value),
        OperandB::None => Source::Ready(0),
    };
    [reg(decoded.a), b, reg(decoded.c)]
}

/// Executes the dispatch stage.
///
/// # Errors
///
/// `SimError::Invariant` if a resource that was checked free cannot be
/// allocated.
pub fn dispatch_stage(engine: &mut Engine) -> Result<(), SimError> {
    for _ in 0..engine.config.pipeline.dispatch_width {
        let Some(fetched) = engine.fetch_queue.front().copied() else {
            break;
        };
        if engine.rob.is_full() {
            engine.stats.stalls_rob += 1;
            break;
        }

        let decoded = match fetched
            .decoded
            .and_then(|d| check_privilege(d, &engine.status))
        {
            Ok(d) => d,
            Err(trap) => {
                let _ = engine.fetch_queue.pop_front();
                let raw = match trap {
                    TrapKind::IllegalInstruction { word } => word,
                    _ => 0,
                };
                let entry = InstructionEntry::faulted(fetched.pc, Decoded::blank(raw), trap);
                let _ = engine
                    .rob
                    .allocate(entry)
                    .ok_or_else(|| invariant("ROB full after capacity check"))?;
                continue;
            }
        };

        if let Some(dest) = decoded.dest
            && engine.renamer.free_count(dest.class) == 0
        {
            engine.stats.stalls_rename += 1;
            break;
        }
        if decoded.op.needs_checkpoint() && !engine.renamer.can_checkpoint() {
            engine.stats.stalls_checkpoint += 1;
            break;
        }
        let is_store = matches!(decoded.op, Operation::Store(_));
        if is_store && engine.store_buffer.is_full() {
            engine.stats.stalls_store_buffer += 1;
            break;
        }

        let _ = engine.fetch_queue.pop_front();
        let sources = rename_sources(&engine.renamer, &decoded);
        let mut entry = InstructionEntry::new(fetched.pc, decoded, sources);
        entry.prediction = fetched.prediction;
        entry.has_store = is_store;
        if let Some(arch) = decoded.dest {
            let (phys, prev) = engine.renamer.allocate(arch)?;
            entry.dest = Some(RenamedDest { arch, phys, prev });
        }
        if decoded.op == Operation::Nop {
            entry.state = EntryState::Completed;
        }

        let seq = engine
            .rob
            .allocate(entry)
            .ok_or_else(|| invariant("ROB full after capacity check"))?;
        if decoded.op.needs_checkpoint() {
            engine.renamer.checkpoint(seq)?;
        }
        if let Operation::Store(op) = decoded.op
            && !engine.store_buffer.allocate(seq, op.width())
        {
            return Err(invariant("store buffer full after capacity check"));
        }
        trace!(seq, pc = format_args!("{:#x}", fetched.pc), op = ?decoded.op, "dispatch");
    }
    Ok(())
}
