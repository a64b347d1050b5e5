//! Commit Stage: in-order retirement and trap delivery.
//!
//! This stage retires instructions from the ROB head in program order:
//! 1. Take a pending interrupt at the retirement boundary, if enabled.
//! 2. Deliver the head's trap when it faulted, squashing the whole window.
//! 3. Free the previous mapping of each retired destination.
//! 4. Drain the retired store to memory.
//! 5. Apply deferred effects (lock flag, FPCR, IPR writes, PAL exit).
//! 6. Train the branch predictor with the resolved outcome.
//!
//! Nothing architectural changes anywhere else in the pipeline.

use tracing::{debug, trace};

use crate::common::error::{SimError, TrapEvent, TrapKind};
use crate::core::arch::fpcr::Fpcr;
use crate::core::arch::{ipr, trap};
use crate::core::pipeline::engine::{Engine, invariant};
use crate::core::pipeline::rob::{Effect, EntryState, InstructionEntry};
use crate::core::pipeline::signals::Operation;
use crate::core::units::fpu::exception_flags::FpFlags;
use crate::isa::instruction::InstructionBits;
use crate::isa::pal;
use crate::sim::StopReason;

/// Executes the commit stage.
///
/// # Returns
///
/// `Some` when a fault was delivered or CALL_PAL HALT retired; `run` stops.
///
/// # Errors
///
/// `SimError::Invariant` if a retiring store cannot be written or rename
/// bookkeeping is inconsistent.
pub fn commit_stage(engine: &mut Engine) -> Result<Option<StopReason>, SimError> {
    if interrupt_ready(engine) {
        take_interrupt(engine);
    }

    for _ in 0..engine.config.pipeline.retire_width {
        if engine.retire_budget == 0 {
            break;
        }
        let Some(head) = engine.rob.head() else {
            break;
        };
        match head.state {
            EntryState::Faulted => return Ok(deliver_fault(engine)),
            EntryState::Completed => {}
            EntryState::Issued | EntryState::Executing { .. } => break,
        }

        let entry = engine
            .rob
            .commit_head()
            .ok_or_else(|| invariant("completed head could not retire"))?;
        retire(engine, &entry)?;

        match entry.completion.effect {
            Effect::CallPal(function) => {
                if function == pal::HALT && engine.config.traps.halt_on_call_pal_halt {
                    debug!(pc = format_args!("{:#x}", entry.pc), "CALL_PAL HALT");
                    return Ok(Some(StopReason::Halted));
                }
                enter_pal(engine, &entry, function);
                engine.stats.pal_calls += 1;
            }
            _ if entry.decoded.op.refetches_after_retire() => {
                let pc = engine.commit_pc;
                engine.redirect(pc);
            }
            _ => {}
        }
    }
    Ok(None)
}

/// True when an interrupt may be taken before the next retirement.
///
/// A head that already read a device cannot be replayed, so the interrupt
/// waits until it retires.
fn interrupt_ready(engine: &Engine) -> bool {
    let status = &engine.status;
    let head_read_device = engine
        .rob
        .head()
        .is_some_and(|head| head.completion.device_read);
    engine.interrupt_pending && status.interrupt_enable && !status.pal_mode && !head_read_device
}

fn take_interrupt(engine: &mut Engine) {
    engine.flush_for_trap();
    let pc = engine.commit_pc;
    let event = trap::deliver(&mut engine.status, TrapKind::Interrupt, pc, 0, &engine.config.traps);
    finish_delivery(engine, &event);
    engine.interrupt_pending = false;
    engine.stats.interrupts += 1;
}

/// Delivers the trap of the faulted head.
///
/// Returns the stop reason for true faults; other traps continue in PALcode.
fn deliver_fault(engine: &mut Engine) -> Option<StopReason> {
    let head = engine.rob.head()?;
    let (pc, decoded) = (head.pc, head.decoded);
    let kind = head.trap?;
    engine.flush_for_trap();

    if let (Operation::Float(_), TrapKind::ArithmeticTrap { summary }) = (decoded.op, kind) {
        let fpcr = engine.status.fpcr.accrue(FpFlags::from_summary(summary));
        engine.status.fpcr = fpcr;
    }
    let event = trap::deliver(
        &mut engine.status,
        kind,
        pc,
        decoded.raw.opcode(),
        &engine.config.traps,
    );
    finish_delivery(engine, &event);
    engine.stats.faults += 1;
    kind.is_fault().then_some(StopReason::Trap(event))
}

/// Enters PALcode for a retired CALL_PAL.
fn enter_pal(engine: &mut Engine, entry: &InstructionEntry, function: u32) {
    engine.flush_for_trap();
    let kind = TrapKind::CallPal { function };
    let opcode = entry.decoded.raw.opcode();
    let event = trap::deliver(&mut engine.status, kind, entry.pc, opcode, &engine.config.traps);
    finish_delivery(engine, &event);
}

fn finish_delivery(engine: &mut Engine, event: &TrapEvent) {
    debug!(%event, "trap delivered");
    engine.commit_pc = event.handler;
    engine.redirect(event.handler);
    engine.last_retire_cycle = engine.cycle;
}

/// Makes a completed instruction architectural.
fn retire(engine: &mut Engine, entry: &InstructionEntry) -> Result<(), SimError> {
    if let Some(dest) = entry.dest {
        engine.renamer.commit(dest.arch, dest.phys, dest.prev)?;
    }

    if entry.has_store {
        let store = engine
            .store_buffer
            .retire(entry.seq)
            .ok_or_else(|| invariant(format!("store {} missing from store buffer", entry.seq)))?;
        if !store.suppressed {
            let addr = store
                .addr
                .ok_or_else(|| invariant(format!("store {} retired unresolved", entry.seq)))?;
            engine
                .bus
                .write(addr, store.width, store.data)
                .map_err(|err| invariant(format!("retired store failed: {err}")))?;
        }
    }

    let completion = &entry.completion;
    engine.status.fpcr = engine.status.fpcr.accrue(completion.flags);
    match completion.effect {
        Effect::None | Effect::CallPal(_) => {}
        Effect::LoadLocked(addr) => engine.lock.set(addr),
        Effect::StoreConditional => engine.lock.clear(),
        Effect::WriteFpcr(bits) => engine.status.fpcr = Fpcr::from_bits(bits),
        Effect::WriteIpr { index, value } => ipr::write(&mut engine.status, index, value),
        Effect::ReturnFromPal(target) => engine.status.pal_mode = target & 1 != 0,
        Effect::InterruptFlag(flag) => engine.status.interrupt_flag = flag,
    }

    if let (Operation::Branch(op), Some(resolution)) = (entry.decoded.op, completion.branch) {
        engine.branch_unit.train(op, entry.pc, &resolution);
        engine.renamer.discard_checkpoint(entry.seq);
    }

    engine.commit_pc = entry.next_pc();
    engine.stats.record_retire(entry.decoded.op);
    engine.retire_budget -= 1;
    engine.last_retire_cycle = engine.cycle;
    trace!(
        seq = entry.seq,
        pc = format_args!("{:#x}", entry.pc),
        op = ?entry.decoded.op,
        "retire"
    );
    Ok(())
}
