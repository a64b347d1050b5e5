//! Trap delivery.
//!
//! This module turns a [`TrapKind`] raised by a retiring instruction (or an
//! interrupt taken at a retirement boundary) into the architectural effects
//! of entering PALcode. It performs:
//! 1. **Vector Selection:** The 21264 PAL entry offset for each trap, or a configured override.
//! 2. **State Update:** EXC_ADDR, EXC_SUM, VA and MM_STAT, kernel mode and PAL mode.
//!
//! Squashing the pipeline is the caller's job; delivery only touches the
//! committed status.

use super::ipr;
use super::state::ProcessorStatus;
use crate::common::constants::INSTRUCTION_BYTES;
use crate::common::error::{AccessKind, FaultReason, TrapEvent, TrapKind};
use crate::config::{TrapConfig, TrapVector};
use crate::isa::pal;

/// Configured vector for a trap kind; `None` for CALL_PAL.
pub const fn vector(kind: &TrapKind) -> Option<TrapVector> {
    match kind {
        TrapKind::IllegalInstruction { .. } => Some(TrapVector::Opcdec),
        TrapKind::ArithmeticTrap { .. } => Some(TrapVector::Arith),
        TrapKind::MemoryFault {
            access: AccessKind::Fetch,
            ..
        } => Some(TrapVector::Iacv),
        TrapKind::MemoryFault {
            reason: FaultReason::Unaligned,
            ..
        } => Some(TrapVector::Unaligned),
        TrapKind::MemoryFault { .. } => Some(TrapVector::Dfault),
        TrapKind::Interrupt => Some(TrapVector::Interrupt),
        TrapKind::CallPal { .. } => None,
    }
}

/// Handler address for `kind` given the current PAL base.
///
/// Configured overrides are absolute; everything else is an offset from
/// `pal_base`, which PALcode may have moved with HW_MTPR.
pub fn handler(kind: &TrapKind, pal_base: u64, traps: &TrapConfig) -> u64 {
    match vector(kind) {
        Some(v) => traps
            .vectors
            .get(&v)
            .copied()
            .unwrap_or_else(|| pal_base.wrapping_add(v.default_offset())),
        None => {
            let function = match kind {
                TrapKind::CallPal { function } => *function,
                _ => 0,
            };
            let offset = pal::entry_offset(function).unwrap_or(pal::PRIVILEGED_ENTRY);
            pal_base.wrapping_add(offset)
        }
    }
}

/// Enters PALcode for `kind` raised by the instruction at `pc`.
///
/// `opcode` is the faulting instruction's primary opcode, recorded in
/// MM_STAT for data faults.
///
/// # Returns
///
/// The delivered event, carrying the handler the caller must redirect to.
pub fn deliver(
    status: &mut ProcessorStatus,
    kind: TrapKind,
    pc: u64,
    opcode: u32,
    traps: &TrapConfig,
) -> TrapEvent {
    let handler = handler(&kind, status.pal_base, traps);
    let resume = match kind {
        TrapKind::CallPal { .. } => pc.wrapping_add(INSTRUCTION_BYTES),
        _ => pc,
    };
    status.exc_addr = resume | u64::from(status.pal_mode);

    match kind {
        TrapKind::ArithmeticTrap { summary } => status.exc_sum = summary,
        TrapKind::MemoryFault {
            address,
            access,
            reason,
        } => {
            status.va = address;
            if access != AccessKind::Fetch {
                status.mm_stat = ipr::mm_stat(access, reason, opcode);
            }
        }
        _ => {}
    }

    status.mode = super::mode::ProcessorMode::Kernel;
    status.pal_mode = true;

    TrapEvent { kind, pc, handler }
}
