//! Issue Stage: out-of-order selection and execution.
//!
//! Scans the window oldest first and executes every `Issued` entry whose
//! operands are ready, up to the per-unit issue limit for the cycle.
//! Serializing instructions (system operations, STx_C and device loads)
//! execute only once they reach the head of the ROB. Units never touch
//! architectural state: they return a [`UnitOutcome`] and the entry
//! carries its result and deferred effects to retirement.

use tracing::trace;

use crate::common::error::{AccessKind, FaultReason, TrapKind};
use crate::config::IssueConfig;
use crate::core::arch::ipr;
use crate::core::pipeline::engine::Engine;
use crate::core::pipeline::rob::{Completion, Effect, EntryState, UnitOutcome};
use crate::core::pipeline::signals::{FuTarget, LoadOp, Operation, StoreOp, SystemOp};
use crate::core::units::alu::{Alu, IntOperands};
use crate::core::units::bru::resolve;
use crate::core::units::fpu::Fpu;
use crate::core::units::lsu::Lsu;
use crate::core::units::lsu::ordering::LoadSource;
use crate::isa::instruction::Decoded;

/// Issue slots left in the current cycle.
#[derive(Clone, Copy, Debug)]
struct IssueSlots {
    ebox: usize,
    fbox: usize,
    mbox: usize,
}

impl IssueSlots {
    const fn new(config: &IssueConfig) -> Self {
        Self {
            ebox: config.int_units,
            fbox: config.fp_units,
            mbox: config.mem_units,
        }
    }

    const fn slot(&mut self, unit: FuTarget) -> &mut usize {
        match unit {
            FuTarget::Ebox => &mut self.ebox,
            FuTarget::Fbox => &mut self.fbox,
            FuTarget::Mbox => &mut self.mbox,
        }
    }

    const fn is_exhausted(&self) -> bool {
        self.ebox == 0 && self.fbox == 0 && self.mbox == 0
    }
}

/// Executes the issue stage.
pub fn issue_stage(engine: &mut Engine) {
    let mut slots = IssueSlots::new(&engine.config.pipeline.issue);
    let head = engine.rob.head_seq();

    for seq in engine.rob.seqs() {
        if slots.is_exhausted() {
            break;
        }
        let Some(entry) = engine.rob.get(seq) else {
            break;
        };
        if entry.state != EntryState::Issued {
            continue;
        }
        let op = entry.decoded.op;
        if op.is_serializing() && seq != head {
            continue;
        }
        let unit = op.unit();
        if *slots.slot(unit) == 0 {
            continue;
        }
        let Some(operands) = read_operands(engine, seq) else {
            continue;
        };
        let (pc, decoded) = (entry.pc, entry.decoded);

        let outcome = execute(engine, seq, pc, &decoded, operands, seq == head);
        let ready_at = engine.cycle + Engine::latency(&engine.config.pipeline.latency, op);
        let Some(entry) = engine.rob.get_mut(seq) else {
            break;
        };
        match outcome {
            UnitOutcome::Done(completion) => {
                entry.completion = completion;
                entry.state = EntryState::Executing { ready_at };
            }
            UnitOutcome::Fault(trap) => {
                entry.trap = Some(trap);
                entry.state = EntryState::Faulted;
            }
            UnitOutcome::Retry => continue,
        }
        *slots.slot(unit) -= 1;
        trace!(seq, pc = format_args!("{pc:#x}"), ?outcome, "issue");
    }
}

/// Operand values of entry `seq`, if all of them are available.
fn read_operands(engine: &Engine, seq: u64) -> Option<[u64; 3]> {
    let entry = engine.rob.get(seq)?;
    let [a, b, c] = entry.sources;
    Some([
        engine.renamer.resolve(a)?,
        engine.renamer.resolve(b)?,
        engine.renamer.resolve(c)?,
    ])
}

/// Presents an instruction to its functional unit.
fn execute(
    engine: &mut Engine,
    seq: u64,
    pc: u64,
    decoded: &Decoded,
    [a, b, c]: [u64; 3],
    at_head: bool,
) -> UnitOutcome {
    let done = UnitOutcome::Done;
    match decoded.op {
        Operation::Int(op) => {
            let operands = IntOperands {
                a,
                b,
                c,
                disp: decoded.disp,
            };
            match Alu::execute(op, operands) {
                Ok(value) => done(Completion::value(value)),
                Err(trap) => UnitOutcome::Fault(trap),
            }
        }
        Operation::Float(op) => match Fpu::execute(op, a, b, c, engine.status.fpcr) {
            Ok(result) => done(Completion {
                value: result.value,
                flags: result.flags,
                ..Completion::default()
            }),
            Err(trap) => UnitOutcome::Fault(trap),
        },
        Operation::Load(op) => execute_load(engine, seq, op, b, decoded.disp, at_head),
        Operation::Store(op) => execute_store(engine, seq, op, a, b, decoded.disp),
        Operation::Branch(op) => {
            let resolution = resolve(op, pc, a, b, decoded.disp);
            done(Completion {
                value: resolution.link.unwrap_or(0),
                branch: Some(resolution),
                ..Completion::default()
            })
        }
        Operation::System(op) => done(execute_system(engine, op, a, b)),
        Operation::Nop => done(Completion::default()),
    }
}

fn execute_load(
    engine: &mut Engine,
    seq: u64,
    op: LoadOp,
    base: u64,
    disp: i64,
    at_head: bool,
) -> UnitOutcome {
    let addr = Lsu::load_address(op, base, disp);
    let width = op.width();
    let status = &engine.status;
    let checked = engine
        .bus
        .check(addr, width.bytes(), AccessKind::Read, status.mode, status.pal_mode)
        .and_then(|()| Lsu::check_alignment(addr, width, AccessKind::Read));
    if let Err(trap) = checked {
        return UnitOutcome::Fault(trap);
    }

    let mut completion = Completion::default();
    let raw = if engine.bus.is_mmio(addr, width) {
        // Device reads have side effects and run only when non-speculative.
        if !at_head {
            return UnitOutcome::Retry;
        }
        completion.device_read = true;
        match engine.bus.read(addr, width) {
            Ok(raw) => raw,
            Err(_) => return UnitOutcome::Fault(access_violation(addr)),
        }
    } else {
        match engine.store_buffer.forward(seq, addr, width) {
            LoadSource::Memory => match engine.bus.peek(addr, width) {
                Some(raw) => raw,
                None => return UnitOutcome::Fault(access_violation(addr)),
            },
            LoadSource::Forwarded(raw) => {
                engine.stats.loads_forwarded += 1;
                raw
            }
            LoadSource::Retry => {
                engine.stats.load_retries += 1;
                return UnitOutcome::Retry;
            }
        }
    };

    completion.value = Lsu::load_result(op, raw);
    if op.is_locked() {
        completion.effect = Effect::LoadLocked(addr);
    }
    UnitOutcome::Done(completion)
}

const fn access_violation(addr: u64) -> TrapKind {
    TrapKind::MemoryFault {
        address: addr,
        access: AccessKind::Read,
        reason: FaultReason::AccessViolation,
    }
}

fn execute_store(
    engine: &mut Engine,
    seq: u64,
    op: StoreOp,
    data: u64,
    base: u64,
    disp: i64,
) -> UnitOutcome {
    let addr = Lsu::store_address(op, base, disp);
    let width = op.width();
    let status = &engine.status;
    let checked = engine
        .bus
        .check(addr, width.bytes(), AccessKind::Write, status.mode, status.pal_mode)
        .and_then(|()| Lsu::check_alignment(addr, width, AccessKind::Write));
    if let Err(trap) = checked {
        return UnitOutcome::Fault(trap);
    }

    let data = Lsu::store_data(op, data);
    if !op.is_conditional() {
        engine.store_buffer.resolve(seq, addr, data);
        return UnitOutcome::Done(Completion::default());
    }

    // STx_C runs at the head, so the lock flag is current.
    let success = engine.lock.holds(addr);
    if success {
        engine.store_buffer.resolve(seq, addr, data);
    } else {
        engine.store_buffer.suppress(seq, addr);
    }
    UnitOutcome::Done(Completion {
        value: u64::from(success),
        effect: Effect::StoreConditional,
        ..Completion::default()
    })
}

/// System operations run at the head and read committed status directly.
fn execute_system(engine: &Engine, op: SystemOp, a: u64, b: u64) -> Completion {
    let status = &engine.status;
    let effect_only = |effect| Completion {
        effect,
        ..Completion::default()
    };
    match op {
        SystemOp::CallPal(function) => effect_only(Effect::CallPal(function)),
        SystemOp::Barrier(_) => Completion::default(),
        SystemOp::Rpcc => Completion::value(engine.cycle),
        SystemOp::Rc | SystemOp::Rs => Completion {
            value: u64::from(status.interrupt_flag),
            effect: Effect::InterruptFlag(op == SystemOp::Rs),
            ..Completion::default()
        },
        SystemOp::MtFpcr => effect_only(Effect::WriteFpcr(a)),
        SystemOp::MfFpcr => Completion::value(status.fpcr.bits()),
        SystemOp::HwMfpr(index) => Completion::value(ipr::read(status, index)),
        SystemOp::HwMtpr(index) => effect_only(Effect::WriteIpr { index, value: b }),
        SystemOp::HwRet => effect_only(Effect::ReturnFromPal(b)),
    }
}
