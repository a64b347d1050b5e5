//! The out-of-order execution engine.
//!
//! The engine owns every piece of in-flight state and advances it one cycle
//! at a time. Stages run in reverse pipeline order so that each one sees
//! the state its downstream neighbour left behind in the same cycle:
//! 1. **Commit:** Retires done instructions from the ROB head, or delivers the head's trap.
//! 2. **Writeback:** Publishes results whose latency has elapsed and detects mispredictions.
//! 3. **Issue:** Executes ready instructions out of order, within per-unit issue limits.
//! 4. **Dispatch:** Renames fetched instructions into the ROB and store buffer.
//! 5. **Fetch:** Reads instruction words along the predicted path.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::common::constants::ARCH_REGS;
use crate::common::error::{SimError, TrapKind};
use crate::common::reg::ArchReg;
use crate::config::{Config, LatencyConfig};
use crate::core::arch::state::{ArchitecturalState, ProcessorStatus};
use crate::core::pipeline::rename::{RenameError, Renamer};
use crate::core::pipeline::rob::Rob;
use crate::core::pipeline::signals::{FpArith, FpFormat, FpOp, IntOp, Operation};
use crate::core::pipeline::stages;
use crate::core::pipeline::store_buffer::StoreBuffer;
use crate::core::units::bru::{BranchUnit, Prediction};
use crate::core::units::lsu::atomic::LockFlag;
use crate::isa::instruction::Decoded;
use crate::sim::StopReason;
use crate::soc::Bus;
use crate::stats::SimStats;

/// An instruction word on its way from fetch to dispatch.
#[derive(Clone, Copy, Debug)]
pub struct FetchedInstruction {
    /// Address it was fetched from.
    pub pc: u64,
    /// Decoded form, or the fetch or decode fault to deliver in its place.
    pub decoded: Result<Decoded, TrapKind>,
    /// Predicted successor, for control transfers.
    pub prediction: Option<Prediction>,
}

/// Builds the error for a broken internal invariant.
pub(crate) fn invariant(message: impl Into<String>) -> SimError {
    let message = message.into();
    warn!(%message, "engine invariant violated");
    SimError::Invariant(message)
}

impl From<RenameError> for SimError {
    fn from(err: RenameError) -> Self {
        invariant(err.to_string())
    }
}

/// The Alpha 21264 execution engine.
#[derive(Debug)]
pub struct Engine {
    pub(crate) config: Config,
    pub(crate) bus: Bus,
    pub(crate) renamer: Renamer,
    pub(crate) rob: Rob,
    pub(crate) store_buffer: StoreBuffer,
    pub(crate) branch_unit: BranchUnit,
    pub(crate) fetch_queue: VecDeque<FetchedInstruction>,
    /// Next address fetch reads from.
    pub(crate) fetch_pc: u64,
    /// Fetch waits for a redirect (after a fault or a refetching instruction).
    pub(crate) fetch_stalled: bool,
    /// Committed processor status.
    pub(crate) status: ProcessorStatus,
    pub(crate) lock: LockFlag,
    /// Architectural PC: the next instruction to retire.
    pub(crate) commit_pc: u64,
    pub(crate) interrupt_pending: bool,
    pub(crate) cycle: u64,
    /// Instructions the current `run` may still retire.
    pub(crate) retire_budget: u64,
    pub(crate) last_retire_cycle: u64,
    pub(crate) stats: SimStats,
}

impl Engine {
    /// Builds an idle engine. `config` must already be validated.
    pub fn new(config: &Config) -> Self {
        let p = &config.pipeline;
        let status = ProcessorStatus {
            pal_mode: config.general.start_in_pal_mode,
            pal_base: config.traps.pal_base,
            ..ProcessorStatus::default()
        };
        debug!(
            rob = p.rob_size,
            int_regs = p.int_phys_regs,
            fp_regs = p.fp_phys_regs,
            predictor = ?p.branch_predictor,
            "engine configured"
        );
        Self {
            config: config.clone(),
            bus: Bus::new(&config.memory),
            renamer: Renamer::new(p.int_phys_regs, p.fp_phys_regs, p.max_checkpoints),
            rob: Rob::new(p.rob_size),
            store_buffer: StoreBuffer::new(p.store_buffer_size),
            branch_unit: BranchUnit::new(p),
            fetch_queue: VecDeque::with_capacity(p.fetch_queue_size),
            fetch_pc: config.general.start_pc,
            fetch_stalled: false,
            status,
            lock: LockFlag::default(),
            commit_pc: config.general.start_pc,
            interrupt_pending: false,
            cycle: 0,
            retire_budget: 0,
            last_retire_cycle: 0,
            stats: SimStats::default(),
        }
    }

    /// Advances one cycle.
    ///
    /// # Returns
    ///
    /// `Some` when retirement stopped on a fault or a halt.
    ///
    /// # Errors
    ///
    /// `SimError::Invariant` when internal bookkeeping is inconsistent or no
    /// instruction has retired for the configured number of cycles.
    pub fn tick(&mut self) -> Result<Option<StopReason>, SimError> {
        self.cycle += 1;
        self.stats.cycles += 1;

        if let Some(stop) = stages::commit_stage(self)? {
            return Ok(Some(stop));
        }
        stages::writeback_stage(self)?;
        stages::issue_stage(self);
        stages::dispatch_stage(self)?;
        stages::fetch_stage(self);

        let idle = self.cycle - self.last_retire_cycle;
        if idle > self.config.general.deadlock_cycles {
            return Err(invariant(format!(
                "no instruction retired for {idle} cycles (rob={}, pc={:#x})",
                self.rob.len(),
                self.commit_pc
            )));
        }
        Ok(None)
    }

    /// Runs until `budget` instructions retire or retirement stops.
    ///
    /// Fetch is throttled so that nothing beyond the budget enters the
    /// window, which leaves the engine quiescent when the budget runs out.
    ///
    /// # Returns
    ///
    /// The number of instructions retired and why the run ended.
    ///
    /// # Errors
    ///
    /// Propagates invariant violations from [`Engine::tick`].
    pub fn run(&mut self, budget: u64) -> Result<(u64, StopReason), SimError> {
        self.retire_budget = budget;
        self.last_retire_cycle = self.cycle;
        let start = self.stats.instructions_retired;
        let stop = loop {
            if self.retire_budget == 0 {
                break StopReason::Completed;
            }
            if let Some(stop) = self.tick()? {
                break stop;
            }
        };
        self.quiesce();
        Ok((self.stats.instructions_retired - start, stop))
    }

    /// Discards everything in flight and points fetch at the committed PC.
    pub(crate) fn quiesce(&mut self) {
        let squashed = self.rob.squash_all();
        if !squashed.is_empty() {
            self.stats.instructions_squashed += squashed.len() as u64;
            self.renamer.rollback_to_committed();
        }
        self.store_buffer.clear();
        self.fetch_queue.clear();
        self.fetch_pc = self.commit_pc;
        self.fetch_stalled = false;
    }

    /// Squashes every instruction younger than `seq` after a misprediction
    /// and redirects fetch to `target`.
    ///
    /// # Errors
    ///
    /// `SimError::Invariant` if a squashed register was not in use or the
    /// branch holds no checkpoint.
    pub(crate) fn recover_branch(&mut self, seq: u64, target: u64) -> Result<(), SimError> {
        self.renamer.rollback(seq)?;
        let squashed = self.rob.squash_after(seq);
        for entry in &squashed {
            if let Some(dest) = entry.dest {
                self.renamer.release(dest.phys)?;
            }
        }
        self.store_buffer.squash_after(seq);
        self.stats.instructions_squashed += squashed.len() as u64;
        debug!(seq, target = format_args!("{target:#x}"), squashed = squashed.len(), "branch recovery");
        self.redirect(target);
        Ok(())
    }

    /// Squashes the whole window ahead of trap delivery.
    pub(crate) fn flush_for_trap(&mut self) {
        let squashed = self.rob.squash_all();
        self.stats.instructions_squashed += squashed.len() as u64;
        self.renamer.rollback_to_committed();
        self.store_buffer.clear();
        self.lock.clear();
    }

    /// Points fetch at `pc`, dropping everything already fetched.
    pub(crate) fn redirect(&mut self, pc: u64) {
        self.fetch_queue.clear();
        self.fetch_pc = pc;
        self.fetch_stalled = false;
    }

    /// Cycles from issue until the result of `op` is visible.
    pub(crate) const fn latency(lat: &LatencyConfig, op: Operation) -> u64 {
        match op {
            Operation::Int(int) if int.is_multiply() => lat.imul,
            Operation::Int(IntOp::Ftoit | IntOp::Ftois) => lat.fp,
            Operation::Float(FpOp::Arith(FpArith::Div, FpFormat::S, _)) => lat.fdiv_s,
            Operation::Float(FpOp::Arith(FpArith::Div, FpFormat::T, _)) => lat.fdiv_t,
            Operation::Float(FpOp::Sqrt(FpFormat::S, _)) => lat.fsqrt_s,
            Operation::Float(FpOp::Sqrt(FpFormat::T, _)) => lat.fsqrt_t,
            Operation::Float(_) => lat.fp,
            Operation::Load(_) | Operation::Store(_) => lat.load,
            Operation::Int(_) | Operation::Branch(_) | Operation::System(_) | Operation::Nop => {
                lat.int
            }
        }
    }

    /// Snapshot of the committed architectural state.
    pub fn architectural_state(&self) -> ArchitecturalState {
        let mut int_regs = [0; ARCH_REGS];
        let mut fp_regs = [0; ARCH_REGS];
        for (i, (int, fp)) in int_regs.iter_mut().zip(fp_regs.iter_mut()).enumerate() {
            *int = self.renamer.committed_value(ArchReg::int(i as u8));
            *fp = self.renamer.committed_value(ArchReg::fp(i as u8));
        }
        ArchitecturalState {
            int_regs,
            fp_regs,
            pc: self.commit_pc,
            status: self.status,
            lock_flag: self.lock.is_set(),
        }
    }

    /// Moves the committed PC; the engine must be quiescent.
    pub(crate) fn set_pc(&mut self, pc: u64) {
        self.commit_pc = pc;
        self.redirect(pc);
    }

    /// Statistics gathered so far.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::signals::{FpQualifiers, LoadOp};

    #[test]
    fn latencies_follow_unit_classes() {
        let lat = LatencyConfig::default();
        assert_eq!(Engine::latency(&lat, Operation::Int(IntOp::Addq)), 1);
        assert_eq!(Engine::latency(&lat, Operation::Int(IntOp::Mulq)), 7);
        assert_eq!(Engine::latency(&lat, Operation::Load(LoadOp::Ldq)), 3);
        let divt = FpOp::Arith(FpArith::Div, FpFormat::T, FpQualifiers::NORMAL);
        assert_eq!(Engine::latency(&lat, Operation::Float(divt)), 15);
        let sqrts = FpOp::Sqrt(FpFormat::S, FpQualifiers::NORMAL);
        assert_eq!(Engine::latency(&lat, Operation::Float(sqrts)), 18);
    }

    #[test]
    fn new_engine_is_quiescent_at_start_pc() {
        let engine = Engine::new(&Config::default());
        let state = engine.architectural_state();
        assert_eq!(state.pc, engine.config.general.start_pc);
        assert!(engine.rob.is_empty());
        assert!(!state.status.pal_mode);
    }
}
