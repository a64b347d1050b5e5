//! Simulator: the host-facing handle to the execution engine.
//!
//! The simulator owns the engine and guards it. It performs:
//! 1. **Configuration:** Validates the configuration once, at construction.
//! 2. **Execution:** `step` and `run`, which always return at a quiescent point.
//! 3. **State Access:** Architectural state, memory and registers, between runs only.
//! 4. **Poisoning:** After an internal invariant violation every call fails.

use tracing::{debug, info, warn};

use crate::common::constants::INSTRUCTION_BYTES;
use crate::common::error::{SimError, TrapEvent};
use crate::common::reg::ArchReg;
use crate::config::Config;
use crate::core::Engine;
use crate::core::arch::state::ArchitecturalState;
use crate::soc::MmioDevice;
use crate::stats::SimStats;

/// Why a call to [`Simulator::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of instructions retired.
    Completed,
    /// A fault was delivered; the PC is at its PALcode handler.
    Trap(TrapEvent),
    /// CALL_PAL HALT retired.
    Halted,
}

/// Result of a call to [`Simulator::run`] or [`Simulator::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    /// Instructions retired by this call.
    pub retired: u64,
    /// Why the call returned.
    pub stop: StopReason,
}

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator {
    engine: Engine,
    poisoned: bool,
}

impl Simulator {
    /// Creates a simulator from a configuration.
    ///
    /// # Errors
    ///
    /// `SimError::Config` if the configuration is inconsistent.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        info!(
            memory = config.memory.size,
            start_pc = format_args!("{:#x}", config.general.start_pc),
            "simulator created"
        );
        Ok(Self {
            engine: Engine::new(config),
            poisoned: false,
        })
    }

    const fn ensure_live(&self) -> Result<(), SimError> {
        if self.poisoned {
            Err(SimError::Poisoned)
        } else {
            Ok(())
        }
    }

    /// Retires a single instruction.
    ///
    /// # Errors
    ///
    /// See [`Simulator::run`].
    pub fn step(&mut self) -> Result<RunOutcome, SimError> {
        self.run(1)
    }

    /// Runs until `count` instructions retire, a fault is delivered, or
    /// CALL_PAL HALT retires.
    ///
    /// # Errors
    ///
    /// `SimError::Invariant` when the engine detects inconsistent internal
    /// state or a deadlock; the simulator is poisoned from then on and
    /// every later call returns `SimError::Poisoned`.
    pub fn run(&mut self, count: u64) -> Result<RunOutcome, SimError> {
        self.ensure_live()?;
        match self.engine.run(count) {
            Ok((retired, stop)) => {
                debug!(retired, ?stop, "run finished");
                Ok(RunOutcome { retired, stop })
            }
            Err(err) => {
                warn!(%err, "simulator poisoned");
                self.poisoned = true;
                Err(err)
            }
        }
    }

    /// Snapshot of the committed architectural state.
    pub fn read_architectural_state(&self) -> ArchitecturalState {
        self.engine.architectural_state()
    }

    /// Reads `len` bytes of memory, bypassing the pipeline.
    ///
    /// # Errors
    ///
    /// `SimError::Memory` if the range lies outside the memory image.
    pub fn read_memory(&self, addr: u64, len: u64) -> Result<Vec<u8>, SimError> {
        self.ensure_live()?;
        Ok(self.engine.bus.read_bytes(addr, len)?)
    }

    /// Writes bytes to memory, bypassing the pipeline.
    ///
    /// A write overlapping the locked block clears the lock flag, as a
    /// store from another processor would.
    ///
    /// # Errors
    ///
    /// `SimError::Memory` if the range lies outside the memory image.
    pub fn write_memory(&mut self, addr: u64, bytes: &[u8]) -> Result<(), SimError> {
        self.ensure_live()?;
        self.engine.bus.write_bytes(addr, bytes)?;
        self.engine.lock.clear_if_overlaps(addr, bytes.len() as u64);
        Ok(())
    }

    /// Stores instruction words at `addr` in little-endian order.
    ///
    /// # Errors
    ///
    /// `SimError::Memory` if the program does not fit in memory.
    pub fn load_program(&mut self, addr: u64, words: &[u32]) -> Result<(), SimError> {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        self.write_memory(addr, &bytes)?;
        debug!(
            addr = format_args!("{addr:#x}"),
            end = format_args!("{:#x}", addr + words.len() as u64 * INSTRUCTION_BYTES),
            "program loaded"
        );
        Ok(())
    }

    /// Moves the PC; the next `run` starts fetching there.
    ///
    /// # Errors
    ///
    /// `SimError::Poisoned` once an earlier call has failed.
    pub fn set_pc(&mut self, pc: u64) -> Result<(), SimError> {
        self.ensure_live()?;
        self.engine.set_pc(pc);
        Ok(())
    }

    /// Sets integer register `index` (R31 stays zero).
    ///
    /// # Errors
    ///
    /// `SimError::Poisoned` once an earlier call has failed.
    pub fn set_int_reg(&mut self, index: u8, value: u64) -> Result<(), SimError> {
        self.ensure_live()?;
        self.engine.renamer.set_committed(ArchReg::int(index), value);
        Ok(())
    }

    /// Sets floating-point register `index` to a T_floating value (F31 stays zero).
    ///
    /// # Errors
    ///
    /// `SimError::Poisoned` once an earlier call has failed.
    pub fn set_fp_reg(&mut self, index: u8, value: f64) -> Result<(), SimError> {
        self.ensure_live()?;
        self.engine.renamer.set_committed(ArchReg::fp(index), value.to_bits());
        Ok(())
    }

    /// Maps a device window at `base`.
    ///
    /// # Errors
    ///
    /// `SimError::Memory` if the window overlaps an existing device.
    pub fn map_mmio(&mut self, base: u64, device: Box<dyn MmioDevice>) -> Result<(), SimError> {
        self.ensure_live()?;
        Ok(self.engine.bus.map_mmio(base, device)?)
    }

    /// Raises the external interrupt line.
    ///
    /// The interrupt is taken at the next retirement boundary outside PAL
    /// mode with interrupts enabled, and the line is then lowered.
    ///
    /// # Errors
    ///
    /// `SimError::Poisoned` once an earlier call has failed.
    pub const fn raise_interrupt(&mut self) -> Result<(), SimError> {
        if self.poisoned {
            return Err(SimError::Poisoned);
        }
        self.engine.interrupt_pending = true;
        Ok(())
    }

    /// Statistics gathered so far.
    pub const fn stats(&self) -> &SimStats {
        self.engine.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // DIVT F1, F2, F3
    const DIVT: u32 = (0x16 << 26) | (1 << 21) | (2 << 16) | (0x0A3 << 5) | 3;

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = Config::default();
        config.pipeline.int_phys_regs = 8;
        assert!(matches!(Simulator::new(&config), Err(SimError::Config(_))));
    }

    #[test]
    fn deadlock_poisons_the_simulator() {
        let mut config = Config::default();
        config.general.deadlock_cycles = 3;
        let mut sim = Simulator::new(&config).unwrap();
        sim.load_program(config.general.start_pc, &[DIVT]).unwrap();
        sim.set_fp_reg(1, 1.0).unwrap();
        sim.set_fp_reg(2, 2.0).unwrap();

        assert!(matches!(sim.run(1), Err(SimError::Invariant(_))));
        assert!(matches!(sim.step(), Err(SimError::Poisoned)));
        assert!(matches!(sim.read_memory(0, 4), Err(SimError::Poisoned)));
    }

    #[test]
    fn poisoned_simulator_rejects_state_changes() {
        let mut config = Config::default();
        config.general.deadlock_cycles = 3;
        let mut sim = Simulator::new(&config).unwrap();
        sim.load_program(config.general.start_pc, &[DIVT]).unwrap();
        sim.set_fp_reg(1, 1.0).unwrap();
        sim.set_fp_reg(2, 2.0).unwrap();
        assert!(sim.run(1).is_err());

        assert!(matches!(sim.set_pc(0x2000), Err(SimError::Poisoned)));
        assert!(matches!(sim.set_int_reg(1, 5), Err(SimError::Poisoned)));
        assert!(matches!(sim.set_fp_reg(1, 5.0), Err(SimError::Poisoned)));
        assert!(matches!(sim.raise_interrupt(), Err(SimError::Poisoned)));
        assert!(matches!(sim.write_memory(0, &[1]), Err(SimError::Poisoned)));
        assert_eq!(sim.read_architectural_state().int(1), 0);
    }

    #[test]
    fn host_write_clears_overlapping_lock() {
        let mut sim = Simulator::new(&Config::default()).unwrap();
        sim.engine.lock.set(0x1000);
        sim.write_memory(0x4000, &[1]).unwrap();
        assert!(sim.read_architectural_state().lock_flag);
        sim.write_memory(0x1008, &[1]).unwrap();
        assert!(!sim.read_architectural_state().lock_flag);
    }
}
