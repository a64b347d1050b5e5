//! Architectural state.
//!
//! The state a sequential Alpha would expose: both register files, the PC
//! and the processor status. The engine keeps the committed copy here and
//! mutates it only when instructions retire; hosts receive snapshots of it.

use std::fmt;

use super::fpcr::Fpcr;
use super::mode::ProcessorMode;
use crate::common::constants::ARCH_REGS;
use crate::common::error::ExceptionSummary;

/// Processor status: mode, PAL state, FPCR and trap registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessorStatus {
    /// Current access mode (CM).
    pub mode: ProcessorMode,
    /// Executing PALcode; PAL mode bypasses protection and allows HW_*.
    pub pal_mode: bool,
    /// Floating-point control register.
    pub fpcr: Fpcr,
    /// External interrupts enabled (IER.EIEN).
    pub interrupt_enable: bool,
    /// Flag read and written by RC/RS.
    pub interrupt_flag: bool,
    /// Return address of the last trap (EXC_ADDR).
    pub exc_addr: u64,
    /// Exception summary of the last arithmetic trap (EXC_SUM).
    pub exc_sum: ExceptionSummary,
    /// PALcode base address.
    pub pal_base: u64,
    /// Faulting address of the last data fault.
    pub va: u64,
    /// Status of the last data fault.
    pub mm_stat: u64,
}

/// Snapshot of the architectural state at a quiescent point.
///
/// Equals the state produced by executing every retired instruction in
/// order on a sequential machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchitecturalState {
    /// Integer registers R0-R31 (R31 always reads zero).
    pub int_regs: [u64; ARCH_REGS],
    /// FP registers F0-F31 as raw T-format bits (F31 always reads zero).
    pub fp_regs: [u64; ARCH_REGS],
    /// Address of the next instruction to retire.
    pub pc: u64,
    /// Processor status.
    pub status: ProcessorStatus,
    /// Lock flag set by LDx_L.
    pub lock_flag: bool,
}

impl ArchitecturalState {
    /// Reads integer register `index`.
    pub const fn int(&self, index: usize) -> u64 {
        self.int_regs[index]
    }

    /// Reads FP register `index` as an `f64`.
    pub fn fp(&self, index: usize) -> f64 {
        f64::from_bits(self.fp_regs[index])
    }
}

impl fmt::Display for ArchitecturalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "pc={:#x} mode={} pal={} fpcr={:#018x}",
            self.pc,
            self.status.mode,
            self.status.pal_mode,
            self.status.fpcr.bits()
        )?;
        for (i, chunk) in self.int_regs.chunks(4).enumerate() {
            for (j, v) in chunk.iter().enumerate() {
                write!(f, "R{:<2}={v:#018x} ", i * 4 + j)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_kernel_with_normal_rounding() {
        let s = ProcessorStatus::default();
        assert!(s.mode.is_kernel());
        assert!(!s.pal_mode);
        assert_eq!(s.fpcr, Fpcr::default());
    }
}
