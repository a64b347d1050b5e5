//! Internal processor registers (IPRs).
//!
//! This module implements the subset of 21264 IPRs reachable through
//! HW_MFPR and HW_MTPR. It provides:
//! 1. **Index Definitions:** The IPR numbers used in the instruction's index field.
//! 2. **Field Layouts:** CM, IER and MM_STAT bit positions.
//! 3. **Access Logic:** Reads and writes against the committed processor status.
//!
//! Reads of unimplemented IPRs return zero and writes to them are ignored,
//! so PALcode written for a larger IPR set still runs.

use super::mode::ProcessorMode;
use super::state::ProcessorStatus;
use crate::common::error::{AccessKind, ExceptionSummary, FaultReason};

/// Exception return address; bit 0 holds the PAL mode of the trapped code.
pub const EXC_ADDR: u8 = 0x06;

/// Current mode, in bits 4:3.
pub const CM: u8 = 0x09;

/// Interrupt enable register.
pub const IER: u8 = 0x0A;

/// Interrupt enable and current mode, combined.
pub const IER_CM: u8 = 0x0B;

/// Arithmetic exception summary.
pub const EXC_SUM: u8 = 0x0F;

/// PALcode base address.
pub const PAL_BASE: u8 = 0x10;

/// Memory management status of the last data fault.
pub const MM_STAT: u8 = 0x27;

/// Faulting virtual address of the last data fault.
pub const VA: u8 = 0xC2;

/// Shift of the mode field in CM and IER_CM.
pub const CM_SHIFT: u64 = 3;

/// External interrupt enable (EIEN) bit in IER and IER_CM.
pub const IER_EIEN: u64 = 1 << 33;

/// MM_STAT: the faulting access was a write.
pub const MM_STAT_WR: u64 = 1 << 0;

/// MM_STAT: access violation.
pub const MM_STAT_ACV: u64 = 1 << 1;

/// MM_STAT: shift of the faulting instruction's opcode.
pub const MM_STAT_OPCODE_SHIFT: u64 = 4;

/// Encodes MM_STAT for a data fault by an instruction with `opcode`.
pub const fn mm_stat(access: AccessKind, reason: FaultReason, opcode: u32) -> u64 {
    let mut value = ((opcode & 0x3F) as u64) << MM_STAT_OPCODE_SHIFT;
    if matches!(access, AccessKind::Write) {
        value |= MM_STAT_WR;
    }
    if matches!(reason, FaultReason::AccessViolation) {
        value |= MM_STAT_ACV;
    }
    value
}

/// Reads IPR `index`.
pub const fn read(status: &ProcessorStatus, index: u8) -> u64 {
    let cm = (status.mode.bits()) << CM_SHIFT;
    let ier = if status.interrupt_enable { IER_EIEN } else { 0 };
    match index {
        EXC_ADDR => status.exc_addr,
        CM => cm,
        IER => ier,
        IER_CM => ier | cm,
        EXC_SUM => status.exc_sum.bits() as u64,
        PAL_BASE => status.pal_base,
        MM_STAT => status.mm_stat,
        VA => status.va,
        _ => 0,
    }
}

/// Writes `value` to IPR `index`.
///
/// Any write to EXC_SUM clears it; VA and MM_STAT are read-only.
pub fn write(status: &mut ProcessorStatus, index: u8, value: u64) {
    match index {
        EXC_ADDR => status.exc_addr = value,
        CM => status.mode = ProcessorMode::from_bits(value >> CM_SHIFT),
        IER => status.interrupt_enable = value & IER_EIEN != 0,
        IER_CM => {
            status.mode = ProcessorMode::from_bits(value >> CM_SHIFT);
            status.interrupt_enable = value & IER_EIEN != 0;
        }
        EXC_SUM => status.exc_sum = ExceptionSummary::NONE,
        PAL_BASE => status.pal_base = value & !3,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cm_field_round_trips_through_bits_4_3() {
        let mut status = ProcessorStatus::default();
        write(&mut status, CM, 3 << CM_SHIFT);
        assert_eq!(status.mode, ProcessorMode::User);
        assert_eq!(read(&status, CM), 0x18);
    }

    #[test]
    fn exc_sum_write_clears() {
        let mut status = ProcessorStatus {
            exc_sum: ExceptionSummary::DZE,
            ..ProcessorStatus::default()
        };
        write(&mut status, EXC_SUM, u64::MAX);
        assert!(status.exc_sum.is_empty());
    }

    #[test]
    fn read_only_and_unknown_iprs() {
        let mut status = ProcessorStatus::default();
        write(&mut status, VA, 0x1234);
        assert_eq!(read(&status, VA), 0);
        assert_eq!(read(&status, 0x55), 0);
    }

    #[test]
    fn mm_stat_layout() {
        let v = mm_stat(AccessKind::Write, FaultReason::AccessViolation, 0x2D);
        assert_eq!(v, (0x2D << 4) | MM_STAT_WR | MM_STAT_ACV);
    }
}
