//! CALL_PAL function codes and PAL entry classification.
//!
//! Function codes 0x00-0x3F are privileged (kernel mode only) and 0x80-0xBF
//! unprivileged. Every other code is reserved and raises OPCDEC.

/// Halt the processor.
pub const HALT: u32 = 0x00;
/// Cache flush.
pub const CFLUSH: u32 = 0x01;
/// Console service.
pub const CSERVE: u32 = 0x09;
/// Breakpoint trap.
pub const BPT: u32 = 0x80;
/// Bugcheck trap.
pub const BUGCHK: u32 = 0x81;
/// System call.
pub const CALLSYS: u32 = 0x83;
/// Instruction memory barrier.
pub const IMB: u32 = 0x86;
/// Read the unique value.
pub const RDUNIQUE: u32 = 0x9E;
/// Write the unique value.
pub const WRUNIQUE: u32 = 0x9F;
/// Generate a software trap.
pub const GENTRAP: u32 = 0xAA;

/// PAL entry offset of the first privileged CALL_PAL routine.
pub const PRIVILEGED_ENTRY: u64 = 0x2000;
/// PAL entry offset of the first unprivileged CALL_PAL routine.
pub const UNPRIVILEGED_ENTRY: u64 = 0x3000;
/// Bytes reserved for each CALL_PAL routine.
pub const ENTRY_STRIDE: u64 = 0x40;

/// How a CALL_PAL function code is dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PalClass {
    /// Kernel-mode only routine.
    Privileged,
    /// Routine callable from any mode.
    Unprivileged,
}

/// Classifies a CALL_PAL function code; `None` for reserved codes.
pub const fn classify(function: u32) -> Option<PalClass> {
    match function {
        0x00..=0x3F => Some(PalClass::Privileged),
        0x80..=0xBF => Some(PalClass::Unprivileged),
        _ => None,
    }
}

/// Offset from PAL_BASE of the routine for a valid CALL_PAL function.
pub const fn entry_offset(function: u32) -> Option<u64> {
    let slot = (function & 0x3F) as u64 * ENTRY_STRIDE;
    match classify(function) {
        Some(PalClass::Privileged) => Some(PRIVILEGED_ENTRY + slot),
        Some(PalClass::Unprivileged) => Some(UNPRIVILEGED_ENTRY + slot),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_offsets_follow_21264_layout() {
        assert_eq!(entry_offset(HALT), Some(0x2000));
        assert_eq!(entry_offset(CSERVE), Some(0x2240));
        assert_eq!(entry_offset(CALLSYS), Some(0x30C0));
        assert_eq!(entry_offset(GENTRAP), Some(0x3A80));
        assert_eq!(entry_offset(0x40), None);
        assert_eq!(entry_offset(0xC0), None);
    }
}
