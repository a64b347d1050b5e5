//! Alignment checking for the Mbox.
//!
//! Alpha requires natural alignment for every access except LDQ_U and
//! STQ_U, which ignore address bits 2:0 instead. A misaligned access
//! raises an UNALIGN fault that is delivered when the instruction retires.

use crate::common::error::{AccessKind, FaultReason, TrapKind};
use crate::core::pipeline::signals::MemWidth;

/// Mask clearing the byte offset within a quadword.
pub const QUADWORD_MASK: u64 = !7;

/// Checks whether a memory access at `addr` with `width` is naturally aligned.
#[inline]
pub const fn is_aligned(addr: u64, width: MemWidth) -> bool {
    addr & (width.bytes() - 1) == 0
}

/// Address of the aligned quadword containing `addr` (LDQ_U, STQ_U).
#[inline]
pub const fn quadword_base(addr: u64) -> u64 {
    addr & QUADWORD_MASK
}

/// Returns the UNALIGN fault for an access at `addr`.
pub const fn unaligned_fault(addr: u64, access: AccessKind) -> TrapKind {
    TrapKind::MemoryFault {
        address: addr,
        access,
        reason: FaultReason::Unaligned,
    }
}

/// Checks alignment, returning the fault to record for a misaligned access.
///
/// # Errors
///
/// Returns an UNALIGN `MemoryFault` naming `addr` and `access`.
pub const fn check(addr: u64, width: MemWidth, access: AccessKind) -> Result<(), TrapKind> {
    if is_aligned(addr, width) {
        Ok(())
    } else {
        Err(unaligned_fault(addr, access))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_alignment() {
        assert!(is_aligned(0x1001, MemWidth::Byte));
        assert!(!is_aligned(0x1001, MemWidth::Word));
        assert!(is_aligned(0x1004, MemWidth::Long));
        assert!(!is_aligned(0x1004, MemWidth::Quad));
    }

    #[test]
    fn misaligned_access_names_the_address() {
        let err = check(0x2003, MemWidth::Long, AccessKind::Write);
        assert_eq!(err, Err(unaligned_fault(0x2003, AccessKind::Write)));
        assert_eq!(quadword_base(0x2003), 0x2000);
    }
}
