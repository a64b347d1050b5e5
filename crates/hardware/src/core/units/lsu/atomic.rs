//! Lock flag for LDx_L / STx_C.
//!
//! LDx_L sets the flag and records the locked address when it retires.
//! STx_C succeeds only while the flag is set and then clears it. Trap
//! delivery and host writes that overlap the locked block clear it too.

use crate::common::constants::LOCK_BLOCK_MASK;

/// The per-processor lock flag and locked physical address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LockFlag {
    block: Option<u64>,
}

impl LockFlag {
    /// Sets the flag for the block containing `addr`.
    pub const fn set(&mut self, addr: u64) {
        self.block = Some(addr & LOCK_BLOCK_MASK);
    }

    /// Clears the flag.
    pub const fn clear(&mut self) {
        self.block = None;
    }

    /// True while the flag is set.
    pub const fn is_set(&self) -> bool {
        self.block.is_some()
    }

    /// True if the flag is set for the block containing `addr`.
    pub fn holds(&self, addr: u64) -> bool {
        self.block == Some(addr & LOCK_BLOCK_MASK)
    }

    /// Clears the flag if `[addr, addr + len)` touches the locked block.
    pub fn clear_if_overlaps(&mut self, addr: u64, len: u64) {
        let Some(block) = self.block else {
            return;
        };
        let end = addr.saturating_add(len);
        let block_end = block.saturating_add(!LOCK_BLOCK_MASK + 1);
        if len > 0 && addr < block_end && block < end {
            self.block = None;
        }
    }
}
