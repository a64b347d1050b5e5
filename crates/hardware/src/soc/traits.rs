//! Device trait for memory-mapped I/O.
//!
//! This module defines the `MmioDevice` trait implemented by host-supplied devices. It provides:
//! 1. **Identification:** `name` and `size` for bus routing and diagnostics.
//! 2. **Access:** Width-tagged read/write at device-relative offsets.
//!
//! Device accesses have side effects, so the engine performs them only for
//! the oldest in-flight instruction: MMIO loads wait for the head of the
//! reorder buffer and MMIO stores happen when they retire.

use crate::core::pipeline::signals::MemWidth;

/// Trait for memory-mapped I/O devices attached to the bus.
pub trait MmioDevice: Send {
    /// Returns a short name for this device (e.g., `"console"`).
    fn name(&self) -> &str;

    /// Size of the device's register window in bytes.
    fn size(&self) -> u64;

    /// Reads `width` bytes at `offset`, zero-extended.
    fn read(&mut self, offset: u64, width: MemWidth) -> u64;

    /// Writes the low `width` bytes of `value` at `offset`.
    fn write(&mut self, offset: u64, width: MemWidth, value: u64);
}
