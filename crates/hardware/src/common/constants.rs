//! Global Engine Constants.
//!
//! This module defines constants used across the engine. It includes:
//! 1. **Instruction Constants:** Instruction size and register file shape.
//! 2. **Implementation Constants:** Values the 21264 reports through IMPLVER and AMASK.
//! 3. **Memory Constants:** Lock granularity for LDx_L/STx_C.

/// Size of every Alpha instruction in bytes.
pub const INSTRUCTION_BYTES: u64 = 4;

/// Number of architectural registers in each of the integer and FP files.
pub const ARCH_REGS: usize = 32;

/// Register number that reads as zero and discards writes (R31 and F31).
pub const ZERO_REG: u8 = 31;

/// Value returned by IMPLVER on the 21264 (EV6 family).
pub const IMPLVER_EV6: u64 = 2;

/// Architecture extensions implemented, as reported by AMASK.
///
/// Bit 0 BWX, bit 1 FIX, bit 2 CIX, bit 8 MVI, bit 9 precise arithmetic traps.
pub const AMASK_FEATURES: u64 = 0x307;

/// Size of the block monitored by the lock flag after an LDx_L.
pub const LOCK_BLOCK_BYTES: u64 = 64;

/// Mask selecting the lock block base of an address.
pub const LOCK_BLOCK_MASK: u64 = !(LOCK_BLOCK_BYTES - 1);
