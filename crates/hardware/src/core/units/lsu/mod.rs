//! Memory box (Mbox) address and data formatting.
//!
//! This module provides the Load/Store Unit, responsible for everything a
//! memory instruction does besides touching memory itself:
//! - [`unaligned`]: Alignment checks and LDQ_U/STQ_U quadword addressing.
//! - [`ordering`]: Store-to-load forwarding against older buffered stores.
//! - [`atomic`]: The LDx_L/STx_C lock flag.
//!
//! Memory reads and writes go through [`Bus`](crate::soc::Bus); stores are
//! held in the store buffer until they retire.

/// Lock flag for load-locked / store-conditional.
pub mod atomic;

/// Store-to-load forwarding decisions.
pub mod ordering;

/// Alignment checks and unaligned-quadword addressing.
pub mod unaligned;

use crate::common::error::{AccessKind, TrapKind};
use crate::core::pipeline::signals::{LoadOp, MemWidth, StoreOp};
use crate::core::units::fpu::convert::{register_to_s, s_to_register};

/// Load/Store Unit (LSU) for memory operations.
///
/// Stateless helpers used by the issue stage when a memory instruction
/// executes and by the commit stage when a store drains.
#[derive(Debug)]
pub struct Lsu;

impl Lsu {
    /// Effective address of a load.
    ///
    /// LDQ_U clears bits 2:0, so it can never fault on alignment.
    pub const fn load_address(op: LoadOp, base: u64, disp: i64) -> u64 {
        let addr = base.wrapping_add(disp as u64);
        match op {
            LoadOp::LdqU => unaligned::quadword_base(addr),
            _ => addr,
        }
    }

    /// Effective address of a store.
    pub const fn store_address(op: StoreOp, base: u64, disp: i64) -> u64 {
        let addr = base.wrapping_add(disp as u64);
        match op {
            StoreOp::StqU => unaligned::quadword_base(addr),
            _ => addr,
        }
    }

    /// Checks natural alignment of an effective address.
    ///
    /// Runs after the access check: DFAULT outranks UNALIGN.
    ///
    /// # Errors
    ///
    /// Returns an UNALIGN `MemoryFault` for a misaligned address.
    pub const fn check_alignment(
        addr: u64,
        width: MemWidth,
        access: AccessKind,
    ) -> Result<(), TrapKind> {
        unaligned::check(addr, width, access)
    }

    /// Converts raw little-endian memory data into the register value.
    ///
    /// # Arguments
    ///
    /// * `op`  - The load instruction
    /// * `raw` - Zero-extended bytes read from memory at the load's width
    ///
    /// # Returns
    ///
    /// The destination register value: zero-extended for LDBU/LDWU,
    /// sign-extended for LDL, expanded to register format for LDS.
    pub fn load_result(op: LoadOp, raw: u64) -> u64 {
        match op {
            LoadOp::Ldbu => raw & 0xFF,
            LoadOp::Ldwu => raw & 0xFFFF,
            LoadOp::Ldl | LoadOp::LdlL => raw as i32 as i64 as u64,
            LoadOp::Lds => s_to_register(raw as u32),
            LoadOp::Ldq | LoadOp::LdqU | LoadOp::LdqL | LoadOp::Ldt => raw,
        }
    }

    /// Converts a register value into the bytes a store writes.
    ///
    /// The result is truncated to the store's width; STS compresses the
    /// register format into the 32-bit memory image.
    pub fn store_data(op: StoreOp, reg: u64) -> u64 {
        match op {
            StoreOp::Sts => u64::from(register_to_s(reg)),
            _ => truncate(reg, op.width()),
        }
    }
}

/// Keeps the low `width` bytes of `value`.
#[inline]
pub const fn truncate(value: u64, width: MemWidth) -> u64 {
    match width {
        MemWidth::Quad => value,
        _ => value & ((1 << (8 * width.bytes())) - 1),
    }
}
