//! Byte manipulation (BWX and the INTS group).
//!
//! These operations build unaligned accesses out of aligned quadwords:
//! LDQ_U fetches the two quadwords covering a datum, EXTxL/EXTxH pull the
//! halves into place, and MSKxx/INSxx merge a datum back for STQ_U.
//!
//! All of them work on a byte mask (`bit n` selects byte `n`) expanded
//! into a 64-bit bit mask by [`zapnot_mask`].

use crate::core::pipeline::signals::{ByteWidth, Half, IntOp};

/// Expands an 8-bit byte mask into a 64-bit mask of whole bytes.
#[inline]
pub fn zapnot_mask(byte_mask: u64) -> u64 {
    (0..8)
        .filter(|i| byte_mask & (1 << i) != 0)
        .fold(0, |acc, i| acc | (0xFF << (8 * i)))
}

/// Executes a byte manipulation or sign-extension operation.
///
/// Operand `b` supplies the byte offset (bits 2:0) for MSK/EXT/INS, the
/// byte mask for ZAP/ZAPNOT and the source for SEXTB/SEXTW.
pub fn execute(op: IntOp, a: u64, b: u64) -> u64 {
    match op {
        IntOp::Msk(width, half) => mask(width, half, a, b),
        IntOp::Ext(width, half) => extract(width, half, a, b),
        IntOp::Ins(width, half) => insert(width, half, a, b),
        IntOp::Zap => a & !zapnot_mask(b & 0xFF),
        IntOp::Zapnot => a & zapnot_mask(b & 0xFF),
        IntOp::Sextb => b as i8 as i64 as u64,
        IntOp::Sextw => b as i16 as i64 as u64,
        _ => 0,
    }
}

/// Byte offset (bits 2:0 of `b`).
#[inline]
const fn offset(b: u64) -> u32 {
    (b & 7) as u32
}

fn mask(width: ByteWidth, half: Half, a: u64, b: u64) -> u64 {
    let shifted = width.byte_mask() << offset(b);
    let bytes = match half {
        Half::Low => shifted & 0xFF,
        Half::High => (shifted >> 8) & 0xFF,
    };
    a & !zapnot_mask(bytes)
}

fn extract(width: ByteWidth, half: Half, a: u64, b: u64) -> u64 {
    let shift = 8 * offset(b);
    let moved = match half {
        Half::Low => a >> shift,
        Half::High => a << ((64 - shift) & 63),
    };
    moved & zapnot_mask(width.byte_mask())
}

fn insert(width: ByteWidth, half: Half, a: u64, b: u64) -> u64 {
    let shift = 8 * offset(b);
    let shifted = width.byte_mask() << offset(b);
    match half {
        Half::Low => (a << shift) & zapnot_mask(shifted & 0xFF),
        Half::High if shift == 0 => 0,
        Half::High => (a >> (64 - shift)) & zapnot_mask((shifted >> 8) & 0xFF),
    }
}
