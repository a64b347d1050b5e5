//! Count and motion-video (CIX/MVI) operations.
//!
//! The counts act on Rb. The multimedia operations treat a quadword as
//! eight byte lanes or four word lanes.

use crate::core::pipeline::signals::{IntOp, MinMax};

/// Executes a count or multimedia operation.
pub fn execute(op: IntOp, a: u64, b: u64) -> u64 {
    match op {
        IntOp::Ctpop => u64::from(b.count_ones()),
        IntOp::Ctlz => u64::from(b.leading_zeros()),
        IntOp::Cttz => u64::from(b.trailing_zeros()),
        IntOp::Perr => perr(a, b),
        IntOp::Unpkbw => (0..4).fold(0, |acc, i| acc | (((b >> (8 * i)) & 0xFF) << (16 * i))),
        IntOp::Unpkbl => (0..2).fold(0, |acc, i| acc | (((b >> (8 * i)) & 0xFF) << (32 * i))),
        IntOp::Pkwb => (0..4).fold(0, |acc, i| acc | (((b >> (16 * i)) & 0xFF) << (8 * i))),
        IntOp::Pklb => (0..2).fold(0, |acc, i| acc | (((b >> (32 * i)) & 0xFF) << (8 * i))),
        IntOp::MinMax(kind) => min_max(kind, a, b),
        _ => 0,
    }
}

/// Sum of absolute differences of the eight byte lanes.
fn perr(a: u64, b: u64) -> u64 {
    a.to_le_bytes()
        .iter()
        .zip(b.to_le_bytes().iter())
        .map(|(x, y)| u64::from(x.abs_diff(*y)))
        .sum()
}

fn min_max(kind: MinMax, a: u64, b: u64) -> u64 {
    match kind {
        MinMax::Minub8 => lanes8(a, b, |x, y| x.min(y)),
        MinMax::Maxub8 => lanes8(a, b, |x, y| x.max(y)),
        MinMax::Minsb8 => lanes8(a, b, |x, y| (x as i8).min(y as i8) as u8),
        MinMax::Maxsb8 => lanes8(a, b, |x, y| (x as i8).max(y as i8) as u8),
        MinMax::Minuw4 => lanes16(a, b, |x, y| x.min(y)),
        MinMax::Maxuw4 => lanes16(a, b, |x, y| x.max(y)),
        MinMax::Minsw4 => lanes16(a, b, |x, y| (x as i16).min(y as i16) as u16),
        MinMax::Maxsw4 => lanes16(a, b, |x, y| (x as i16).max(y as i16) as u16),
    }
}

fn lanes8(a: u64, b: u64, f: impl Fn(u8, u8) -> u8) -> u64 {
    let (a, b) = (a.to_le_bytes(), b.to_le_bytes());
    let mut out = [0u8; 8];
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = f(*x, *y);
    }
    u64::from_le_bytes(out)
}

fn lanes16(a: u64, b: u64, f: impl Fn(u16, u16) -> u16) -> u64 {
    (0..4).fold(0, |acc, i| {
        let x = (a >> (16 * i)) as u16;
        let y = (b >> (16 * i)) as u16;
        acc | (u64::from(f(x, y)) << (16 * i))
    })
}
