//! Floating-Point Unit (Fbox).
//!
//! This module implements the IEEE floating-point unit used at execute. It
//! handles S (single) and T (double) precision arithmetic, square root,
//! compares, conversions, sign copies and conditional moves.
//!
//! Operations are organized into submodules:
//! - [`rounding_modes`]: Rounding qualifiers and exact directed rounding.
//! - [`exception_flags`]: IEEE exception flags and trap enabling.
//! - [`convert`]: S_floating and longword register layouts.
//!
//! The Fbox never writes the FPCR. Raised flags travel with the result and
//! are accrued when the instruction retires; a flag whose trap is enabled
//! turns the result into an `ArithmeticTrap` delivered at retirement.

/// Rounding mode definitions and exact directed rounding.
pub mod rounding_modes;

/// Floating-point exception flag types.
pub mod exception_flags;

/// S_floating and longword register layouts.
pub mod convert;

/// NaN propagation and generation.
pub(crate) mod nan_handling;

use crate::common::error::{ExceptionSummary, TrapKind};
use crate::core::arch::fpcr::Fpcr;
use crate::core::pipeline::signals::{FpArith, FpCompare, FpFormat, FpOp, FpQualifiers};

use self::convert::{longword_to_register, register_to_longword, s_operand, s_result};
use self::exception_flags::FpFlags;
use self::nan_handling::{any_signaling, default_nan, propagate, quiet};
use self::rounding_modes::{IeeeFloat, Nearest, RoundingMode};

/// Bit mask for the sign bit of a register.
const SIGN_BIT: u64 = 1 << 63;
/// Sign and exponent of a register (CPYSE).
const SIGN_EXP_MASK: u64 = 0xFFF0_0000_0000_0000;
/// Register pattern of 2.0, the true value of CMPTxx.
const COMPARE_TRUE: u64 = 0x4000_0000_0000_0000;
/// Low register bits that must be clear for a T value to be S-representable.
const S_LOW_BITS: u64 = (1 << 29) - 1;

/// Result of an Fbox operation together with the exceptions it raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FpResult {
    /// Register pattern to write to Fc.
    pub value: u64,
    /// Exceptions raised; accrued into the FPCR at retirement.
    pub flags: FpFlags,
}

impl FpResult {
    const fn exact(value: u64) -> Self {
        Self {
            value,
            flags: FpFlags::NONE,
        }
    }
}

/// Floating-Point Unit for IEEE operations.
#[derive(Debug)]
pub struct Fpu;

impl Fpu {
    /// Executes a floating-point operation.
    ///
    /// `a`, `b` and `c` are the Fa, Fb and old Fc register values (`a` is an
    /// integer register for ITOFx). `fpcr` is the committed FPCR.
    ///
    /// # Errors
    ///
    /// Returns `TrapKind::ArithmeticTrap` when a raised exception is enabled
    /// by the instruction qualifiers and FPCR. The summary lists every raised
    /// exception and carries SWC for /S instructions.
    ///
    /// # Examples
    ///
    /// ```
    /// use axp_core::core::arch::fpcr::Fpcr;
    /// use axp_core::core::pipeline::signals::{FpArith, FpFormat, FpOp, FpQualifiers};
    /// use axp_core::core::units::fpu::Fpu;
    ///
    /// let op = FpOp::Arith(FpArith::Mul, FpFormat::T, FpQualifiers::NORMAL);
    /// let r = Fpu::execute(op, 2.0f64.to_bits(), 3.5f64.to_bits(), 0, Fpcr::default()).unwrap();
    /// assert_eq!(f64::from_bits(r.value), 7.0);
    ///
    /// let div = FpOp::Arith(FpArith::Div, FpFormat::T, FpQualifiers::NORMAL);
    /// assert!(Fpu::execute(div, 1.0f64.to_bits(), 0, 0, Fpcr::default()).is_err());
    /// ```
    pub fn execute(op: FpOp, a: u64, b: u64, c: u64, fpcr: Fpcr) -> Result<FpResult, TrapKind> {
        let (result, qualifiers) = match op {
            FpOp::Arith(kind, format, q) => {
                let mode = q.rounding.resolve(fpcr.dynamic_rounding());
                let r = match format {
                    FpFormat::S => {
                        let (v, flags) = arith(kind, s_operand(a), s_operand(b), mode, q, fpcr);
                        FpResult {
                            value: s_result(v),
                            flags,
                        }
                    }
                    FpFormat::T => {
                        let (x, y) = (f64::from_bits(a), f64::from_bits(b));
                        let (v, flags) = arith(kind, x, y, mode, q, fpcr);
                        FpResult {
                            value: v.to_bits(),
                            flags,
                        }
                    }
                };
                (r, Some(q))
            }
            FpOp::Sqrt(format, q) => {
                let mode = q.rounding.resolve(fpcr.dynamic_rounding());
                let r = match format {
                    FpFormat::S => {
                        let (v, flags) = square_root(s_operand(b), mode, q, fpcr);
                        FpResult {
                            value: s_result(v),
                            flags,
                        }
                    }
                    FpFormat::T => {
                        let (v, flags) = square_root(f64::from_bits(b), mode, q, fpcr);
                        FpResult {
                            value: v.to_bits(),
                            flags,
                        }
                    }
                };
                (r, Some(q))
            }
            FpOp::Compare(pred, q) => (compare(pred, a, b, fpcr), Some(q)),
            FpOp::Cvtts(q) => {
                let mode = q.rounding.resolve(fpcr.dynamic_rounding());
                (cvtts(b, mode, q, fpcr), Some(q))
            }
            FpOp::Cvtst(q) => (cvtst(b), Some(q)),
            FpOp::Cvttq(q) => {
                let mode = q.rounding.resolve(fpcr.dynamic_rounding());
                (cvttq(b, mode), Some(q))
            }
            FpOp::Cvtqs(q) => {
                let mode = q.rounding.resolve(fpcr.dynamic_rounding());
                let n = rounding_modes::from_quad(b as i64, |x| x as f32, |v| v as i128);
                let flags = if n.is_inexact() { FpFlags::INE } else { FpFlags::NONE };
                let value = s_result(n.round(mode));
                (FpResult { value, flags }, Some(q))
            }
            FpOp::Cvtqt(q) => {
                let mode = q.rounding.resolve(fpcr.dynamic_rounding());
                let n = rounding_modes::from_quad(b as i64, |x| x as f64, |v| v as i128);
                let flags = if n.is_inexact() { FpFlags::INE } else { FpFlags::NONE };
                let value = n.round(mode).to_bits();
                (FpResult { value, flags }, Some(q))
            }
            FpOp::Cvtlq => (FpResult::exact(register_to_longword(b) as u64), None),
            FpOp::Cvtql(q) => {
                let quad = b as i64;
                let flags = if i32::try_from(quad).is_ok() {
                    FpFlags::NONE
                } else {
                    FpFlags::IOV
                };
                let value = longword_to_register(quad as u32);
                (FpResult { value, flags }, Some(q))
            }
            FpOp::Cpys => (FpResult::exact((a & SIGN_BIT) | (b & !SIGN_BIT)), None),
            FpOp::Cpysn => (FpResult::exact((!a & SIGN_BIT) | (b & !SIGN_BIT)), None),
            FpOp::Cpyse => (
                FpResult::exact((a & SIGN_EXP_MASK) | (b & !SIGN_EXP_MASK)),
                None,
            ),
            FpOp::Fcmov(cond) => {
                let value = if cond.eval_fp(a) { b } else { c };
                (FpResult::exact(value), None)
            }
            FpOp::Itofs => (FpResult::exact(convert::s_to_register(a as u32)), None),
            FpOp::Itoft => (FpResult::exact(a), None),
        };

        if let Some(q) = qualifiers {
            check_traps(result.flags, q, fpcr)?;
        }
        Ok(result)
    }
}

/// Turns enabled exceptions into an arithmetic trap.
fn check_traps(flags: FpFlags, q: FpQualifiers, fpcr: Fpcr) -> Result<(), TrapKind> {
    if flags.trapping(q, fpcr).is_empty() {
        return Ok(());
    }
    let mut summary = flags.to_summary();
    if q.software {
        summary |= ExceptionSummary::SWC;
    }
    Err(TrapKind::ArithmeticTrap { summary })
}

/// Replaces a denormal operand by a signed zero when FPCR.DNZ is set.
fn flush_denormal<F: IeeeFloat>(value: F, fpcr: Fpcr) -> F {
    if fpcr.denormals_to_zero() && value.is_subnormal() {
        value.signed_zero()
    } else {
        value
    }
}

/// Rounds `n` in `mode` and derives OVF, UNF and INE.
///
/// `finite_inputs` is false when the operands already contained an
/// infinity, in which case an infinite result is exact.
///
/// An underflowed result is a true zero unless the instruction carries /U
/// and FPCR.UNDZ is clear; only then is the denormal kept for software
/// completion.
fn finish<F: IeeeFloat>(
    n: Nearest<F>,
    mode: RoundingMode,
    finite_inputs: bool,
    q: FpQualifiers,
    fpcr: Fpcr,
) -> (F, FpFlags) {
    let mut value = n.round(mode);
    let mut flags = FpFlags::NONE;
    if finite_inputs && (n.value.is_infinite() || value.is_infinite()) {
        flags |= FpFlags::OVF | FpFlags::INE;
    }
    if n.is_inexact() {
        flags |= FpFlags::INE;
        if n.value.abs() < F::MIN_POSITIVE {
            flags |= FpFlags::UNF;
            if !q.underflow_or_overflow || fpcr.underflow_to_zero() {
                value = value.signed_zero();
            }
        }
    }
    (value, flags)
}

fn arith<F: IeeeFloat>(
    kind: FpArith,
    a: F,
    b: F,
    mode: RoundingMode,
    q: FpQualifiers,
    fpcr: Fpcr,
) -> (F, FpFlags) {
    let a = flush_denormal(a, fpcr);
    let b = flush_denormal(b, fpcr);

    if let Some(nan) = propagate(a, b) {
        let flags = if any_signaling(&[a, b]) {
            FpFlags::INV
        } else {
            FpFlags::NONE
        };
        return (nan, flags);
    }

    // Subtraction is addition of the negated operand from here on.
    let b = if kind == FpArith::Sub { -b } else { b };
    let zero = F::ZERO;
    let invalid = match kind {
        FpArith::Add | FpArith::Sub => {
            a.is_infinite() && b.is_infinite() && a.is_sign_negative() != b.is_sign_negative()
        }
        FpArith::Mul => (a == zero && b.is_infinite()) || (a.is_infinite() && b == zero),
        FpArith::Div => (a == zero && b == zero) || (a.is_infinite() && b.is_infinite()),
    };
    if invalid {
        return (default_nan(), FpFlags::INV);
    }

    let finite = a.is_finite() && b.is_finite();
    if kind == FpArith::Div && b == zero {
        let flags = if finite { FpFlags::DZE } else { FpFlags::NONE };
        return (a / b, flags);
    }

    let n = match kind {
        FpArith::Add | FpArith::Sub => rounding_modes::add(a, b),
        FpArith::Mul => rounding_modes::mul(a, b),
        FpArith::Div => rounding_modes::div(a, b),
    };
    let (mut value, flags) = finish(n, mode, finite, q, fpcr);

    // An exact zero sum of operands that are not both zero of one sign is
    // +0, except when rounding toward minus infinity.
    let exact_cancel = matches!(kind, FpArith::Add | FpArith::Sub)
        && value == zero
        && !n.is_inexact()
        && !(a == zero && b == zero && a.is_sign_negative() == b.is_sign_negative());
    if exact_cancel && mode == RoundingMode::MinusInfinity {
        value = -zero;
    }
    (value, flags)
}

fn square_root<F: IeeeFloat>(
    b: F,
    mode: RoundingMode,
    q: FpQualifiers,
    fpcr: Fpcr,
) -> (F, FpFlags) {
    let b = flush_denormal(b, fpcr);
    if b.is_nan() {
        let flags = if b.is_signaling() { FpFlags::INV } else { FpFlags::NONE };
        return (quiet(b), flags);
    }
    if b.is_sign_negative() && b != F::ZERO {
        return (default_nan(), FpFlags::INV);
    }
    finish(rounding_modes::sqrt(b), mode, b.is_finite(), q, fpcr)
}

fn compare(pred: FpCompare, a: u64, b: u64, fpcr: Fpcr) -> FpResult {
    let x = flush_denormal(f64::from_bits(a), fpcr);
    let y = flush_denormal(f64::from_bits(b), fpcr);
    let unordered = x.is_nan() || y.is_nan();
    let signaling = any_signaling(&[x, y]);

    let truth = match pred {
        FpCompare::Un => unordered,
        FpCompare::Eq => !unordered && x == y,
        FpCompare::Lt => !unordered && x < y,
        FpCompare::Le => !unordered && x <= y,
    };
    let invalid = signaling || (unordered && matches!(pred, FpCompare::Lt | FpCompare::Le));
    FpResult {
        value: if truth { COMPARE_TRUE } else { 0 },
        flags: if invalid { FpFlags::INV } else { FpFlags::NONE },
    }
}

fn cvtts(b: u64, mode: RoundingMode, q: FpQualifiers, fpcr: Fpcr) -> FpResult {
    let t = flush_denormal(f64::from_bits(b), fpcr);
    if t.is_nan() {
        let flags = if t.is_signaling() { FpFlags::INV } else { FpFlags::NONE };
        return FpResult {
            value: quiet(t).to_bits() & !S_LOW_BITS,
            flags,
        };
    }
    let (value, flags) = finish(rounding_modes::narrow(t), mode, t.is_finite(), q, fpcr);
    FpResult {
        value: s_result(value),
        flags,
    }
}

fn cvtst(b: u64) -> FpResult {
    let s = s_operand(b);
    if s.is_nan() {
        let flags = if s.is_signaling() { FpFlags::INV } else { FpFlags::NONE };
        return FpResult {
            value: f64::from_bits(s_result(quiet(s))).to_bits(),
            flags,
        };
    }
    FpResult::exact(f64::from(s).to_bits())
}

/// T_floating to quadword. Out-of-range results keep the low 64 bits of the
/// exact integer and raise IOV.
fn cvttq(b: u64, mode: RoundingMode) -> FpResult {
    let t = f64::from_bits(b);
    if !t.is_finite() {
        return FpResult {
            value: 0,
            flags: FpFlags::INV,
        };
    }
    let r = rounding_modes::round_integral(t, mode);
    let mut flags = if r == t { FpFlags::NONE } else { FpFlags::INE };

    // 2^63 is the first magnitude that does not fit.
    let limit = 9_223_372_036_854_775_808.0_f64;
    let value = if r >= -limit && r < limit {
        r as i64 as u64
    } else {
        flags |= FpFlags::IOV | FpFlags::INE;
        low_quadword(r)
    };
    FpResult { value, flags }
}

/// Low 64 bits of the two's complement of an integral `f64` of magnitude >= 2^63.
fn low_quadword(r: f64) -> u64 {
    let bits = r.to_bits();
    let exp = ((bits >> 52) & 0x7FF) as i64 - 1075;
    let mantissa = (bits & 0x000F_FFFF_FFFF_FFFF) | (1 << 52);
    let magnitude = if exp >= 64 { 0 } else { mantissa << exp };
    if r < 0.0 {
        magnitude.wrapping_neg()
    } else {
        magnitude
    }
}
