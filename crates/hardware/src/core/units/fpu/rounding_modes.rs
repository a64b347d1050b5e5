//! Floating-point rounding modes and exact directed rounding.
//!
//! Alpha IEEE instructions carry a 2-bit rounding qualifier (bits 12:11):
//!
//! | Value | Qualifier | Mode                                   |
//! |-------|-----------|----------------------------------------|
//! | 0b00  | /C        | Chopped (toward zero)                  |
//! | 0b01  | /M        | Toward minus infinity                  |
//! | 0b10  | (none)    | Normal: nearest, ties to even          |
//! | 0b11  | /D        | Dynamic: taken from FPCR<59:58>        |
//!
//! The host only rounds to nearest, so the other modes are emulated: every
//! operation is computed rounded-to-nearest together with the sign of its
//! rounding error (TwoSum for addition, a fused multiply-add residual for
//! multiplication, division and square root), and the nearest result is
//! then moved one ulp when the requested direction disagrees with it.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Rounding qualifier encoded in an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingQualifier {
    /// /C: chopped.
    Chopped,
    /// /M: toward minus infinity.
    MinusInfinity,
    /// Round to nearest even.
    Normal,
    /// /D: use the FPCR dynamic rounding mode.
    Dynamic,
}

impl RoundingQualifier {
    /// Decodes instruction bits 12:11 (function bits 7:6).
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0b00 => Self::Chopped,
            0b01 => Self::MinusInfinity,
            0b10 => Self::Normal,
            _ => Self::Dynamic,
        }
    }

    /// Resolves the qualifier against the FPCR dynamic mode.
    pub const fn resolve(self, dynamic: RoundingMode) -> RoundingMode {
        match self {
            Self::Chopped => RoundingMode::Chopped,
            Self::MinusInfinity => RoundingMode::MinusInfinity,
            Self::Normal => RoundingMode::Normal,
            Self::Dynamic => dynamic,
        }
    }
}

/// Effective IEEE rounding direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingMode {
    /// Toward zero.
    Chopped,
    /// Toward minus infinity.
    MinusInfinity,
    /// Nearest, ties to even.
    Normal,
    /// Toward plus infinity (reachable only through FPCR.DYN).
    PlusInfinity,
}

impl RoundingMode {
    /// Decodes the FPCR<59:58> dynamic rounding field.
    pub const fn from_fpcr_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0b00 => Self::Chopped,
            0b01 => Self::MinusInfinity,
            0b10 => Self::Normal,
            _ => Self::PlusInfinity,
        }
    }
}

/// IEEE binary formats the Fbox computes in (`f32` for S, `f64` for T).
pub(crate) trait IeeeFloat:
    Copy
    + Debug
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Positive zero.
    const ZERO: Self;
    /// Smallest positive normal number.
    const MIN_POSITIVE: Self;
    /// Positive infinity.
    const INFINITY: Self;
    /// Magnitude below which FMA residuals may underflow.
    const RESIDUAL_FLOOR: Self;
    /// Power of two that lifts tiny operands clear of the denormal range.
    const SCALE: Self;
    /// Square root of [`Self::SCALE`].
    const SCALE_SQRT: Self;
    /// Mask of the quiet bit of a NaN.
    const QUIET_BIT: u64;

    /// Raw encoding, zero-extended.
    fn to_raw(self) -> u64;
    /// Value from a raw encoding; excess high bits are dropped.
    fn from_raw(raw: u64) -> Self;
    /// True for NaN.
    fn is_nan(self) -> bool;
    /// True for finite values.
    fn is_finite(self) -> bool;
    /// True for infinities.
    fn is_infinite(self) -> bool;
    /// True if the sign bit is set.
    fn is_sign_negative(self) -> bool;
    /// True for denormal (subnormal) values.
    fn is_subnormal(self) -> bool;
    /// Absolute value.
    fn abs(self) -> Self;
    /// Square root rounded to nearest.
    fn sqrt(self) -> Self;
    /// `self * a + b` with a single rounding.
    fn mul_add(self, a: Self, b: Self) -> Self;

    /// True for signaling NaNs.
    fn is_signaling(self) -> bool {
        self.is_nan() && self.to_raw() & Self::QUIET_BIT == 0
    }

    /// Zero carrying the sign of `self`.
    fn signed_zero(self) -> Self {
        if self.is_sign_negative() {
            -Self::ZERO
        } else {
            Self::ZERO
        }
    }

    /// Least value greater than `self`.
    fn next_up(self) -> Self {
        if self.is_nan() || (self.is_infinite() && !self.is_sign_negative()) {
            self
        } else if self.to_raw() << 1 == 0 {
            Self::from_raw(1)
        } else if self.is_sign_negative() {
            Self::from_raw(self.to_raw() - 1)
        } else {
            Self::from_raw(self.to_raw() + 1)
        }
    }

    /// Greatest value less than `self`.
    fn next_down(self) -> Self {
        -(-self).next_up()
    }
}

macro_rules! impl_ieee_float {
    ($t:ty, $bits:ty, $quiet:expr, $floor:expr, $scale:expr, $scale_sqrt:expr) => {
        impl IeeeFloat for $t {
            const ZERO: Self = 0.0;
            const MIN_POSITIVE: Self = <$t>::MIN_POSITIVE;
            const INFINITY: Self = <$t>::INFINITY;
            const RESIDUAL_FLOOR: Self = <$t>::from_bits($floor);
            const SCALE: Self = <$t>::from_bits($scale);
            const SCALE_SQRT: Self = <$t>::from_bits($scale_sqrt);
            const QUIET_BIT: u64 = $quiet;

            #[inline]
            fn to_raw(self) -> u64 {
                u64::from(self.to_bits())
            }

            #[inline]
            fn from_raw(raw: u64) -> Self {
                <$t>::from_bits(raw as $bits)
            }

            #[inline]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }

            #[inline]
            fn is_infinite(self) -> bool {
                <$t>::is_infinite(self)
            }

            #[inline]
            fn is_sign_negative(self) -> bool {
                <$t>::is_sign_negative(self)
            }

            #[inline]
            fn is_subnormal(self) -> bool {
                <$t>::is_subnormal(self)
            }

            #[inline]
            fn abs(self) -> Self {
                <$t>::abs(self)
            }

            #[inline]
            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }

            #[inline]
            fn mul_add(self, a: Self, b: Self) -> Self {
                <$t>::mul_add(self, a, b)
            }
        }
    };
}

// Floor 2^-96, scale 2^64, scale root 2^32.
impl_ieee_float!(f32, u32, 1 << 22, 0x0F80_0000, 0x5F80_0000, 0x4F80_0000);
// Floor 2^-960, scale 2^128, scale root 2^64.
impl_ieee_float!(
    f64,
    u64,
    1 << 51,
    0x03F0_0000_0000_0000,
    0x47F0_0000_0000_0000,
    0x43F0_0000_0000_0000
);

/// A result rounded to nearest and the direction of the exact value from it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Nearest<F> {
    /// Round-to-nearest result.
    pub value: F,
    /// `exact.cmp(value)`; `Equal` when exact or when no finite exact value exists.
    pub error: Ordering,
}

impl<F: IeeeFloat> Nearest<F> {
    fn exact(value: F) -> Self {
        Self {
            value,
            error: Ordering::Equal,
        }
    }

    /// Direction of a residual `r` where `exact = value + r * scale`.
    fn from_residual(value: F, residual: F) -> Self {
        let error = residual.partial_cmp(&F::ZERO).unwrap_or(Ordering::Equal);
        Self { value, error }
    }

    /// Nearest result of a finite computation that overflowed to infinity.
    fn overflowed(value: F) -> Self {
        let error = if value.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
        Self { value, error }
    }

    /// True if the exact value differs from the nearest result.
    pub fn is_inexact(&self) -> bool {
        self.error != Ordering::Equal
    }

    /// Applies a rounding direction to the nearest result.
    pub fn round(self, mode: RoundingMode) -> F {
        let v = self.value;
        match (mode, self.error) {
            (RoundingMode::Normal, _) | (_, Ordering::Equal) => v,
            (RoundingMode::Chopped, Ordering::Less) if !v.is_sign_negative() && v != F::ZERO => {
                v.next_down()
            }
            (RoundingMode::Chopped, Ordering::Greater) if v.is_sign_negative() && v != F::ZERO => {
                v.next_up()
            }
            (RoundingMode::MinusInfinity, Ordering::Less) => v.next_down(),
            (RoundingMode::PlusInfinity, Ordering::Greater) => v.next_up(),
            _ => v,
        }
    }
}

/// `a + b` rounded to nearest, with the sign of the rounding error.
pub(crate) fn add<F: IeeeFloat>(a: F, b: F) -> Nearest<F> {
    let s = a + b;
    if !(a.is_finite() && b.is_finite()) {
        return Nearest::exact(s);
    }
    if s.is_infinite() {
        return Nearest::overflowed(s);
    }
    // TwoSum: s + err == a + b exactly.
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    Nearest::from_residual(s, err)
}

/// `a * b` rounded to nearest, with the sign of the rounding error.
pub(crate) fn mul<F: IeeeFloat>(a: F, b: F) -> Nearest<F> {
    let p = a * b;
    if !(a.is_finite() && b.is_finite()) {
        return Nearest::exact(p);
    }
    if p.is_infinite() {
        return Nearest::overflowed(p);
    }
    if p.abs() >= F::RESIDUAL_FLOOR {
        return Nearest::from_residual(p, a.mul_add(b, -p));
    }
    if p == F::ZERO {
        if a == F::ZERO || b == F::ZERO {
            return Nearest::exact(p);
        }
        let sign = if a.is_sign_negative() == b.is_sign_negative() {
            F::MIN_POSITIVE
        } else {
            -F::MIN_POSITIVE
        };
        return Nearest::from_residual(p, sign);
    }
    // The residual of a tiny product falls below the denormal range; scale
    // the smaller operand so it stays representable.
    let (x, y) = if a.abs() <= b.abs() {
        (a * F::SCALE, b)
    } else {
        (a, b * F::SCALE)
    };
    Nearest::from_residual(p, x.mul_add(y, -(p * F::SCALE)))
}

/// `a / b` rounded to nearest, with the sign of the rounding error.
pub(crate) fn div<F: IeeeFloat>(a: F, b: F) -> Nearest<F> {
    let q = a / b;
    if !(a.is_finite() && b.is_finite()) || b == F::ZERO {
        return Nearest::exact(q);
    }
    if q.is_infinite() {
        return Nearest::overflowed(q);
    }
    let (a, q_scaled) = if a.abs() >= F::RESIDUAL_FLOOR {
        (a, q)
    } else {
        (a * F::SCALE, q * F::SCALE)
    };
    // a - q*b has the sign of (a/b - q) * b.
    let r = (-q_scaled).mul_add(b, a);
    let r = if b.is_sign_negative() { -r } else { r };
    Nearest::from_residual(q, r)
}

/// `sqrt(a)` rounded to nearest, with the sign of the rounding error.
pub(crate) fn sqrt<F: IeeeFloat>(a: F) -> Nearest<F> {
    let s = a.sqrt();
    if !s.is_finite() || s == F::ZERO {
        return Nearest::exact(s);
    }
    let residual = if a >= F::RESIDUAL_FLOOR {
        (-s).mul_add(s, a)
    } else {
        let s = s * F::SCALE_SQRT;
        (-s).mul_add(s, a * F::SCALE)
    };
    Nearest::from_residual(s, residual)
}

/// Narrowing T to S rounded to nearest, with the sign of the rounding error.
pub(crate) fn narrow(t: f64) -> Nearest<f32> {
    let s = t as f32;
    if !t.is_finite() {
        return Nearest::exact(s);
    }
    if s.is_infinite() {
        return Nearest::overflowed(s);
    }
    let error = t.partial_cmp(&f64::from(s)).unwrap_or(Ordering::Equal);
    Nearest { value: s, error }
}

/// Rounds a quadword integer to the nearest `F`.
pub(crate) fn from_quad<F: IeeeFloat>(
    q: i64,
    convert: impl Fn(i64) -> F,
    back: impl Fn(F) -> i128,
) -> Nearest<F> {
    let value = convert(q);
    let error = i128::from(q).cmp(&back(value));
    Nearest { value, error }
}

/// Rounds a finite `f64` to an integral `f64` in the given direction.
pub(crate) fn round_integral(t: f64, mode: RoundingMode) -> f64 {
    match mode {
        RoundingMode::Chopped => t.trunc(),
        RoundingMode::MinusInfinity => t.floor(),
        RoundingMode::Normal => t.round_ties_even(),
        RoundingMode::PlusInfinity => t.ceil(),
    }
}
