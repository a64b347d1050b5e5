//! NaN propagation for the Fbox.
//!
//! - **Propagation** ([`propagate`]): when an operand is a NaN the result is
//!   that NaN with its quiet bit set, Fa taking precedence over Fb.
//! - **Generation** ([`default_nan`]): an invalid operation on non-NaN
//!   operands returns the canonical quiet NaN.
//! - **Signaling detection** ([`any_signaling`]): a signaling NaN operand
//!   raises INV even when the result is simply propagated.

use super::rounding_modes::IeeeFloat;

/// Canonical quiet NaN (positive, quiet, zero payload).
pub(crate) fn default_nan<F: IeeeFloat>() -> F {
    quiet(F::INFINITY)
}

/// Sets the quiet bit of a NaN.
pub(crate) fn quiet<F: IeeeFloat>(value: F) -> F {
    F::from_raw(value.to_raw() | F::QUIET_BIT)
}

/// Result of an operation with a NaN operand, if any.
pub(crate) fn propagate<F: IeeeFloat>(a: F, b: F) -> Option<F> {
    if a.is_nan() {
        Some(quiet(a))
    } else if b.is_nan() {
        Some(quiet(b))
    } else {
        None
    }
}

/// True if any operand is a signaling NaN.
pub(crate) fn any_signaling<F: IeeeFloat>(operands: &[F]) -> bool {
    operands.iter().any(|v| v.is_signaling())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_nan_is_canonical() {
        assert_eq!(default_nan::<f64>().to_bits(), 0x7FF8_0000_0000_0000);
        assert_eq!(default_nan::<f32>().to_bits(), 0x7FC0_0000);
    }

    #[test]
    fn fa_takes_precedence() {
        let a = f64::from_bits(0x7FF0_0000_0000_0001);
        let b = f64::from_bits(0x7FF8_0000_0000_0002);
        let r = propagate(a, b).unwrap();
        assert_eq!(r.to_bits(), 0x7FF8_0000_0000_0001);
        assert!(any_signaling(&[a, b]));
        assert!(propagate(1.0f64, 2.0).is_none());
    }
}
