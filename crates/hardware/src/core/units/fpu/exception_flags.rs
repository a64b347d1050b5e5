//! Floating-point exception flags.
//!
//! The six exceptions an Alpha IEEE instruction can raise, in the order of
//! the FPCR status field (bits 57:52):
//!
//! | Bit | Flag | Description         |
//! |-----|------|---------------------|
//! |  0  | INV  | Invalid Operation   |
//! |  1  | DZE  | Division by Zero    |
//! |  2  | OVF  | Overflow            |
//! |  3  | UNF  | Underflow           |
//! |  4  | INE  | Inexact             |
//! |  5  | IOV  | Integer Overflow    |
//!
//! Whether a raised flag traps depends on the instruction's qualifiers and,
//! for /S instructions, on the FPCR trap-disable bits; see [`FpFlags::trapping`].

use std::ops::{BitOr, BitOrAssign};

use crate::common::error::ExceptionSummary;
use crate::core::arch::fpcr::Fpcr;
use crate::core::pipeline::signals::FpQualifiers;

/// Floating-point exception flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FpFlags(u8);

impl FpFlags {
    /// No exceptions raised.
    pub const NONE: Self = Self(0);
    /// Invalid Operation.
    pub const INV: Self = Self(1 << 0);
    /// Division by Zero.
    pub const DZE: Self = Self(1 << 1);
    /// Overflow.
    pub const OVF: Self = Self(1 << 2);
    /// Underflow.
    pub const UNF: Self = Self(1 << 3);
    /// Inexact.
    pub const INE: Self = Self(1 << 4);
    /// Integer overflow in a conversion to integer.
    pub const IOV: Self = Self(1 << 5);

    /// Builds a flag set from raw bits; bits above 5 are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x3F)
    }

    /// Returns the raw 6-bit flag value.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if no flags are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every flag of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Flags of `self` that are not in `other`.
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// The same exceptions in EXC_SUM layout.
    pub const fn to_summary(self) -> ExceptionSummary {
        ExceptionSummary::from_bits(self.0 << 1)
    }

    /// Recovers the flags from an exception summary (SWC is dropped).
    pub const fn from_summary(summary: ExceptionSummary) -> Self {
        Self::from_bits(summary.bits() >> 1)
    }

    /// Subset of the raised flags that trap under `qualifiers` and `fpcr`.
    ///
    /// INV, DZE and OVF always trap; UNF needs /U, IOV needs /V and INE needs
    /// /I. With /S, the FPCR disable bits suppress the corresponding trap.
    pub const fn trapping(self, qualifiers: FpQualifiers, fpcr: Fpcr) -> Self {
        let mut enabled = Self::INV.0 | Self::DZE.0 | Self::OVF.0;
        if qualifiers.underflow_or_overflow {
            enabled |= Self::UNF.0 | Self::IOV.0;
        }
        if qualifiers.inexact {
            enabled |= Self::INE.0;
        }
        let mut raised = Self(self.0 & enabled);
        if qualifiers.software {
            raised = raised.without(fpcr.disabled());
        }
        raised
    }
}

impl BitOr for FpFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FpFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
