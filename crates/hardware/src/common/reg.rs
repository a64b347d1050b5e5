//! Architectural register naming.
//!
//! Alpha has two 32-entry register files. Register 31 of each file is
//! hardwired: it reads as zero and writes to it are discarded.

use std::fmt;

use super::constants::ZERO_REG;

/// Register file an architectural register belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegClass {
    /// Integer registers R0-R31.
    Int,
    /// Floating-point registers F0-F31.
    Fp,
}

/// An architectural register, e.g. `R4` or `F12`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArchReg {
    /// Register file.
    pub class: RegClass,
    /// Register number (0-31).
    pub index: u8,
}

impl ArchReg {
    /// Names integer register `index`.
    #[inline]
    pub const fn int(index: u8) -> Self {
        Self {
            class: RegClass::Int,
            index: index & 0x1F,
        }
    }

    /// Names floating-point register `index`.
    #[inline]
    pub const fn fp(index: u8) -> Self {
        Self {
            class: RegClass::Fp,
            index: index & 0x1F,
        }
    }

    /// True for R31 and F31.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.index == ZERO_REG
    }

    /// Returns `Some(self)` unless this is the zero register.
    ///
    /// Used when naming destinations: a write to R31/F31 has no consumer.
    #[inline]
    pub const fn unless_zero(self) -> Option<Self> {
        if self.is_zero() { None } else { Some(self) }
    }
}

impl fmt::Display for ArchReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            RegClass::Int => write!(f, "R{}", self.index),
            RegClass::Fp => write!(f, "F{}", self.index),
        }
    }
}
