//! Floating-Point Control Register (FPCR).
//!
//! Layout of the 21264 FPCR (bits 47:0 read as zero):
//!
//! | Bit   | Name  | Meaning                                   |
//! |-------|-------|-------------------------------------------|
//! | 63    | SUM   | OR of the status bits 57:52               |
//! | 62    | INED  | Inexact trap disable (/S only)            |
//! | 61    | UNFD  | Underflow trap disable (/S only)          |
//! | 60    | UNDZ  | Underflow to zero                         |
//! | 59:58 | DYN   | Dynamic rounding mode                     |
//! | 57    | IOV   | Integer overflow status                   |
//! | 56    | INE   | Inexact status                            |
//! | 55    | UNF   | Underflow status                          |
//! | 54    | OVF   | Overflow status                           |
//! | 53    | DZE   | Division by zero status                   |
//! | 52    | INV   | Invalid operation status                  |
//! | 51    | OVFD  | Overflow trap disable (/S only)           |
//! | 50    | DZED  | Division by zero trap disable (/S only)   |
//! | 49    | INVD  | Invalid operation trap disable (/S only)  |
//! | 48    | DNZ   | Denormal operands to zero                 |

use crate::core::units::fpu::exception_flags::FpFlags;
use crate::core::units::fpu::rounding_modes::RoundingMode;

/// Implemented FPCR bits.
const IMPLEMENTED: u64 = 0xFFFF_0000_0000_0000;
/// Summary bit.
const SUM: u64 = 1 << 63;
/// Inexact disable.
const INED: u64 = 1 << 62;
/// Underflow disable.
const UNFD: u64 = 1 << 61;
/// Underflow to zero.
const UNDZ: u64 = 1 << 60;
/// Dynamic rounding mode field position.
const DYN_SHIFT: u32 = 58;
/// Overflow disable.
const OVFD: u64 = 1 << 51;
/// Division by zero disable.
const DZED: u64 = 1 << 50;
/// Invalid operation disable.
const INVD: u64 = 1 << 49;
/// Denormal operands to zero.
const DNZ: u64 = 1 << 48;
/// Position of the lowest status bit (INV).
const STATUS_SHIFT: u32 = 52;
/// Mask of the six status bits.
const STATUS_MASK: u64 = 0x3F << STATUS_SHIFT;

/// Value of the floating-point control register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fpcr(u64);

impl Default for Fpcr {
    /// Reset value: round to nearest, no traps disabled, no status.
    fn default() -> Self {
        Self(0b10 << DYN_SHIFT)
    }
}

impl Fpcr {
    /// Builds an FPCR from a value moved in by MT_FPCR.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits & IMPLEMENTED)
    }

    /// Raw register value, as read by MF_FPCR.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Rounding mode used by instructions with the /D qualifier.
    pub const fn dynamic_rounding(self) -> RoundingMode {
        RoundingMode::from_fpcr_bits(((self.0 >> DYN_SHIFT) & 0x3) as u8)
    }

    /// Denormal operands are treated as zero.
    pub const fn denormals_to_zero(self) -> bool {
        self.0 & DNZ != 0
    }

    /// Underflowed results are replaced by zero.
    pub const fn underflow_to_zero(self) -> bool {
        self.0 & UNDZ != 0
    }

    /// Exceptions whose traps are disabled for /S instructions.
    pub const fn disabled(self) -> FpFlags {
        let mut bits = 0;
        if self.0 & INVD != 0 {
            bits |= FpFlags::INV.bits();
        }
        if self.0 & DZED != 0 {
            bits |= FpFlags::DZE.bits();
        }
        if self.0 & OVFD != 0 {
            bits |= FpFlags::OVF.bits();
        }
        if self.0 & UNFD != 0 {
            bits |= FpFlags::UNF.bits();
        }
        if self.0 & INED != 0 {
            bits |= FpFlags::INE.bits();
        }
        FpFlags::from_bits(bits)
    }

    /// Accumulated exception status.
    pub const fn status(self) -> FpFlags {
        FpFlags::from_bits(((self.0 & STATUS_MASK) >> STATUS_SHIFT) as u8)
    }

    /// Ors `flags` into the status bits and updates SUM.
    #[must_use]
    pub const fn accrue(self, flags: FpFlags) -> Self {
        let status = (self.0 & STATUS_MASK) | ((flags.bits() as u64) << STATUS_SHIFT);
        let sum = if status == 0 { self.0 & SUM } else { SUM };
        Self((self.0 & !(STATUS_MASK | SUM)) | status | sum)
    }
}
