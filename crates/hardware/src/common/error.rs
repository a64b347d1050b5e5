//! Trap and error definitions.
//!
//! This module defines the error handling and trap mechanisms for the engine. It provides:
//! 1. **Trap Representation:** Every synchronous fault, PAL entry and interrupt the 21264 delivers.
//! 2. **Trap Events:** The record handed back to the host when a fault stops execution.
//! 3. **Host Errors:** Failures of the host-facing API, including internal invariant violations.

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;

/// Kind of memory access that faulted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Instruction fetch.
    Fetch,
    /// Data read (load).
    Read,
    /// Data write (store).
    Write,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fetch => "fetch",
            Self::Read => "read",
            Self::Write => "write",
        };
        write!(f, "{s}")
    }
}

/// Why a memory access was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum FaultReason {
    /// Address is not a multiple of the access width.
    #[error("unaligned access")]
    Unaligned,
    /// Address is outside memory or the current mode lacks permission.
    #[error("access violation")]
    AccessViolation,
}

/// Arithmetic exception summary, laid out like the 21264 EXC_SUM register.
///
/// | Bit | Name | Meaning                         |
/// |-----|------|---------------------------------|
/// |  0  | SWC  | Software completion (/S given)  |
/// |  1  | INV  | Invalid operation               |
/// |  2  | DZE  | Division by zero                |
/// |  3  | OVF  | Floating overflow               |
/// |  4  | UNF  | Floating underflow              |
/// |  5  | INE  | Inexact result                  |
/// |  6  | IOV  | Integer overflow                |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ExceptionSummary(u8);

impl ExceptionSummary {
    /// No exceptions.
    pub const NONE: Self = Self(0);
    /// Software completion requested by the /S qualifier.
    pub const SWC: Self = Self(1 << 0);
    /// Invalid operation.
    pub const INV: Self = Self(1 << 1);
    /// Division by zero.
    pub const DZE: Self = Self(1 << 2);
    /// Floating overflow.
    pub const OVF: Self = Self(1 << 3);
    /// Floating underflow.
    pub const UNF: Self = Self(1 << 4);
    /// Inexact result.
    pub const INE: Self = Self(1 << 5);
    /// Integer overflow.
    pub const IOV: Self = Self(1 << 6);

    const NAMES: [(Self, &'static str); 7] = [
        (Self::SWC, "SWC"),
        (Self::INV, "INV"),
        (Self::DZE, "DZE"),
        (Self::OVF, "OVF"),
        (Self::UNF, "UNF"),
        (Self::INE, "INE"),
        (Self::IOV, "IOV"),
    ];

    /// Builds a summary from raw EXC_SUM bits.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x7F)
    }

    /// Raw EXC_SUM bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if no exception bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Union of two summaries.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for ExceptionSummary {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for ExceptionSummary {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for ExceptionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Alpha trap kinds.
///
/// Traps transfer control to PALcode. Illegal instructions, arithmetic traps
/// and memory faults are true faults: they stop [`run`](crate::sim::Simulator::run)
/// and are reported to the host. CALL_PAL and interrupts are ordinary PAL
/// entries and execution continues in the handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum TrapKind {
    /// Reserved or unimplemented opcode, or a privileged instruction
    /// executed outside the mode that permits it (OPCDEC).
    #[error("illegal instruction {word:#010x}")]
    IllegalInstruction {
        /// The offending instruction word.
        word: u32,
    },

    /// Integer overflow or an enabled IEEE exception (ARITH).
    #[error("arithmetic trap ({summary})")]
    ArithmeticTrap {
        /// Exceptions raised by the instruction.
        summary: ExceptionSummary,
    },

    /// Alignment, range or protection violation (UNALIGN, DFAULT, IACV).
    #[error("{reason} on {access} at {address:#x}")]
    MemoryFault {
        /// Faulting virtual address.
        address: u64,
        /// Access that faulted.
        access: AccessKind,
        /// Cause of the fault.
        reason: FaultReason,
    },

    /// CALL_PAL entry.
    #[error("CALL_PAL {function:#x}")]
    CallPal {
        /// PAL function code (instruction bits 25:0).
        function: u32,
    },

    /// External interrupt raised by the host.
    #[error("external interrupt")]
    Interrupt,
}

impl TrapKind {
    /// True for traps that stop `run` and are reported to the host.
    pub const fn is_fault(&self) -> bool {
        matches!(
            self,
            Self::IllegalInstruction { .. } | Self::ArithmeticTrap { .. } | Self::MemoryFault { .. }
        )
    }
}

/// A delivered trap: what happened, where, and where control went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrapEvent {
    /// Trap kind and auxiliary data.
    pub kind: TrapKind,
    /// PC of the instruction that trapped (or was interrupted).
    pub pc: u64,
    /// PALcode entry point control was transferred to.
    pub handler: u64,
}

impl fmt::Display for TrapEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at pc={:#x} (handler {:#x})",
            self.kind, self.pc, self.handler
        )
    }
}

/// Errors from host accesses to the memory image.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// The byte range lies (partly) outside the image.
    #[error("range {addr:#x}+{len:#x} lies outside the {size:#x}-byte memory image")]
    OutOfRange {
        /// First byte of the range.
        addr: u64,
        /// Length of the range.
        len: u64,
        /// Size of the memory image.
        size: u64,
    },

    /// An MMIO mapping overlaps an existing one.
    #[error("MMIO region {base:#x}+{size:#x} overlaps an existing mapping")]
    OverlappingMmio {
        /// Base of the rejected region.
        base: u64,
        /// Size of the rejected region.
        size: u64,
    },
}

/// Errors returned by the host-facing engine API.
#[derive(Debug, Error)]
pub enum SimError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A host memory access was rejected.
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// An internal consistency check failed; the engine is now poisoned.
    #[error("engine invariant violated: {0}")]
    Invariant(String),

    /// A previous invariant violation left the engine unusable.
    #[error("engine is poisoned by an earlier invariant violation")]
    Poisoned,
}
