//! Alpha Processor Modes.
//!
//! This module defines the four access modes of the Alpha architecture. It implements the following:
//! 1. **Mode Classification:** Kernel, Executive, Supervisor and User, as held in the CM register.
//! 2. **Serialization:** Conversion between the 2-bit CM field and enum variants.
//! 3. **Observability:** Human-readable naming and display formatting for mode state.
//!
//! PAL mode is orthogonal to the current mode and is tracked separately in
//! [`ArchitecturalState`](super::state::ArchitecturalState).

use std::fmt;

/// Alpha current-mode (CM) levels, most privileged first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProcessorMode {
    /// Kernel mode, the mode traps enter.
    #[default]
    Kernel = 0,

    /// Executive mode.
    Executive = 1,

    /// Supervisor mode.
    Supervisor = 2,

    /// User mode.
    User = 3,
}

impl ProcessorMode {
    /// Converts a 2-bit CM field to a mode; higher bits are ignored.
    pub const fn from_bits(bits: u64) -> Self {
        match bits & 0x3 {
            0 => Self::Kernel,
            1 => Self::Executive,
            2 => Self::Supervisor,
            _ => Self::User,
        }
    }

    /// The 2-bit CM encoding of this mode.
    pub const fn bits(self) -> u64 {
        self as u64
    }

    /// True in kernel mode, the only mode allowed to call privileged PAL functions.
    pub const fn is_kernel(self) -> bool {
        matches!(self, Self::Kernel)
    }

    /// Returns the human-readable name of the mode.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kernel => "Kernel",
            Self::Executive => "Executive",
            Self::Supervisor => "Supervisor",
            Self::User => "User",
        }
    }
}

impl fmt::Display for ProcessorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
