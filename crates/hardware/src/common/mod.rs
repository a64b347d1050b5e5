//! Common types shared throughout the Alpha execution engine.
//!
//! This module provides the small vocabulary every other component speaks:
//! 1. **Constants:** Architectural sizes, implementation identifiers and limits.
//! 2. **Error Handling:** Trap kinds, trap events and host-facing errors.
//! 3. **Registers:** Architectural register names for the integer and FP files.

/// Architectural and implementation constants.
pub mod constants;

/// Trap definitions and host-facing error types.
pub mod error;

/// Architectural register naming.
pub mod reg;

pub use error::{
    AccessKind, ExceptionSummary, FaultReason, MemoryError, SimError, TrapEvent, TrapKind,
};
pub use reg::{ArchReg, RegClass};
