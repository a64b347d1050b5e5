//! Alpha architecture-specific components.
//!
//! This module contains the architecturally visible state of the 21264.
//! It includes the following modules:
//! 1. **FPCR:** Floating-point control register fields.
//! 2. **IPRs:** Internal processor registers reached through HW_MFPR/HW_MTPR.
//! 3. **Modes:** Current-mode definitions.
//! 4. **State:** Register files, PC and processor status.
//! 5. **Traps:** PAL entry selection and trap delivery.

/// Floating-point control register.
pub mod fpcr;

/// Internal processor registers.
pub mod ipr;

/// Processor mode definitions.
pub mod mode;

/// Architectural state and processor status.
pub mod state;

/// Trap delivery.
pub mod trap;

pub use self::state::{ArchitecturalState, ProcessorStatus};
