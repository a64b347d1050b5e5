//! Simulator-level tests.

/// MMIO devices and host memory access.
pub mod mmio;

/// End-to-end program scenarios.
pub mod scenarios;

/// Trap delivery, PALcode entry and interrupts.
pub mod traps;
