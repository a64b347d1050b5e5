//! System-on-Chip (SoC) Components.
//!
//! This module organizes what lies outside the core: the memory image with
//! its protection regions, host-supplied MMIO devices, and the bus that
//! routes between them.

/// System bus interconnect and routing.
pub mod interconnect;

/// Memory image and protection.
pub mod memory;

/// Device trait definitions for MMIO access.
pub mod traits;

pub use interconnect::Bus;
pub use traits::MmioDevice;
