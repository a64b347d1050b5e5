//! Mock implementations of host-supplied components.

/// Mock MMIO device.
pub mod device;
