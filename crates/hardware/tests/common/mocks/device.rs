//! Mock MMIO device.
//!
//! [`MockRegisters`] records and scripts register accesses; [`MockedDevice`]
//! adapts it to the bus's `MmioDevice` trait.

use axp_core::MmioDevice;
use axp_core::core::pipeline::signals::MemWidth;
use mockall::automock;

/// The access half of a device, mocked with `mockall`.
#[automock]
pub trait Registers {
    /// Register read at `offset` within the window.
    fn read(&mut self, offset: u64, width: MemWidth) -> u64;
    /// Register write at `offset` within the window.
    fn write(&mut self, offset: u64, width: MemWidth, value: u64);
}

/// An `MmioDevice` whose register accesses go to a [`MockRegisters`].
pub struct MockedDevice {
    /// Window size in bytes.
    pub size: u64,
    /// Expectations for reads and writes.
    pub registers: MockRegisters,
}

impl MockedDevice {
    /// Device with a `size`-byte window backed by `registers`.
    pub fn new(size: u64, registers: MockRegisters) -> Self {
        Self { size, registers }
    }
}

impl MmioDevice for MockedDevice {
    fn name(&self) -> &str {
        "mock"
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn read(&mut self, offset: u64, width: MemWidth) -> u64 {
        self.registers.read(offset, width)
    }

    fn write(&mut self, offset: u64, width: MemWidth, value: u64) {
        self.registers.write(offset, width, value);
    }
}
