//! System interconnect (bus) for memory and MMIO access.
//!
//! This module implements the bus that routes physical addresses to RAM or
//! to host-mapped devices. It provides:
//! 1. **Device registration:** MMIO windows are added by base address and must not overlap.
//! 2. **Access checking:** Range and protection checks that produce Alpha memory faults.
//! 3. **Access routing:** Reads and writes by address, with a last-device hint.
//!
//! RAM may be read through `&self` so that speculative loads never disturb
//! device state; device reads need `&mut self`.

use std::fmt;

use super::memory::Memory;
use super::traits::MmioDevice;
use crate::common::error::{AccessKind, FaultReason, MemoryError, TrapKind};
use crate::config::MemoryConfig;
use crate::core::arch::mode::ProcessorMode;
use crate::core::pipeline::signals::MemWidth;

/// A device mapped at a fixed window.
struct MmioRegion {
    base: u64,
    size: u64,
    device: Box<dyn MmioDevice>,
}

impl MmioRegion {
    const fn contains(&self, addr: u64, len: u64) -> bool {
        addr >= self.base && addr.saturating_add(len) <= self.base.saturating_add(self.size)
    }
}

/// System bus connecting the core to RAM and devices.
pub struct Bus {
    memory: Memory,
    /// Registered MMIO windows, sorted by base address.
    devices: Vec<MmioRegion>,
    last_device_idx: usize,
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("memory_size", &self.memory.size())
            .field(
                "devices",
                &self
                    .devices
                    .iter()
                    .map(|d| (d.device.name().to_owned(), d.base, d.size))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Bus {
    /// Creates a bus over a fresh memory image.
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            memory: Memory::new(config),
            devices: Vec::new(),
            last_device_idx: 0,
        }
    }

    /// The RAM image.
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Maps `device` at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OverlappingMmio`] if the window overlaps an
    /// existing one or is empty.
    pub fn map_mmio(&mut self, base: u64, device: Box<dyn MmioDevice>) -> Result<(), MemoryError> {
        let size = device.size();
        let end = base.checked_add(size);
        let overlaps = self
            .devices
            .iter()
            .any(|d| base < d.base.saturating_add(d.size) && d.base < base.saturating_add(size));
        if size == 0 || end.is_none() || overlaps {
            return Err(MemoryError::OverlappingMmio { base, size });
        }
        tracing::debug!(name = device.name(), base, size, "mapped MMIO device");
        self.devices.push(MmioRegion { base, size, device });
        self.devices.sort_by_key(|d| d.base);
        self.last_device_idx = 0;
        Ok(())
    }

    fn find_device(&mut self, addr: u64, len: u64) -> Option<&mut MmioRegion> {
        if self
            .devices
            .get(self.last_device_idx)
            .is_some_and(|d| d.contains(addr, len))
        {
            return self.devices.get_mut(self.last_device_idx);
        }
        let idx = self.devices.iter().position(|d| d.contains(addr, len))?;
        self.last_device_idx = idx;
        self.devices.get_mut(idx)
    }

    /// True if the access falls inside a device window.
    pub fn is_mmio(&self, addr: u64, width: MemWidth) -> bool {
        self.devices.iter().any(|d| d.contains(addr, width.bytes()))
    }

    /// Checks that `mode` may perform `access` on `[addr, addr + len)`.
    ///
    /// PAL mode skips the protection check but not the range check.
    ///
    /// # Errors
    ///
    /// Returns an access-violation `MemoryFault` for unbacked addresses and
    /// for accesses the protection regions deny.
    pub fn check(
        &self,
        addr: u64,
        len: u64,
        access: AccessKind,
        mode: ProcessorMode,
        pal_mode: bool,
    ) -> Result<(), TrapKind> {
        let backed =
            self.memory.contains(addr, len) || self.devices.iter().any(|d| d.contains(addr, len));
        let permitted = pal_mode || self.memory.protection().permits(addr, len, access, mode);
        if backed && permitted {
            Ok(())
        } else {
            Err(TrapKind::MemoryFault {
                address: addr,
                access,
                reason: FaultReason::AccessViolation,
            })
        }
    }

    /// Reads RAM without side effects; `None` if the range is not RAM.
    pub fn peek(&self, addr: u64, width: MemWidth) -> Option<u64> {
        self.memory.read(addr, width).ok()
    }

    /// Reads RAM or a device.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] if nothing backs the address.
    pub fn read(&mut self, addr: u64, width: MemWidth) -> Result<u64, MemoryError> {
        if let Some(region) = self.find_device(addr, width.bytes()) {
            let offset = addr - region.base;
            return Ok(region.device.read(offset, width));
        }
        self.memory.read(addr, width)
    }

    /// Writes RAM or a device.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] if nothing backs the address.
    pub fn write(&mut self, addr: u64, width: MemWidth, value: u64) -> Result<(), MemoryError> {
        if let Some(region) = self.find_device(addr, width.bytes()) {
            let offset = addr - region.base;
            region.device.write(offset, width, value);
            return Ok(());
        }
        self.memory.write(addr, width, value)
    }

    /// Fetches the instruction word at `pc`.
    ///
    /// # Errors
    ///
    /// Returns an IACV `MemoryFault` for fetches outside RAM or denied by
    /// protection. Instructions are never fetched from devices.
    pub fn fetch(&self, pc: u64, mode: ProcessorMode, pal_mode: bool) -> Result<u32, TrapKind> {
        let fault = TrapKind::MemoryFault {
            address: pc,
            access: AccessKind::Fetch,
            reason: FaultReason::AccessViolation,
        };
        if !pal_mode && !self.memory.protection().permits(pc, 4, AccessKind::Fetch, mode) {
            return Err(fault);
        }
        self.memory
            .read(pc, MemWidth::Long)
            .map(|w| w as u32)
            .map_err(|_| fault)
    }

    /// Host read of a RAM byte range.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] outside the image.
    pub fn read_bytes(&self, addr: u64, len: u64) -> Result<Vec<u8>, MemoryError> {
        self.memory.read_bytes(addr, len)
    }

    /// Host write of a RAM byte range.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] outside the image.
    pub fn write_bytes(&mut self, addr: u64, bytes: &[u8]) -> Result<(), MemoryError> {
        self.memory.write_bytes(addr, bytes)
    }
}
