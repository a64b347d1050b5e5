//! Physical memory image.
//!
//! This module implements the flat memory the engine executes from. It provides:
//! 1. **Storage:** A little-endian byte image covering `[0, size)`.
//! 2. **Protection:** Per-mode read/write regions checked on every access.
//! 3. **Host Access:** Bounds-checked byte-range reads and writes.

/// Per-mode access rights.
pub mod protection;

use self::protection::ProtectionMap;
use crate::common::error::MemoryError;
use crate::config::MemoryConfig;
use crate::core::pipeline::signals::MemWidth;

/// System memory structure.
#[derive(Clone, Debug)]
pub struct Memory {
    data: Vec<u8>,
    protection: ProtectionMap,
}

impl Memory {
    /// Creates a zero-filled image of the configured size.
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            data: vec![0; config.size],
            protection: ProtectionMap::new(&config.protected),
        }
    }

    /// Image size in bytes.
    pub const fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Protection regions.
    pub const fn protection(&self) -> &ProtectionMap {
        &self.protection
    }

    /// True if `[addr, addr + len)` lies inside the image.
    pub const fn contains(&self, addr: u64, len: u64) -> bool {
        match addr.checked_add(len) {
            Some(end) => end <= self.size(),
            None => false,
        }
    }

    fn range(&self, addr: u64, len: u64) -> Result<std::ops::Range<usize>, MemoryError> {
        if self.contains(addr, len) {
            Ok(addr as usize..(addr + len) as usize)
        } else {
            Err(MemoryError::OutOfRange {
                addr,
                len,
                size: self.size(),
            })
        }
    }

    /// Reads `width` bytes at `addr`, zero-extended.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] outside the image.
    pub fn read(&self, addr: u64, width: MemWidth) -> Result<u64, MemoryError> {
        let range = self.range(addr, width.bytes())?;
        let mut bytes = [0u8; 8];
        bytes[..range.len()].copy_from_slice(&self.data[range]);
        Ok(u64::from_le_bytes(bytes))
    }

    /// Writes the low `width` bytes of `value` at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] outside the image.
    pub fn write(&mut self, addr: u64, width: MemWidth, value: u64) -> Result<(), MemoryError> {
        let range = self.range(addr, width.bytes())?;
        let len = range.len();
        self.data[range].copy_from_slice(&value.to_le_bytes()[..len]);
        Ok(())
    }

    /// Copies `len` bytes starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] outside the image.
    pub fn read_bytes(&self, addr: u64, len: u64) -> Result<Vec<u8>, MemoryError> {
        let range = self.range(addr, len)?;
        Ok(self.data[range].to_vec())
    }

    /// Copies `bytes` into the image at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] outside the image.
    pub fn write_bytes(&mut self, addr: u64, bytes: &[u8]) -> Result<(), MemoryError> {
        let range = self.range(addr, bytes.len() as u64)?;
        self.data[range].copy_from_slice(bytes);
        Ok(())
    }
}
