//! Memory protection regions.
//!
//! Each configured region grants read and write access per processor mode,
//! in the manner of the KRE/ERE/SRE/URE and KWE/EWE/SWE/UWE bits of an
//! Alpha page table entry. Addresses outside every region are unrestricted
//! and PAL mode bypasses protection.

use crate::common::error::AccessKind;
use crate::config::ProtectionRegion;
use crate::core::arch::mode::ProcessorMode;

/// The set of configured protection regions.
#[derive(Clone, Debug, Default)]
pub struct ProtectionMap {
    regions: Vec<ProtectionRegion>,
}

impl ProtectionMap {
    /// Builds the map from configured regions.
    pub fn new(regions: &[ProtectionRegion]) -> Self {
        Self {
            regions: regions.to_vec(),
        }
    }

    /// True if `mode` may perform `access` on every byte of `[addr, addr + len)`.
    ///
    /// Instruction fetches need read permission.
    pub fn permits(&self, addr: u64, len: u64, access: AccessKind, mode: ProcessorMode) -> bool {
        let end = addr.saturating_add(len);
        self.regions
            .iter()
            .filter(|r| addr < r.base.saturating_add(r.size) && r.base < end)
            .all(|r| Self::grants(r, access, mode))
    }

    const fn grants(region: &ProtectionRegion, access: AccessKind, mode: ProcessorMode) -> bool {
        match (access, mode) {
            (AccessKind::Read | AccessKind::Fetch, ProcessorMode::Kernel) => region.kre,
            (AccessKind::Read | AccessKind::Fetch, ProcessorMode::Executive) => region.ere,
            (AccessKind::Read | AccessKind::Fetch, ProcessorMode::Supervisor) => region.sre,
            (AccessKind::Read | AccessKind::Fetch, ProcessorMode::User) => region.ure,
            (AccessKind::Write, ProcessorMode::Kernel) => region.kwe,
            (AccessKind::Write, ProcessorMode::Executive) => region.ewe,
            (AccessKind::Write, ProcessorMode::Supervisor) => region.swe,
            (AccessKind::Write, ProcessorMode::User) => region.uwe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kernel_only() -> ProtectionMap {
        ProtectionMap::new(&[ProtectionRegion {
            base: 0x1000,
            size: 0x1000,
            kre: true,
            kwe: true,
            ..ProtectionRegion::default()
        }])
    }

    #[test]
    fn user_is_denied_inside_region() {
        let map = kernel_only();
        assert!(!map.permits(0x1800, 8, AccessKind::Read, ProcessorMode::User));
        assert!(map.permits(0x1800, 8, AccessKind::Write, ProcessorMode::Kernel));
    }

    #[test]
    fn straddling_access_checks_both_sides() {
        let map = kernel_only();
        assert!(!map.permits(0x0FFC, 8, AccessKind::Read, ProcessorMode::User));
        assert!(map.permits(0x0FF8, 8, AccessKind::Read, ProcessorMode::User));
    }
}
