//! Configuration system for the Alpha execution engine.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the engine. It provides:
//! 1. **Defaults:** Baseline 21264 constants (register pools, widths, latencies, predictor tables).
//! 2. **Structures:** Hierarchical config for general, memory, trap and pipeline settings.
//! 3. **Validation:** Rejection of configurations the engine cannot honor.
//!
//! Configuration is applied once, when the [`Simulator`](crate::sim::Simulator) is
//! constructed. Hosts build it with [`Config::default()`] or [`Config::from_json`].

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::common::constants::ARCH_REGS;

/// Default configuration constants for the engine.
///
/// Sizes follow the Alpha 21264 hardware reference manual where the chip
/// has a corresponding structure.
mod defaults {
    /// Size of the flat memory image (16 MiB).
    pub const MEMORY_SIZE: usize = 16 * 1024 * 1024;

    /// Initial program counter.
    pub const START_PC: u64 = 0x0002_0000;

    /// Base of the PALcode image; trap entry points are offsets from it.
    pub const PAL_BASE: u64 = 0x0000_8000;

    /// Integer physical registers (the 21264 has 80).
    pub const INT_PHYS_REGS: usize = 80;

    /// Floating-point physical registers (the 21264 has 72).
    pub const FP_PHYS_REGS: usize = 72;

    /// In-flight instruction window (the 21264 tracks 80).
    pub const ROB_SIZE: usize = 80;

    /// Instructions fetched per cycle.
    pub const FETCH_WIDTH: usize = 4;

    /// Instructions renamed and dispatched per cycle.
    pub const DISPATCH_WIDTH: usize = 4;

    /// Instructions retired per cycle (sustained rate on the 21264).
    pub const RETIRE_WIDTH: usize = 8;

    /// Depth of the queue between fetch and dispatch.
    pub const FETCH_QUEUE_SIZE: usize = 16;

    /// Outstanding branch checkpoints.
    pub const MAX_CHECKPOINTS: usize = 16;

    /// Store queue entries (the 21264 has 32).
    pub const STORE_BUFFER_SIZE: usize = 32;

    /// Integer issue slots per cycle (two upper, two lower subclusters).
    pub const INT_UNITS: usize = 4;

    /// FP issue slots per cycle (add and multiply pipes).
    pub const FP_UNITS: usize = 2;

    /// Memory issue slots per cycle.
    pub const MEM_UNITS: usize = 2;

    /// Branch Target Buffer entries.
    pub const BTB_SIZE: usize = 512;

    /// Return Address Stack entries (the 21264 has 32).
    pub const RAS_SIZE: usize = 32;

    /// Tournament global history table size (log2, 4096 entries).
    pub const TOURNAMENT_GLOBAL_BITS: usize = 12;

    /// Tournament local history table size (log2, 1024 entries).
    pub const TOURNAMENT_LOCAL_HIST_BITS: usize = 10;

    /// Tournament local prediction table size (log2, 1024 entries).
    pub const TOURNAMENT_LOCAL_PRED_BITS: usize = 10;

    /// GShare pattern table size (log2).
    pub const GSHARE_BITS: usize = 12;

    /// Cycles without a retirement before the engine reports a deadlock.
    pub const DEADLOCK_CYCLES: u64 = 10_000;

    /// Simple integer operate latency.
    pub const LAT_INT: u64 = 1;
    /// Integer multiply latency.
    pub const LAT_IMUL: u64 = 7;
    /// FP add, multiply, compare and convert latency.
    pub const LAT_FP: u64 = 4;
    /// DIVS latency.
    pub const LAT_FDIV_S: u64 = 12;
    /// DIVT latency.
    pub const LAT_FDIV_T: u64 = 15;
    /// SQRTS latency.
    pub const LAT_FSQRT_S: u64 = 18;
    /// SQRTT latency.
    pub const LAT_FSQRT_T: u64 = 33;
    /// Load-to-use latency on a data cache hit.
    pub const LAT_LOAD: u64 = 3;
}

/// Widest predictor table index accepted (local histories are 16 bits).
const MAX_TABLE_BITS: usize = 16;

/// Errors found while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A physical register pool cannot hold the architectural file plus a spare.
    #[error("{bank} physical register pool has {found} entries, at least {minimum} required")]
    TooFewPhysicalRegisters {
        /// "integer" or "floating-point".
        bank: &'static str,
        /// Configured size.
        found: usize,
        /// Smallest usable size.
        minimum: usize,
    },

    /// A size or width that must be non-zero is zero.
    #[error("{field} must be non-zero")]
    Zero {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A table size that must be a power of two is not.
    #[error("{field} must be a power of two, got {value}")]
    NotPowerOfTwo {
        /// Name of the offending field.
        field: &'static str,
        /// Configured value.
        value: usize,
    },

    /// A predictor table index width is zero or too large.
    #[error("{field} must be between 1 and 16, got {value}")]
    TableBits {
        /// Name of the offending field.
        field: &'static str,
        /// Configured value.
        value: usize,
    },

    /// An address that must be instruction-aligned is not.
    #[error("{field} must be 4-byte aligned, got {value:#x}")]
    Misaligned {
        /// Name of the offending field.
        field: &'static str,
        /// Configured value.
        value: u64,
    },

    /// A protection region does not fit inside the memory image.
    #[error("protection region {base:#x}+{size:#x} exceeds memory")]
    RegionOutOfRange {
        /// Region base.
        base: u64,
        /// Region size.
        size: u64,
    },
}

/// Branch prediction algorithm types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BranchPredictor {
    /// Backward taken, forward not taken.
    ///
    /// The static rule Alpha compilers lay code out for.
    Static,
    /// Every conditional branch predicted taken.
    AlwaysTaken,
    /// Global history XOR PC indexed 2-bit counters.
    GShare,
    /// Local/global predictor with a choice table, as on the 21264.
    #[default]
    Tournament,
}

/// PALcode entry points that can be relocated by configuration.
///
/// Default offsets from `pal_base` follow the 21264 PALcode entry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TrapVector {
    /// Unaligned data access (UNALIGN, offset 0x280).
    Unaligned,
    /// Data access violation (DFAULT, offset 0x380).
    Dfault,
    /// Reserved or privileged opcode (OPCDEC, offset 0x400).
    Opcdec,
    /// Instruction access violation (IACV, offset 0x480).
    Iacv,
    /// Arithmetic trap (ARITH, offset 0x600).
    Arith,
    /// External interrupt (INTERRUPT, offset 0x680).
    Interrupt,
}

impl TrapVector {
    /// Offset of the entry point from `pal_base`.
    pub const fn default_offset(self) -> u64 {
        match self {
            Self::Unaligned => 0x280,
            Self::Dfault => 0x380,
            Self::Opcdec => 0x400,
            Self::Iacv => 0x480,
            Self::Arith => 0x600,
            Self::Interrupt => 0x680,
        }
    }
}

/// Root configuration structure containing all engine settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use axp_core::config::{BranchPredictor, Config};
///
/// let config = Config::default();
/// assert_eq!(config.pipeline.int_phys_regs, 80);
/// assert_eq!(config.pipeline.branch_predictor, BranchPredictor::Tournament);
/// ```
///
/// Deserializing from JSON; omitted fields take their defaults:
///
/// ```
/// use axp_core::config::{BranchPredictor, Config, TrapVector};
///
/// let json = r#"{
///     "general": { "start_pc": 65536 },
///     "memory": {
///         "size": 1048576,
///         "protected": [
///             { "base": 0, "size": 4096, "kre": true, "kwe": true }
///         ]
///     },
///     "traps": {
///         "pal_base": 32768,
///         "vectors": { "Arith": 40960 }
///     },
///     "pipeline": {
///         "branch_predictor": "Static",
///         "int_phys_regs": 48
///     }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.start_pc, 0x10000);
/// assert_eq!(config.memory.size, 1 << 20);
/// assert_eq!(config.traps.handler(TrapVector::Arith), 0xA000);
/// assert_eq!(config.traps.handler(TrapVector::Opcdec), 0x8400);
/// assert_eq!(config.pipeline.int_phys_regs, 48);
/// assert_eq!(config.pipeline.fp_phys_regs, 72);
/// assert_eq!(config.pipeline.branch_predictor, BranchPredictor::Static);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General execution settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Memory image and protection
    #[serde(default)]
    pub memory: MemoryConfig,
    /// PALcode base and trap entry points
    #[serde(default)]
    pub traps: TrapConfig,
    /// Out-of-order core and branch predictor configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input and any error
    /// reported by [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a machine the engine can build.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Every architectural register except the zero register needs a
        // committed mapping, the zero register owns one slot, and at least
        // one register must remain free for renaming.
        let minimum = ARCH_REGS + 1;
        for (bank, found) in [
            ("integer", self.pipeline.int_phys_regs),
            ("floating-point", self.pipeline.fp_phys_regs),
        ] {
            if found < minimum {
                return Err(ConfigError::TooFewPhysicalRegisters {
                    bank,
                    found,
                    minimum,
                });
            }
        }

        let p = &self.pipeline;
        for (field, value) in [
            ("memory.size", self.memory.size),
            ("pipeline.fetch_width", p.fetch_width),
            ("pipeline.dispatch_width", p.dispatch_width),
            ("pipeline.retire_width", p.retire_width),
            ("pipeline.fetch_queue_size", p.fetch_queue_size),
            ("pipeline.rob_size", p.rob_size),
            ("pipeline.max_checkpoints", p.max_checkpoints),
            ("pipeline.store_buffer_size", p.store_buffer_size),
            ("pipeline.issue.int_units", p.issue.int_units),
            ("pipeline.issue.fp_units", p.issue.fp_units),
            ("pipeline.issue.mem_units", p.issue.mem_units),
            ("pipeline.ras_size", p.ras_size),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }

        if self.general.deadlock_cycles == 0 {
            return Err(ConfigError::Zero {
                field: "general.deadlock_cycles",
            });
        }

        if !p.btb_size.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "pipeline.btb_size",
                value: p.btb_size,
            });
        }

        for (field, value) in [
            ("pipeline.gshare_bits", p.gshare_bits),
            ("pipeline.tournament.global_size_bits", p.tournament.global_size_bits),
            ("pipeline.tournament.local_hist_bits", p.tournament.local_hist_bits),
            ("pipeline.tournament.local_pred_bits", p.tournament.local_pred_bits),
        ] {
            if value == 0 || value > MAX_TABLE_BITS {
                return Err(ConfigError::TableBits { field, value });
            }
        }

        for (field, value) in [
            ("general.start_pc", self.general.start_pc),
            ("traps.pal_base", self.traps.pal_base),
        ] {
            if value & 3 != 0 {
                return Err(ConfigError::Misaligned { field, value });
            }
        }
        for &value in self.traps.vectors.values() {
            if value & 3 != 0 {
                return Err(ConfigError::Misaligned {
                    field: "traps.vectors",
                    value,
                });
            }
        }

        let mem = self.memory.size as u64;
        for region in &self.memory.protected {
            let end = region.base.checked_add(region.size);
            if region.size == 0 || end.is_none_or(|end| end > mem) {
                return Err(ConfigError::RegionOutOfRange {
                    base: region.base,
                    size: region.size,
                });
            }
        }

        Ok(())
    }
}

/// General execution settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Initial PC value
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: u64,
    /// Start with PAL mode set, as after a 21264 reset
    #[serde(default)]
    pub start_in_pal_mode: bool,
    /// Cycles without a retirement before `run` reports a deadlock
    #[serde(default = "GeneralConfig::default_deadlock_cycles")]
    pub deadlock_cycles: u64,
}

impl GeneralConfig {
    /// Returns the default starting program counter.
    const fn default_start_pc() -> u64 {
        defaults::START_PC
    }

    /// Returns the default deadlock threshold.
    const fn default_deadlock_cycles() -> u64 {
        defaults::DEADLOCK_CYCLES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            start_pc: defaults::START_PC,
            start_in_pal_mode: false,
            deadlock_cycles: defaults::DEADLOCK_CYCLES,
        }
    }
}

/// Memory image configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Size of the flat memory image in bytes, starting at address 0
    #[serde(default = "MemoryConfig::default_size")]
    pub size: usize,
    /// Regions with restricted access rights
    #[serde(default)]
    pub protected: Vec<ProtectionRegion>,
}

impl MemoryConfig {
    /// Returns the default memory size.
    const fn default_size() -> usize {
        defaults::MEMORY_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: defaults::MEMORY_SIZE,
            protected: Vec::new(),
        }
    }
}

/// A range of memory with Alpha PTE-style access rights.
///
/// Each flag grants read (`*re`) or write (`*we`) access to one mode:
/// kernel, executive, supervisor or user. Addresses outside every region
/// are fully accessible; PAL mode bypasses protection entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProtectionRegion {
    /// First byte of the region
    pub base: u64,
    /// Length of the region in bytes
    pub size: u64,
    /// Kernel read enable
    pub kre: bool,
    /// Executive read enable
    pub ere: bool,
    /// Supervisor read enable
    pub sre: bool,
    /// User read enable
    pub ure: bool,
    /// Kernel write enable
    pub kwe: bool,
    /// Executive write enable
    pub ewe: bool,
    /// Supervisor write enable
    pub swe: bool,
    /// User write enable
    pub uwe: bool,
}

/// PALcode base and trap entry point configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TrapConfig {
    /// Base address of the PALcode image
    #[serde(default = "TrapConfig::default_pal_base")]
    pub pal_base: u64,
    /// Absolute handler addresses overriding `pal_base + offset`
    #[serde(default)]
    pub vectors: BTreeMap<TrapVector, u64>,
    /// Stop execution on CALL_PAL HALT instead of entering PALcode
    #[serde(default = "TrapConfig::default_halt_on_call_pal_halt")]
    pub halt_on_call_pal_halt: bool,
}

impl TrapConfig {
    /// Returns the default PAL base.
    const fn default_pal_base() -> u64 {
        defaults::PAL_BASE
    }

    /// CALL_PAL HALT stops the engine unless PALcode is supplied.
    const fn default_halt_on_call_pal_halt() -> bool {
        true
    }

    /// Handler address for `vector` at reset, honoring overrides.
    pub fn handler(&self, vector: TrapVector) -> u64 {
        self.vectors
            .get(&vector)
            .copied()
            .unwrap_or_else(|| self.pal_base.wrapping_add(vector.default_offset()))
    }
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self {
            pal_base: defaults::PAL_BASE,
            vectors: BTreeMap::new(),
            halt_on_call_pal_halt: true,
        }
    }
}

/// Out-of-order core configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Instructions fetched per cycle
    pub fetch_width: usize,
    /// Instructions renamed per cycle
    pub dispatch_width: usize,
    /// Instructions retired per cycle
    pub retire_width: usize,
    /// Depth of the fetch queue
    pub fetch_queue_size: usize,
    /// Reorder buffer entries
    pub rob_size: usize,
    /// Integer physical registers
    pub int_phys_regs: usize,
    /// Floating-point physical registers
    pub fp_phys_regs: usize,
    /// Outstanding branch checkpoints
    pub max_checkpoints: usize,
    /// Store buffer entries
    pub store_buffer_size: usize,
    /// Per-cycle issue limits
    pub issue: IssueConfig,
    /// Functional unit latencies
    pub latency: LatencyConfig,
    /// Branch predictor type
    pub branch_predictor: BranchPredictor,
    /// Branch Target Buffer size
    pub btb_size: usize,
    /// Return Address Stack size
    pub ras_size: usize,
    /// GShare pattern table size (log2)
    pub gshare_bits: usize,
    /// Tournament predictor configuration
    pub tournament: TournamentConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_width: defaults::FETCH_WIDTH,
            dispatch_width: defaults::DISPATCH_WIDTH,
            retire_width: defaults::RETIRE_WIDTH,
            fetch_queue_size: defaults::FETCH_QUEUE_SIZE,
            rob_size: defaults::ROB_SIZE,
            int_phys_regs: defaults::INT_PHYS_REGS,
            fp_phys_regs: defaults::FP_PHYS_REGS,
            max_checkpoints: defaults::MAX_CHECKPOINTS,
            store_buffer_size: defaults::STORE_BUFFER_SIZE,
            issue: IssueConfig::default(),
            latency: LatencyConfig::default(),
            branch_predictor: BranchPredictor::default(),
            btb_size: defaults::BTB_SIZE,
            ras_size: defaults::RAS_SIZE,
            gshare_bits: defaults::GSHARE_BITS,
            tournament: TournamentConfig::default(),
        }
    }
}

/// Instructions each functional unit class may start per cycle.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct IssueConfig {
    /// Ebox issue slots
    pub int_units: usize,
    /// Fbox issue slots
    pub fp_units: usize,
    /// Mbox issue slots
    pub mem_units: usize,
}

impl Default for IssueConfig {
    fn default() -> Self {
        Self {
            int_units: defaults::INT_UNITS,
            fp_units: defaults::FP_UNITS,
            mem_units: defaults::MEM_UNITS,
        }
    }
}

/// Execution latencies in cycles.
///
/// Timing is not bit-exact; latencies only order completion so that
/// independent instructions finish out of program order.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Simple integer operates, branches and system instructions
    pub int: u64,
    /// Integer multiply
    pub imul: u64,
    /// FP add, multiply, compare, convert and copy
    pub fp: u64,
    /// S-format divide
    pub fdiv_s: u64,
    /// T-format divide
    pub fdiv_t: u64,
    /// S-format square root
    pub fsqrt_s: u64,
    /// T-format square root
    pub fsqrt_t: u64,
    /// Loads and stores
    pub load: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            int: defaults::LAT_INT,
            imul: defaults::LAT_IMUL,
            fp: defaults::LAT_FP,
            fdiv_s: defaults::LAT_FDIV_S,
            fdiv_t: defaults::LAT_FDIV_T,
            fsqrt_s: defaults::LAT_FSQRT_S,
            fsqrt_t: defaults::LAT_FSQRT_T,
            load: defaults::LAT_LOAD,
        }
    }
}

/// Tournament predictor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TournamentConfig {
    /// Global history table size (log2)
    #[serde(default = "TournamentConfig::default_global_bits")]
    pub global_size_bits: usize,
    /// Local history table size (log2)
    #[serde(default = "TournamentConfig::default_local_hist_bits")]
    pub local_hist_bits: usize,
    /// Local prediction table size (log2)
    #[serde(default = "TournamentConfig::default_local_pred_bits")]
    pub local_pred_bits: usize,
}

impl TournamentConfig {
    /// Returns the default global table size bits.
    const fn default_global_bits() -> usize {
        defaults::TOURNAMENT_GLOBAL_BITS
    }
    /// Returns the default local history table size bits.
    const fn default_local_hist_bits() -> usize {
        defaults::TOURNAMENT_LOCAL_HIST_BITS
    }
    /// Returns the default local prediction table size bits.
    const fn default_local_pred_bits() -> usize {
        defaults::TOURNAMENT_LOCAL_PRED_BITS
    }
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            global_size_bits: defaults::TOURNAMENT_GLOBAL_BITS,
            local_hist_bits: defaults::TOURNAMENT_LOCAL_HIST_BITS,
            local_pred_bits: defaults::TOURNAMENT_LOCAL_PRED_BITS,
        }
    }
}
