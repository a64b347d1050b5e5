//! Alpha AXP 21264 instruction-execution engine.
//!
//! This crate emulates the out-of-order core of the DEC Alpha 21264 with the following:
//! 1. **ISA:** Decoding of the Alpha instruction set (integer, IEEE floating point, BWX, CIX, MVI, PALcode).
//! 2. **Core:** Register renaming, a reorder buffer, per-unit issue, store-to-load forwarding and branch prediction.
//! 3. **Architecture:** Precise traps delivered to PALcode, FPCR, internal processor registers and the lock flag.
//! 4. **SoC:** A flat memory image with protection regions and host-mapped MMIO devices.
//! 5. **Simulation:** The host API, configuration and statistics collection.
//!
//! # Example
//!
//! ```
//! use axp_core::{Config, Simulator, StopReason};
//!
//! let config = Config::default();
//! let mut sim = Simulator::new(&config)?;
//! // LDA R1, 7(R31); ADDQ R1, R1, R2
//! sim.load_program(config.general.start_pc, &[0x203F_0007, 0x4021_0402])?;
//! let outcome = sim.run(2)?;
//! assert_eq!(outcome.stop, StopReason::Completed);
//! assert_eq!(sim.read_architectural_state().int(2), 14);
//! # Ok::<(), axp_core::SimError>(())
//! ```

/// Common types and constants (registers, traps, errors).
pub mod common;
/// Engine configuration (defaults, validation, JSON loading).
pub mod config;
/// Processor core (architectural state, pipeline, functional units).
pub mod core;
/// Instruction set (encodings, decode, PALcode functions).
pub mod isa;
/// Host-facing simulator API.
pub mod sim;
/// Memory image, protection and MMIO devices.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Errors returned to the host.
pub use crate::common::error::SimError;
/// The execution engine; most hosts use [`Simulator`] instead.
pub use crate::core::Engine;
/// Host-facing simulator handle and run results.
pub use crate::sim::{RunOutcome, Simulator, StopReason};
/// Device trait for memory-mapped I/O.
pub use crate::soc::MmioDevice;
