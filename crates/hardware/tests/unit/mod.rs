//! # Unit Components
//!
//! This module serves as the central hub for the engine's unit and scenario
//! tests, organized like the crate itself.

/// Configuration loading and validation.
pub mod config;

/// Processor core: pipeline structures and functional units.
pub mod core;

/// Instruction decoding.
pub mod isa;

/// Whole-program scenarios driven through the simulator API.
pub mod sim;

/// Statistics reporting.
pub mod stats;
