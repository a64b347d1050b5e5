//! Processor core.
//!
//! This module contains the architectural model of the 21264, the
//! out-of-order pipeline that executes it, and the functional units the
//! pipeline issues to.

/// Architectural state: processor status, FPCR, IPRs, modes and trap delivery.
pub mod arch;

/// Out-of-order pipeline (rename, ROB, store buffer, stages).
pub mod pipeline;

/// Functional units (integer, floating point, branch, load/store).
pub mod units;

pub use self::pipeline::engine::Engine;
