//! Host-facing simulation API.
//!
//! The [`Simulator`] wraps the execution engine with configuration
//! validation, quiescent state access and poisoning after internal errors.

/// The simulator handle and run results.
pub mod simulator;

pub use simulator::{RunOutcome, Simulator, StopReason};
