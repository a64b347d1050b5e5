//! Shared test infrastructure.

/// Alpha instruction encoders.
pub mod builder;

/// Simulator test context.
pub mod harness;

/// Mock devices.
pub mod mocks;
