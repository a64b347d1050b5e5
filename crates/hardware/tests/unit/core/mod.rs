//! Core component tests.

/// Out-of-order pipeline behaviour.
pub mod pipeline;

/// Functional unit tests.
pub mod units;
