//! Pipeline tests.

/// Store-to-load forwarding and load ordering.
pub mod forwarding;

/// Register renaming against a sequential reference.
pub mod rename;

/// Speculation transparency across predictors.
pub mod speculation;
