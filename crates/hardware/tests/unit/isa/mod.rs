//! ISA tests.

/// Decoder properties and encodings.
pub mod decode;
