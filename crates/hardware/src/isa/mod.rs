//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the Alpha AXP opcode and function-code tables and the decoder
//! for the subset of the architecture implemented by the 21264 engine.
//!
//! # Groups
//!
//! * `opcodes`: Primary opcodes (bits 31:26).
//! * `functions`: Function codes of the operate and miscellaneous groups.
//! * `pal`: CALL_PAL function codes and PALcode entry offsets.

/// Instruction decoding for every implemented Alpha format.
pub mod decode;

/// Instruction field extraction and the decoded descriptor.
pub mod instruction;

/// Function codes grouped by primary opcode.
pub mod functions;

/// Primary opcode constants.
pub mod opcodes;

/// CALL_PAL functions and PAL entry layout.
pub mod pal;
