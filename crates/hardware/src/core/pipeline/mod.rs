//! Out-of-order instruction pipeline.
//!
//! This module contains the execution engine and the structures it keeps
//! in flight:
//! 1. **Engine:** Owns all pipeline state and advances it one cycle at a time.
//! 2. **Rename:** Physical register pools, speculative maps and branch checkpoints.
//! 3. **ROB:** Program-ordered arena of in-flight instructions.
//! 4. **Signals:** Decoded operation descriptors.
//! 5. **Stages:** Fetch, Dispatch, Issue, Writeback and Commit.
//! 6. **Store Buffer:** Speculative stores held until retirement.

/// The execution engine and its cycle loop.
pub mod engine;

/// Register renaming and checkpoint recovery.
pub mod rename;

/// Reorder buffer.
pub mod rob;

/// Operation descriptors produced by decode.
pub mod signals;

/// Pipeline stage implementations.
pub mod stages;

/// Program-ordered buffer of uncommitted stores.
pub mod store_buffer;
