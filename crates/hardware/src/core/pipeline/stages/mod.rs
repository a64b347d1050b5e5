//! Pipeline stage implementations.
//!
//! Each stage is a free function over the [`Engine`](super::engine::Engine)
//! and runs once per cycle, in this order:
//! 1. **Commit:** Retires the ROB head in program order and delivers traps.
//! 2. **Writeback:** Publishes results and recovers from mispredictions.
//! 3. **Issue:** Executes ready instructions out of order.
//! 4. **Dispatch:** Renames and allocates ROB and store buffer entries.
//! 5. **Fetch:** Reads and decodes instructions along the predicted path.

/// In-order retirement and trap delivery.
pub mod commit;

/// Renaming and resource allocation.
pub mod dispatch;

/// Instruction fetch and decode.
pub mod fetch;

/// Out-of-order selection and execution.
pub mod issue;

/// Result publication and branch recovery.
pub mod writeback;

/// Commit stage entry point.
pub use commit::commit_stage;
/// Dispatch stage entry point.
pub use dispatch::dispatch_stage;
/// Fetch stage entry point.
pub use fetch::fetch_stage;
/// Issue stage entry point.
pub use issue::issue_stage;
/// Writeback stage entry point.
pub use writeback::writeback_stage;
