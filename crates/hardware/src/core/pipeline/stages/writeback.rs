//! Writeback Stage: result publication and branch recovery.
//!
//! Entries whose execution latency has elapsed publish their result to the
//! physical register file and become `Completed`. A control transfer whose
//! resolved successor differs from its prediction squashes everything
//! younger and redirects fetch. Only the oldest misprediction of a cycle is
//! recovered; younger ones were squashed along with it.

use tracing::trace;

use crate::common::error::SimError;
use crate::core::pipeline::engine::Engine;
use crate::core::pipeline::rob::EntryState;

/// Executes the writeback stage.
///
/// # Errors
///
/// `SimError::Invariant` if branch recovery finds inconsistent rename state.
pub fn writeback_stage(engine: &mut Engine) -> Result<(), SimError> {
    let cycle = engine.cycle;
    for seq in engine.rob.seqs() {
        let Some(entry) = engine.rob.get_mut(seq) else {
            break;
        };
        let EntryState::Executing { ready_at } = entry.state else {
            continue;
        };
        if ready_at > cycle {
            continue;
        }

        entry.state = EntryState::Completed;
        let value = entry.completion.value;
        let dest = entry.dest;
        let mispredicted = entry.mispredicted();
        let next_pc = entry.next_pc();

        if let Some(dest) = dest {
            engine.renamer.write(dest.phys, value);
        }
        trace!(seq, value = format_args!("{value:#x}"), "writeback");

        if mispredicted {
            engine.stats.branch_mispredictions += 1;
            engine.recover_branch(seq, next_pc)?;
            break;
        }
    }
    Ok(())
}
