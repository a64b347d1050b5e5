//! Execution statistics collection and reporting.
//!
//! This module tracks performance metrics for the execution engine. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived IPC.
//! 2. **Instruction mix:** Retired counts by operation class.
//! 3. **Speculation:** Branch lookups, mispredictions, squashed instructions and forwarded loads.
//! 4. **Stalls:** Dispatch backpressure by cause.
//! 5. **Traps:** Faults, PAL calls and interrupts delivered.

use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::core::pipeline::signals::Operation;

/// Engine statistics, updated every cycle and at retirement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Cycles elapsed.
    pub cycles: u64,
    /// Instructions retired.
    pub instructions_retired: u64,

    /// Retired integer operates.
    pub inst_int: u64,
    /// Retired floating operates.
    pub inst_fp: u64,
    /// Retired loads.
    pub inst_load: u64,
    /// Retired stores.
    pub inst_store: u64,
    /// Retired branches and jumps.
    pub inst_branch: u64,
    /// Retired system and PAL operations.
    pub inst_system: u64,
    /// Retired no-ops.
    pub inst_nop: u64,

    /// Conditional branches and jumps retired.
    pub branch_lookups: u64,
    /// Control transfers whose prediction was wrong.
    pub branch_mispredictions: u64,
    /// Instructions discarded by mispredictions and traps.
    pub instructions_squashed: u64,
    /// Loads satisfied from the store buffer.
    pub loads_forwarded: u64,
    /// Load executions deferred behind an older store.
    pub load_retries: u64,

    /// Dispatch stalls on a full reorder buffer.
    pub stalls_rob: u64,
    /// Dispatch stalls on an empty physical register pool.
    pub stalls_rename: u64,
    /// Dispatch stalls on a full checkpoint table.
    pub stalls_checkpoint: u64,
    /// Dispatch stalls on a full store buffer.
    pub stalls_store_buffer: u64,

    /// Faults delivered (illegal instruction, arithmetic, memory).
    pub faults: u64,
    /// CALL_PAL entries.
    pub pal_calls: u64,
    /// External interrupts taken.
    pub interrupts: u64,
}

/// Section names for selective report output.
///
/// Pass an empty slice to [`SimStats::render_sections`] to render all of them.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "speculation", "stalls", "traps"];

impl SimStats {
    /// Counts a retired instruction by operation class.
    pub fn record_retire(&mut self, op: Operation) {
        self.instructions_retired += 1;
        let counter = match op {
            Operation::Int(_) => &mut self.inst_int,
            Operation::Float(_) => &mut self.inst_fp,
            Operation::Load(_) => &mut self.inst_load,
            Operation::Store(_) => &mut self.inst_store,
            Operation::Branch(_) => {
                self.branch_lookups += 1;
                &mut self.inst_branch
            }
            Operation::System(_) => &mut self.inst_system,
            Operation::Nop => &mut self.inst_nop,
        };
        *counter += 1;
    }

    /// Retired instructions per cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Fraction of retired control transfers that were predicted correctly.
    pub fn branch_accuracy(&self) -> f64 {
        if self.branch_lookups == 0 {
            return 0.0;
        }
        let correct = self.branch_lookups.saturating_sub(self.branch_mispredictions);
        correct as f64 / self.branch_lookups as f64
    }

    /// Serializes the counters as a JSON object.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Renders only the requested report sections.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`];
    /// an empty slice renders every section.
    pub fn render_sections(&self, sections: &[&str]) -> String {
        let want = |s: &str| sections.is_empty() || sections.contains(&s);
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64| (n as f64 / instr) * 100.0;
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(out, "==========================================================");
        let _ = writeln!(out, "ALPHA 21264 EXECUTION STATISTICS");
        let _ = writeln!(out, "==========================================================");
        if want("summary") {
            let _ = writeln!(out, "sim_cycles               {}", self.cycles);
            let _ = writeln!(out, "sim_insts                {}", self.instructions_retired);
            let _ = writeln!(out, "sim_ipc                  {:.4}", self.ipc());
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("instruction_mix") {
            let _ = writeln!(out, "INSTRUCTION MIX");
            for (name, count) in [
                ("op.int", self.inst_int),
                ("op.fp", self.inst_fp),
                ("op.load", self.inst_load),
                ("op.store", self.inst_store),
                ("op.branch", self.inst_branch),
                ("op.system", self.inst_system),
                ("op.nop", self.inst_nop),
            ] {
                let _ = writeln!(out, "  {name:<22} {count} ({:.2}%)", pct(count));
            }
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("speculation") {
            let _ = writeln!(out, "SPECULATION");
            let _ = writeln!(out, "  bp.lookups             {}", self.branch_lookups);
            let _ = writeln!(out, "  bp.mispredicts         {}", self.branch_mispredictions);
            let _ = writeln!(out, "  bp.accuracy            {:.2}%", self.branch_accuracy() * 100.0);
            let _ = writeln!(out, "  squashed               {}", self.instructions_squashed);
            let _ = writeln!(out, "  loads.forwarded        {}", self.loads_forwarded);
            let _ = writeln!(out, "  loads.retried          {}", self.load_retries);
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("stalls") {
            let _ = writeln!(out, "DISPATCH STALLS");
            let _ = writeln!(out, "  stalls.rob             {}", self.stalls_rob);
            let _ = writeln!(out, "  stalls.rename          {}", self.stalls_rename);
            let _ = writeln!(out, "  stalls.checkpoint      {}", self.stalls_checkpoint);
            let _ = writeln!(out, "  stalls.store_buffer    {}", self.stalls_store_buffer);
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("traps") {
            let _ = writeln!(out, "TRAPS");
            let _ = writeln!(out, "  traps.faults           {}", self.faults);
            let _ = writeln!(out, "  traps.call_pal         {}", self.pal_calls);
            let _ = writeln!(out, "  traps.interrupts       {}", self.interrupts);
        }
        let _ = writeln!(out, "==========================================================");
        out
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_sections(&[]))
    }
}
