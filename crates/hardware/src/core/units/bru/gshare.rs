//! GShare Branch Predictor.
//!
//! GShare correlates global branch history with the program counter using an XOR
//! hash. This allows the predictor to distinguish the same branch instruction
//! in different execution contexts.
//!
//! # Performance
//!
//! - **Time Complexity:** `predict()` and `update()` are O(1)
//! - **Space Complexity:** O(2^N) two-bit counters for an N-bit index
//! - **Best Case:** Correlated branches where outcome depends on recent history
//! - **Worst Case:** Uncorrelated branches or history length too short/long for pattern

use super::BranchPredictor;
use super::branch_predictor::{counter_taken, train_counter};

/// GShare Predictor structure.
#[derive(Clone, Debug)]
pub struct GSharePredictor {
    /// Global History Register storing recent retired branch outcomes.
    ghr: u64,
    /// Pattern History Table containing 2-bit saturating counters.
    pht: Vec<u8>,
    /// Index mask (table size minus one).
    mask: u64,
}

impl GSharePredictor {
    /// Creates a new GShare Predictor with `2^bits` counters.
    pub fn new(bits: usize) -> Self {
        let size = 1usize << bits;
        Self {
            ghr: 0,
            pht: vec![1; size],
            mask: (size - 1) as u64,
        }
    }

    /// Computes the XOR of the instruction index and the global history.
    const fn index(&self, pc: u64) -> usize {
        (((pc >> 2) ^ self.ghr) & self.mask) as usize
    }
}

impl BranchPredictor for GSharePredictor {
    /// Predicts taken if the 2-bit counter at the hashed index is 2 or 3.
    fn predict_branch(&self, pc: u64, _target: u64) -> bool {
        counter_taken(self.pht[self.index(pc)])
    }

    /// Updates the counter, then shifts the outcome into the history.
    fn update_branch(&mut self, pc: u64, taken: bool) {
        let idx = self.index(pc);
        train_counter(&mut self.pht[idx], taken);
        self.ghr = ((self.ghr << 1) | u64::from(taken)) & self.mask;
    }
}
