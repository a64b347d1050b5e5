//! Tournament Branch Predictor.
//!
//! The 21264 predictor: a choice table selects between a global predictor
//! indexed by path history and a two-level local predictor indexed by the
//! branch's own history. Local counters are 3 bits wide and global and
//! choice counters 2 bits, as in the 21264.

use super::BranchPredictor;
use super::branch_predictor::{counter_taken, train_counter, train_saturating};
use crate::config::TournamentConfig;

/// Saturation value of a 3-bit local counter.
const LOCAL_COUNTER_MAX: u8 = 7;

/// True if a 3-bit local counter predicts taken.
const fn local_taken(counter: u8) -> bool {
    counter > LOCAL_COUNTER_MAX / 2
}

/// Tournament Predictor structure.
#[derive(Clone, Debug)]
pub struct TournamentPredictor {
    /// Global History Register.
    ghr: u64,

    /// Global Pattern History Table (2-bit counters).
    global_pht: Vec<u8>,
    /// Mask for indexing the global PHT.
    global_mask: usize,

    /// Local History Table storing history patterns per branch.
    local_history_table: Vec<u16>,
    /// Mask for indexing the Local History Table.
    local_hist_mask: usize,

    /// Local Pattern History Table (3-bit counters) indexed by local history.
    local_pht: Vec<u8>,
    /// Mask for indexing the Local PHT.
    local_pred_mask: usize,

    /// Choice Prediction Table (2-bit counters).
    /// Selects between Local (0,1) and Global (2,3) predictors.
    choice_pht: Vec<u8>,
}

impl TournamentPredictor {
    /// Creates a new Tournament Predictor based on the provided configuration.
    pub fn new(config: &TournamentConfig) -> Self {
        let global_size = 1 << config.global_size_bits;
        let local_hist_size = 1 << config.local_hist_bits;
        let local_pred_size = 1 << config.local_pred_bits;

        Self {
            ghr: 0,

            global_pht: vec![1; global_size],
            global_mask: global_size - 1,

            local_history_table: vec![0; local_hist_size],
            local_hist_mask: local_hist_size - 1,

            local_pht: vec![LOCAL_COUNTER_MAX / 2; local_pred_size],
            local_pred_mask: local_pred_size - 1,

            choice_pht: vec![1; global_size],
        }
    }

    const fn global_index(&self) -> usize {
        (self.ghr as usize) & self.global_mask
    }

    const fn local_history_index(&self, pc: u64) -> usize {
        ((pc >> 2) as usize) & self.local_hist_mask
    }

    /// Retrieves the prediction from the Local component.
    fn local_prediction(&self, pc: u64) -> (usize, bool) {
        let pattern = self.local_history_table[self.local_history_index(pc)];
        let pred_idx = (pattern as usize) & self.local_pred_mask;
        (pred_idx, local_taken(self.local_pht[pred_idx]))
    }
}

impl BranchPredictor for TournamentPredictor {
    /// Queries both components and lets the choice table decide.
    fn predict_branch(&self, pc: u64, _target: u64) -> bool {
        let g_idx = self.global_index();
        let (_, local) = self.local_prediction(pc);
        if counter_taken(self.choice_pht[g_idx]) {
            counter_taken(self.global_pht[g_idx])
        } else {
            local
        }
    }

    /// Trains the choice table toward whichever component was right, then
    /// both components and their histories.
    fn update_branch(&mut self, pc: u64, taken: bool) {
        let g_idx = self.global_index();
        let global_correct = counter_taken(self.global_pht[g_idx]) == taken;
        let (pred_idx, local_pred) = self.local_prediction(pc);
        let local_correct = local_pred == taken;

        if global_correct != local_correct {
            train_counter(&mut self.choice_pht[g_idx], global_correct);
        }

        train_counter(&mut self.global_pht[g_idx], taken);
        self.ghr = ((self.ghr << 1) | u64::from(taken)) & (self.global_mask as u64);

        train_saturating(&mut self.local_pht[pred_idx], taken, LOCAL_COUNTER_MAX);
        let lh_idx = self.local_history_index(pc);
        let pattern = self.local_history_table[lh_idx];
        self.local_history_table[lh_idx] =
            ((pattern << 1) | u16::from(taken)) & (self.local_pred_mask as u16);
    }
}
