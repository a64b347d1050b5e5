//! Static branch predictors.
//!
//! - [`StaticPredictor`]: backward taken, forward not taken. Alpha compilers
//!   lay out loops so that this rule holds for the loop-closing branch.
//! - [`AlwaysTakenPredictor`]: every conditional branch predicted taken.
//!
//! Neither keeps any state, so training is a no-op.

use super::BranchPredictor;

/// Backward-taken / forward-not-taken predictor.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticPredictor;

impl BranchPredictor for StaticPredictor {
    fn predict_branch(&self, pc: u64, target: u64) -> bool {
        target <= pc
    }

    fn update_branch(&mut self, _pc: u64, _taken: bool) {}
}

/// Predicts every conditional branch taken.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysTakenPredictor;

impl BranchPredictor for AlwaysTakenPredictor {
    fn predict_branch(&self, _pc: u64, _target: u64) -> bool {
        true
    }

    fn update_branch(&mut self, _pc: u64, _taken: bool) {}
}
