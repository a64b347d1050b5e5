//! Branch direction predictor interface.
//!
//! Alpha conditional branches carry their displacement in the instruction,
//! so fetch knows the target as soon as it decodes the word; predictors only
//! choose a direction. Targets of computed jumps come from the BTB and the
//! return address stack, owned by [`BranchUnit`](super::BranchUnit).

/// Trait for branch direction prediction algorithms.
pub trait BranchPredictor {
    /// Predicts whether a conditional branch will be taken.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter of the branch instruction
    /// * `target` - Address the branch goes to when taken
    fn predict_branch(&self, pc: u64, target: u64) -> bool;

    /// Trains the predictor with a retired branch's outcome.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter of the branch instruction
    /// * `taken` - Whether the branch was actually taken
    fn update_branch(&mut self, pc: u64, taken: bool);
}

/// Increments or decrements a 2-bit saturating counter.
#[inline]
pub(crate) const fn train_counter(counter: &mut u8, taken: bool) {
    train_saturating(counter, taken, 3);
}

/// Increments or decrements a counter saturating at `0` and `max`.
#[inline]
pub(crate) const fn train_saturating(counter: &mut u8, taken: bool, max: u8) {
    if taken {
        if *counter < max {
            *counter += 1;
        }
    } else if *counter > 0 {
        *counter -= 1;
    }
}

/// True if a 2-bit counter predicts taken.
#[inline]
pub(crate) const fn counter_taken(counter: u8) -> bool {
    counter >= 2
}
