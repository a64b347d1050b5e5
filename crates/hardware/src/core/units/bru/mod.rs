//! Branch unit (BRU): prediction and resolution.
//!
//! This module contains the branch direction predictors selectable by
//! configuration (static BTFN, always-taken, GShare and the 21264
//! tournament predictor), the branch target buffer and return address
//! stack used for computed jumps, and branch evaluation.

pub use self::branch_predictor::BranchPredictor;
pub use self::resolve::{BranchResolution, resolve};

/// Branch predictor trait and counter helpers.
pub mod branch_predictor;

/// Branch Target Buffer for computed jump targets.
pub mod btb;

/// Global history branch predictor (gshare algorithm).
pub mod gshare;

/// Return Address Stack for predicting return addresses.
pub mod ras;

/// Branch outcome evaluation.
pub mod resolve;

/// Static predictors (backward-taken/forward-not-taken, always-taken).
pub mod static_bp;

/// Tournament branch predictor (combines local and global predictors).
pub mod tournament;

use self::{
    btb::Btb,
    gshare::GSharePredictor,
    ras::Ras,
    static_bp::{AlwaysTakenPredictor, StaticPredictor},
    tournament::TournamentPredictor,
};
use crate::common::constants::INSTRUCTION_BYTES;
use crate::config::{BranchPredictor as BpType, PipelineConfig};
use crate::core::pipeline::signals::{BranchOp, JumpKind};

/// Enum wrapper for static dispatch of Branch Predictors.
/// This avoids vtable lookups in the critical fetch loop.
#[derive(Clone, Debug)]
pub enum BranchPredictorWrapper {
    /// Backward taken, forward not taken.
    Static(StaticPredictor),
    /// Always taken.
    AlwaysTaken(AlwaysTakenPredictor),
    /// GShare.
    GShare(GSharePredictor),
    /// 21264 tournament.
    Tournament(TournamentPredictor),
}

impl BranchPredictorWrapper {
    /// Creates the predictor selected by configuration.
    pub fn new(config: &PipelineConfig) -> Self {
        match config.branch_predictor {
            BpType::Static => Self::Static(StaticPredictor),
            BpType::AlwaysTaken => Self::AlwaysTaken(AlwaysTakenPredictor),
            BpType::GShare => Self::GShare(GSharePredictor::new(config.gshare_bits)),
            BpType::Tournament => Self::Tournament(TournamentPredictor::new(&config.tournament)),
        }
    }
}

impl BranchPredictor for BranchPredictorWrapper {
    #[inline(always)]
    fn predict_branch(&self, pc: u64, target: u64) -> bool {
        match self {
            Self::Static(bp) => bp.predict_branch(pc, target),
            Self::AlwaysTaken(bp) => bp.predict_branch(pc, target),
            Self::GShare(bp) => bp.predict_branch(pc, target),
            Self::Tournament(bp) => bp.predict_branch(pc, target),
        }
    }

    #[inline(always)]
    fn update_branch(&mut self, pc: u64, taken: bool) {
        match self {
            Self::Static(bp) => bp.update_branch(pc, taken),
            Self::AlwaysTaken(bp) => bp.update_branch(pc, taken),
            Self::GShare(bp) => bp.update_branch(pc, taken),
            Self::Tournament(bp) => bp.update_branch(pc, taken),
        }
    }
}

/// A fetch-time prediction for one control-flow instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prediction {
    /// Predicted direction.
    pub taken: bool,
    /// PC fetch continued at.
    pub next_pc: u64,
}

/// Front-end branch unit: direction predictor plus BTB and RAS.
#[derive(Clone, Debug)]
pub struct BranchUnit {
    predictor: BranchPredictorWrapper,
    btb: Btb,
    ras: Ras,
}

impl BranchUnit {
    /// Builds the branch unit described by `config`.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            predictor: BranchPredictorWrapper::new(config),
            btb: Btb::new(config.btb_size),
            ras: Ras::new(config.ras_size),
        }
    }

    /// Predicts the successor of the control-flow instruction at `pc`.
    ///
    /// Updates the return address stack speculatively: calls push the
    /// updated PC and returns pop it.
    pub fn predict(&mut self, op: BranchOp, pc: u64, disp: i64, hint: u64) -> Prediction {
        let updated = pc.wrapping_add(INSTRUCTION_BYTES);
        let target = updated.wrapping_add(disp as u64);
        match op {
            BranchOp::Br => Prediction {
                taken: true,
                next_pc: target,
            },
            BranchOp::Bsr => {
                self.ras.push(updated);
                Prediction {
                    taken: true,
                    next_pc: target,
                }
            }
            BranchOp::Int(_) | BranchOp::Fp(_) => {
                let taken = self.predictor.predict_branch(pc, target);
                Prediction {
                    taken,
                    next_pc: if taken { target } else { updated },
                }
            }
            BranchOp::Jump(kind) => {
                let hinted = (updated & !0xFFFF) | (hint << 2);
                let next_pc = match kind {
                    JumpKind::Ret => self.ras.pop(),
                    JumpKind::JsrCoroutine => {
                        let popped = self.ras.pop();
                        self.ras.push(updated);
                        popped
                    }
                    JumpKind::Jsr => {
                        self.ras.push(updated);
                        self.btb.lookup(pc)
                    }
                    JumpKind::Jmp => self.btb.lookup(pc),
                }
                .unwrap_or(hinted);
                Prediction {
                    taken: true,
                    next_pc,
                }
            }
        }
    }

    /// Trains the predictor with a retired branch's actual outcome.
    pub fn train(&mut self, op: BranchOp, pc: u64, resolution: &BranchResolution) {
        match op {
            BranchOp::Int(_) | BranchOp::Fp(_) => {
                self.predictor.update_branch(pc, resolution.taken);
            }
            BranchOp::Jump(JumpKind::Jmp | JumpKind::Jsr) => {
                self.btb.update(pc, resolution.next_pc);
            }
            BranchOp::Jump(_) | BranchOp::Br | BranchOp::Bsr => {}
        }
    }
}
