//! Register renaming: physical register files, map tables and checkpoints.
//!
//! Each register class has a unified physical file. Architectural register
//! `i` starts out mapped to physical register `i`; physical register 31 is
//! the zero slot backing R31/F31 and is never allocated or freed. All other
//! physical registers start on the free list.
//!
//! Two map tables are kept per class:
//! - the **speculative** map, updated at dispatch and read by younger sources;
//! - the **committed** map, updated at retirement.
//!
//! A branch saves the speculative maps in a checkpoint when it is renamed.
//! A mispredict restores that checkpoint and discards every younger one; a
//! trap drops them all and rebuilds the free list from the committed map.
//! Source operands are read before the instruction's own destination is
//! renamed, so `ADDQ R1, R1, R1` reads the previous producer of R1.

use std::collections::VecDeque;

use thiserror::Error;

use crate::common::constants::{ARCH_REGS, ZERO_REG};
use crate::common::reg::{ArchReg, RegClass};

/// Physical register holding the architectural zero register.
const ZERO_SLOT: u16 = ZERO_REG as u16;

/// A physical register of one class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PhysReg {
    /// Register file the register belongs to.
    pub class: RegClass,
    /// Index into that file.
    pub index: u16,
}

impl PhysReg {
    const fn new(class: RegClass, index: u16) -> Self {
        Self { class, index }
    }
}

/// A renamed source operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// The value is known.
    Ready(u64),
    /// The value will be written by the in-flight producer of this register.
    Pending(PhysReg),
}

/// Renaming failures.
///
/// `ResourceExhausted` and `CheckpointsFull` are ordinary stalls. The
/// remaining variants mean the bookkeeping is corrupt.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenameError {
    /// No free physical register of the class.
    #[error("no free {0:?} physical register")]
    ResourceExhausted(RegClass),

    /// Every checkpoint slot is in use.
    #[error("branch checkpoint table is full")]
    CheckpointsFull,

    /// A register on the free list was already in use.
    #[error("physical register {0:?} allocated while in use")]
    DoubleAllocation(PhysReg),

    /// A register was freed that was not in use.
    #[error("physical register {0:?} freed while not in use")]
    FreeOfUnused(PhysReg),

    /// Rollback named a branch that holds no checkpoint.
    #[error("no checkpoint for instruction {0}")]
    MissingCheckpoint(u64),
}

type MapTable = [u16; ARCH_REGS];

const fn identity_map() -> MapTable {
    let mut map = [0u16; ARCH_REGS];
    let mut i = 0;
    while i < ARCH_REGS {
        map[i] = i as u16;
        i += 1;
    }
    map
}

/// One class's physical file, free list and map tables.
#[derive(Clone, Debug)]
struct Bank {
    class: RegClass,
    values: Vec<u64>,
    ready: Vec<bool>,
    in_use: Vec<bool>,
    free: VecDeque<u16>,
    speculative: MapTable,
    committed: MapTable,
}

impl Bank {
    fn new(class: RegClass, size: usize) -> Self {
        let mut in_use = vec![false; size];
        in_use[..ARCH_REGS].fill(true);
        Self {
            class,
            values: vec![0; size],
            ready: vec![true; size],
            in_use,
            free: (ARCH_REGS as u16..size as u16).collect(),
            speculative: identity_map(),
            committed: identity_map(),
        }
    }

    const fn phys(&self, index: u16) -> PhysReg {
        PhysReg::new(self.class, index)
    }

    fn source(&self, arch: u8) -> Source {
        let index = self.speculative[arch as usize];
        if self.ready[index as usize] {
            Source::Ready(self.values[index as usize])
        } else {
            Source::Pending(self.phys(index))
        }
    }

    fn allocate(&mut self, arch: u8) -> Result<(u16, u16), RenameError> {
        let index = self
            .free
            .pop_front()
            .ok_or(RenameError::ResourceExhausted(self.class))?;
        if self.in_use[index as usize] {
            return Err(RenameError::DoubleAllocation(self.phys(index)));
        }
        self.in_use[index as usize] = true;
        self.ready[index as usize] = false;
        let prev = std::mem::replace(&mut self.speculative[arch as usize], index);
        Ok((index, prev))
    }

    fn free(&mut self, index: u16) -> Result<(), RenameError> {
        if index == ZERO_SLOT || !self.in_use[index as usize] {
            return Err(RenameError::FreeOfUnused(self.phys(index)));
        }
        self.in_use[index as usize] = false;
        self.ready[index as usize] = true;
        self.free.push_back(index);
        Ok(())
    }

    fn reset_to_committed(&mut self) {
        self.speculative = self.committed;
        self.in_use.fill(false);
        for &index in &self.committed {
            self.in_use[index as usize] = true;
            self.ready[index as usize] = true;
        }
        self.free = (0..self.values.len() as u16)
            .filter(|&i| !self.in_use[i as usize])
            .collect();
    }
}

/// Saved speculative maps of one branch.
#[derive(Clone, Debug)]
struct Checkpoint {
    seq: u64,
    int_map: MapTable,
    fp_map: MapTable,
}

/// Register renamer for both register classes.
#[derive(Clone, Debug)]
pub struct Renamer {
    int: Bank,
    fp: Bank,
    checkpoints: VecDeque<Checkpoint>,
    max_checkpoints: usize,
}

impl Renamer {
    /// Creates a renamer with the given physical file sizes.
    ///
    /// Sizes must exceed the architectural file; configuration validation
    /// guarantees this.
    pub fn new(int_phys_regs: usize, fp_phys_regs: usize, max_checkpoints: usize) -> Self {
        Self {
            int: Bank::new(RegClass::Int, int_phys_regs),
            fp: Bank::new(RegClass::Fp, fp_phys_regs),
            checkpoints: VecDeque::with_capacity(max_checkpoints),
            max_checkpoints,
        }
    }

    const fn bank(&self, class: RegClass) -> &Bank {
        match class {
            RegClass::Int => &self.int,
            RegClass::Fp => &self.fp,
        }
    }

    const fn bank_mut(&mut self, class: RegClass) -> &mut Bank {
        match class {
            RegClass::Int => &mut self.int,
            RegClass::Fp => &mut self.fp,
        }
    }

    /// Renames a source operand through the speculative map.
    pub fn source(&self, arch: ArchReg) -> Source {
        if arch.is_zero() {
            return Source::Ready(0);
        }
        self.bank(arch.class).source(arch.index)
    }

    /// Number of free physical registers of `class`.
    pub fn free_count(&self, class: RegClass) -> usize {
        self.bank(class).free.len()
    }

    /// Allocates a physical register for `dest`.
    ///
    /// Returns the new register and the one previously mapped to `dest`,
    /// which becomes free when this instruction retires.
    ///
    /// # Errors
    ///
    /// `ResourceExhausted` when the free list is empty; `DoubleAllocation`
    /// when the free list is corrupt.
    pub fn allocate(&mut self, dest: ArchReg) -> Result<(PhysReg, PhysReg), RenameError> {
        let bank = self.bank_mut(dest.class);
        let (index, prev) = bank.allocate(dest.index)?;
        Ok((bank.phys(index), bank.phys(prev)))
    }

    /// Writes a result and marks the register ready.
    pub fn write(&mut self, reg: PhysReg, value: u64) {
        let bank = self.bank_mut(reg.class);
        bank.values[reg.index as usize] = value;
        bank.ready[reg.index as usize] = true;
    }

    /// True once the producer of `reg` has written it.
    pub fn is_ready(&self, reg: PhysReg) -> bool {
        self.bank(reg.class).ready[reg.index as usize]
    }

    /// Current value of `reg`.
    pub fn read(&self, reg: PhysReg) -> u64 {
        self.bank(reg.class).values[reg.index as usize]
    }

    /// Resolves a source to its value if it is available.
    pub fn resolve(&self, source: Source) -> Option<u64> {
        match source {
            Source::Ready(value) => Some(value),
            Source::Pending(reg) => self.is_ready(reg).then(|| self.read(reg)),
        }
    }

    /// Retires a rename: `dest` now maps to `phys` and `prev` is freed.
    ///
    /// # Errors
    ///
    /// `FreeOfUnused` if `prev` was not in use.
    pub fn commit(&mut self, dest: ArchReg, phys: PhysReg, prev: PhysReg) -> Result<(), RenameError> {
        let bank = self.bank_mut(dest.class);
        bank.committed[dest.index as usize] = phys.index;
        bank.free(prev.index)
    }

    /// Returns a squashed instruction's register to the free list.
    ///
    /// # Errors
    ///
    /// `FreeOfUnused` if the register was not in use.
    pub fn release(&mut self, reg: PhysReg) -> Result<(), RenameError> {
        self.bank_mut(reg.class).free(reg.index)
    }

    /// True if another checkpoint can be taken.
    pub fn can_checkpoint(&self) -> bool {
        self.checkpoints.len() < self.max_checkpoints
    }

    /// Saves the speculative maps for branch `seq`.
    ///
    /// # Errors
    ///
    /// `CheckpointsFull` when every slot is taken.
    pub fn checkpoint(&mut self, seq: u64) -> Result<(), RenameError> {
        if !self.can_checkpoint() {
            return Err(RenameError::CheckpointsFull);
        }
        self.checkpoints.push_back(Checkpoint {
            seq,
            int_map: self.int.speculative,
            fp_map: self.fp.speculative,
        });
        Ok(())
    }

    /// Restores the maps saved by branch `seq` and drops it and every
    /// younger checkpoint.
    ///
    /// Registers allocated by the squashed instructions must be released
    /// separately.
    ///
    /// # Errors
    ///
    /// `MissingCheckpoint` if `seq` holds no checkpoint.
    pub fn rollback(&mut self, seq: u64) -> Result<(), RenameError> {
        let pos = self
            .checkpoints
            .iter()
            .position(|c| c.seq == seq)
            .ok_or(RenameError::MissingCheckpoint(seq))?;
        let saved = &self.checkpoints[pos];
        self.int.speculative = saved.int_map;
        self.fp.speculative = saved.fp_map;
        self.checkpoints.truncate(pos);
        Ok(())
    }

    /// Drops the checkpoint of a retired branch, if it still holds one.
    pub fn discard_checkpoint(&mut self, seq: u64) {
        self.checkpoints.retain(|c| c.seq != seq);
    }

    /// Number of live checkpoints.
    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    /// Abandons all speculative state.
    ///
    /// The speculative maps return to the committed maps, every checkpoint
    /// is dropped, and the free list is rebuilt from the registers the
    /// committed maps do not name.
    pub fn rollback_to_committed(&mut self) {
        self.int.reset_to_committed();
        self.fp.reset_to_committed();
        self.checkpoints.clear();
    }

    /// Committed value of an architectural register.
    pub fn committed_value(&self, arch: ArchReg) -> u64 {
        if arch.is_zero() {
            return 0;
        }
        let bank = self.bank(arch.class);
        bank.values[bank.committed[arch.index as usize] as usize]
    }

    /// Overwrites the committed value of an architectural register.
    ///
    /// Only meaningful while nothing is in flight, when the speculative and
    /// committed maps agree. Writes to R31/F31 are ignored.
    pub fn set_committed(&mut self, arch: ArchReg, value: u64) {
        if arch.is_zero() {
            return;
        }
        let bank = self.bank_mut(arch.class);
        let index = bank.committed[arch.index as usize] as usize;
        bank.values[index] = value;
        bank.ready[index] = true;
    }
}
