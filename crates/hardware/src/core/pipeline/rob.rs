//! Reorder Buffer (ROB) for out-of-order execution with in-order retirement.
//!
//! The ROB is an arena of in-flight instructions indexed by sequence number.
//! It provides:
//! 1. **Allocation:** Assigns consecutive sequence numbers in program order.
//! 2. **Completion:** Holds each instruction's result, flags and side effects until retirement.
//! 3. **In-order Retirement:** Releases instructions from the head only once they are done.
//! 4. **Squash:** Removes every entry younger than a mispredicted branch, or all of them on a trap.
//!
//! Entries never reference each other; dependencies are carried by
//! physical register names, so squashing is a truncation of the arena.

use crate::common::error::TrapKind;
use crate::common::reg::ArchReg;
use crate::core::pipeline::rename::{PhysReg, Source};
use crate::core::units::bru::{BranchResolution, Prediction};
use crate::core::units::fpu::exception_flags::FpFlags;
use crate::isa::instruction::Decoded;

/// Lifecycle state of a ROB entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EntryState {
    /// Dispatched, waiting for operands or an issue slot.
    #[default]
    Issued,
    /// Issued to a unit; the result becomes visible at `ready_at`.
    Executing {
        /// Cycle the result is written back.
        ready_at: u64,
    },
    /// Result written back; waiting to retire.
    Completed,
    /// Faulted; the trap is delivered when the entry reaches the head.
    Faulted,
}

impl EntryState {
    /// True once the entry may leave the head of the ROB.
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Completed | Self::Faulted)
    }
}

/// Destination renaming recorded at dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenamedDest {
    /// Architectural register written.
    pub arch: ArchReg,
    /// Physical register receiving the result.
    pub phys: PhysReg,
    /// Physical register previously mapped to `arch`; freed at retirement.
    pub prev: PhysReg,
}

/// Architectural side effect applied when an instruction retires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Effect {
    /// Nothing beyond the register result.
    #[default]
    None,
    /// LDx_L: set the lock flag for this address.
    LoadLocked(u64),
    /// STx_C: clear the lock flag.
    StoreConditional,
    /// MT_FPCR: replace the FPCR.
    WriteFpcr(u64),
    /// HW_MTPR: write an internal processor register.
    WriteIpr {
        /// IPR index.
        index: u8,
        /// Value written.
        value: u64,
    },
    /// HW_RET: leave PALcode for this target (bit 0 selects PAL mode).
    ReturnFromPal(u64),
    /// RC/RS: new interrupt flag value.
    InterruptFlag(bool),
    /// CALL_PAL: enter PALcode after retiring.
    CallPal(u32),
}

/// Everything a unit produces for an instruction that executed normally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Completion {
    /// Value for the destination register, if any.
    pub value: u64,
    /// IEEE flags raised, accrued into the FPCR at retirement.
    pub flags: FpFlags,
    /// Resolved control flow, for branches and jumps.
    pub branch: Option<BranchResolution>,
    /// Deferred architectural side effect.
    pub effect: Effect,
    /// A device register was read; the access cannot be replayed.
    pub device_read: bool,
}

impl Completion {
    /// A completion carrying only a register value.
    pub fn value(value: u64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }
}

/// Result of presenting an instruction to a functional unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Executed; the completion becomes visible after the unit latency.
    Done(Completion),
    /// Faulted; the trap is recorded for delivery at retirement.
    Fault(TrapKind),
    /// Cannot execute yet (ordering or serialization); try again next cycle.
    Retry,
}

/// A single in-flight instruction.
#[derive(Clone, Debug)]
pub struct InstructionEntry {
    /// Sequence number, assigned by [`Rob::allocate`].
    pub seq: u64,
    /// Address of the instruction.
    pub pc: u64,
    /// Decoded form. Entries that faulted before decoding hold a no-op.
    pub decoded: Decoded,
    /// Renamed operands in slot order (a, b, c); absent slots read zero.
    pub sources: [Source; 3],
    /// Destination renaming, if the instruction writes a register.
    pub dest: Option<RenamedDest>,
    /// Current lifecycle state.
    pub state: EntryState,
    /// Result, valid once the entry is executing or completed.
    pub completion: Completion,
    /// Trap to deliver at retirement.
    pub trap: Option<TrapKind>,
    /// Fetch-time prediction for branches and jumps.
    pub prediction: Option<Prediction>,
    /// A store buffer entry belongs to this instruction.
    pub has_store: bool,
}

impl InstructionEntry {
    /// Creates an entry waiting to issue.
    pub const fn new(pc: u64, decoded: Decoded, sources: [Source; 3]) -> Self {
        Self {
            seq: 0,
            pc,
            decoded,
            sources,
            dest: None,
            state: EntryState::Issued,
            completion: Completion {
                value: 0,
                flags: FpFlags::NONE,
                branch: None,
                effect: Effect::None,
                device_read: false,
            },
            trap: None,
            prediction: None,
            has_store: false,
        }
    }

    /// Creates an entry that faulted before it could be renamed.
    pub const fn faulted(pc: u64, decoded: Decoded, trap: TrapKind) -> Self {
        let mut entry = Self::new(pc, decoded, [Source::Ready(0); 3]);
        entry.state = EntryState::Faulted;
        entry.trap = Some(trap);
        entry
    }

    /// Address of the next instruction on the architectural path.
    pub fn next_pc(&self) -> u64 {
        match (self.completion.branch, self.completion.effect) {
            (Some(resolution), _) => resolution.next_pc,
            (None, Effect::ReturnFromPal(target)) => target & !3,
            _ => self.pc.wrapping_add(4),
        }
    }

    /// True if the resolved path differs from the fetch-time prediction.
    pub fn mispredicted(&self) -> bool {
        match (self.completion.branch, self.prediction) {
            (Some(resolution), Some(prediction)) => resolution.next_pc != prediction.next_pc,
            _ => false,
        }
    }
}

/// Reorder Buffer: a fixed-capacity arena indexed by sequence number.
#[derive(Debug)]
pub struct Rob {
    slots: Vec<Option<InstructionEntry>>,
    head: u64,
    tail: u64,
}

impl Rob {
    /// Creates an empty ROB with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            head: 0,
            tail: 0,
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of in-flight entries.
    pub const fn len(&self) -> usize {
        (self.tail - self.head) as usize
    }

    /// True if no instruction is in flight.
    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// True if no slot is free.
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Sequence number of the oldest entry (or the next one, when empty).
    pub const fn head_seq(&self) -> u64 {
        self.head
    }

    /// Sequence numbers of all in-flight entries, oldest first.
    pub const fn seqs(&self) -> std::ops::Range<u64> {
        self.head..self.tail
    }

    fn slot(&self, seq: u64) -> usize {
        (seq % self.slots.len() as u64) as usize
    }

    /// Appends an entry, assigning and returning its sequence number.
    ///
    /// Returns `None` when the ROB is full.
    pub fn allocate(&mut self, mut entry: InstructionEntry) -> Option<u64> {
        if self.is_full() {
            return None;
        }
        let seq = self.tail;
        entry.seq = seq;
        let slot = self.slot(seq);
        self.slots[slot] = Some(entry);
        self.tail += 1;
        Some(seq)
    }

    /// The entry with sequence number `seq`, if it is in flight.
    pub fn get(&self, seq: u64) -> Option<&InstructionEntry> {
        if !self.seqs().contains(&seq) {
            return None;
        }
        self.slots[self.slot(seq)].as_ref()
    }

    /// Mutable access to the entry with sequence number `seq`.
    pub fn get_mut(&mut self, seq: u64) -> Option<&mut InstructionEntry> {
        if !self.seqs().contains(&seq) {
            return None;
        }
        let slot = self.slot(seq);
        self.slots[slot].as_mut()
    }

    /// The oldest in-flight entry.
    pub fn head(&self) -> Option<&InstructionEntry> {
        self.get(self.head)
    }

    /// Removes the head if it has completed or faulted.
    pub fn commit_head(&mut self) -> Option<InstructionEntry> {
        if !self.head()?.state.is_done() {
            return None;
        }
        let slot = self.slot(self.head);
        self.head += 1;
        self.slots[slot].take()
    }

    /// Removes every entry younger than `seq`, youngest first.
    ///
    /// Their sequence numbers are reused by the instructions fetched on
    /// the corrected path.
    pub fn squash_after(&mut self, seq: u64) -> Vec<InstructionEntry> {
        let keep = (seq + 1).clamp(self.head, self.tail);
        let mut squashed = Vec::with_capacity((self.tail - keep) as usize);
        while self.tail > keep {
            self.tail -= 1;
            let slot = self.slot(self.tail);
            if let Some(entry) = self.slots[slot].take() {
                squashed.push(entry);
            }
        }
        squashed
    }

    /// Removes every in-flight entry, youngest first.
    pub fn squash_all(&mut self) -> Vec<InstructionEntry> {
        let mut squashed = Vec::with_capacity(self.len());
        while self.tail > self.head {
            self.tail -= 1;
            let slot = self.slot(self.tail);
            if let Some(entry) = self.slots[slot].take() {
                squashed.push(entry);
            }
        }
        squashed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pc: u64) -> InstructionEntry {
        InstructionEntry::new(pc, Decoded::blank(0), [Source::Ready(0); 3])
    }

    #[test]
    fn test_allocate_and_commit() {
        let mut rob = Rob::new(4);
        assert!(rob.is_empty());
        let seq = rob.allocate(entry(0x1000)).unwrap();
        assert_eq!(rob.len(), 1);
        assert!(rob.commit_head().is_none());

        rob.get_mut(seq).unwrap().state = EntryState::Completed;
        let retired = rob.commit_head().unwrap();
        assert_eq!(retired.pc, 0x1000);
        assert!(rob.is_empty());
    }

    #[test]
    fn test_full_rob() {
        let mut rob = Rob::new(2);
        let _ = rob.allocate(entry(0x1000)).unwrap();
        let _ = rob.allocate(entry(0x1004)).unwrap();
        assert!(rob.is_full());
        assert!(rob.allocate(entry(0x1008)).is_none());
    }

    #[test]
    fn test_in_order_commit() {
        let mut rob = Rob::new(4);
        let first = rob.allocate(entry(0x1000)).unwrap();
        let second = rob.allocate(entry(0x1004)).unwrap();

        rob.get_mut(second).unwrap().state = EntryState::Completed;
        assert!(rob.commit_head().is_none());

        rob.get_mut(first).unwrap().state = EntryState::Faulted;
        assert_eq!(rob.commit_head().unwrap().seq, first);
        assert_eq!(rob.commit_head().unwrap().seq, second);
    }

    #[test]
    fn test_squash_after() {
        let mut rob = Rob::new(8);
        let seqs: Vec<u64> = (0..5)
            .map(|i| rob.allocate(entry(0x1000 + 4 * i)).unwrap())
            .collect();
        let squashed = rob.squash_after(seqs[1]);
        assert_eq!(
            squashed.iter().map(|e| e.seq).collect::<Vec<_>>(),
            vec![4, 3, 2]
        );
        assert_eq!(rob.len(), 2);
        assert_eq!(rob.allocate(entry(0x2000)), Some(2));
    }

    #[test]
    fn test_circular_wraparound() {
        let mut rob = Rob::new(2);
        for i in 0..6 {
            let seq = rob.allocate(entry(4 * i)).unwrap();
            assert_eq!(seq, i);
            rob.get_mut(seq).unwrap().state = EntryState::Completed;
            assert_eq!(rob.commit_head().unwrap().pc, 4 * i);
        }
        assert!(rob.get(5).is_none());
    }

    #[test]
    fn squash_all_empties_the_window() {
        let mut rob = Rob::new(4);
        let _ = rob.allocate(entry(0)).unwrap();
        let _ = rob.allocate(entry(4)).unwrap();
        assert_eq!(rob.squash_all().len(), 2);
        assert!(rob.is_empty());
        assert!(rob.head().is_none());
    }
}
