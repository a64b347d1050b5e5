//! Branch Target Buffer (BTB).
//!
//! A direct-mapped table of targets for computed jumps (JMP, JSR,
//! JSR_COROUTINE). Alpha jump instructions also carry a 14-bit hint of the
//! target's longword index; the hint is used only when the BTB misses.

/// An entry in the Branch Target Buffer.
#[derive(Clone, Copy, Debug, Default)]
struct BtbEntry {
    /// Full PC of the jump owning this entry.
    tag: u64,
    /// The predicted target address.
    target: u64,
    /// Indicates if this entry contains valid data.
    valid: bool,
}

/// Branch Target Buffer structure.
#[derive(Clone, Debug)]
pub struct Btb {
    /// The table of BTB entries.
    table: Vec<BtbEntry>,
    /// Index mask (table size minus one).
    mask: usize,
}

impl Btb {
    /// Creates a new Branch Target Buffer.
    ///
    /// # Arguments
    ///
    /// * `size` - The number of entries in the BTB. Must be a power of 2.
    pub fn new(size: usize) -> Self {
        Self {
            table: vec![BtbEntry::default(); size],
            mask: size.saturating_sub(1),
        }
    }

    /// Instruction index of `pc`, masked to the table.
    const fn index(&self, pc: u64) -> usize {
        ((pc >> 2) as usize) & self.mask
    }

    /// Looks up the target for the jump at `pc`.
    pub fn lookup(&self, pc: u64) -> Option<u64> {
        let e = self.table[self.index(pc)];
        (e.valid && e.tag == pc).then_some(e.target)
    }

    /// Records the resolved target of the jump at `pc`.
    pub fn update(&mut self, pc: u64, target: u64) {
        let idx = self.index(pc);
        self.table[idx] = BtbEntry {
            tag: pc,
            target,
            valid: true,
        };
    }
}
