//! Store buffer for speculative stores.
//!
//! Stores are allocated in program order at dispatch, receive their address
//! and data when they execute, and drain to memory when they retire. Loads
//! consult the buffer before reading memory:
//! 1. **Forwarding:** The youngest older store covering every load byte supplies the data.
//! 2. **Ordering:** An older store with an unresolved address or a partial overlap makes the load retry.
//! 3. **Squash:** Entries younger than a mispredicted branch are discarded; a trap discards them all.

use std::collections::VecDeque;

use crate::core::pipeline::signals::MemWidth;
use crate::core::units::lsu::ordering::{LoadSource, Overlap, classify};

/// A buffered store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreEntry {
    /// Sequence number of the store instruction.
    pub seq: u64,
    /// Access width.
    pub width: MemWidth,
    /// Effective address, once the store has executed.
    pub addr: Option<u64>,
    /// Data, truncated to `width`.
    pub data: u64,
    /// A failed STx_C: retires without writing memory.
    pub suppressed: bool,
}

/// Store buffer holding uncommitted stores, oldest first.
#[derive(Debug)]
pub struct StoreBuffer {
    entries: VecDeque<StoreEntry>,
    capacity: usize,
}

impl StoreBuffer {
    /// Creates an empty buffer with room for `capacity` stores.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of buffered stores.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no store is buffered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if another store cannot be allocated.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Reserves an entry for store `seq` at dispatch.
    ///
    /// Returns `false` when the buffer is full.
    pub fn allocate(&mut self, seq: u64, width: MemWidth) -> bool {
        if self.is_full() {
            return false;
        }
        self.entries.push_back(StoreEntry {
            seq,
            width,
            addr: None,
            data: 0,
            suppressed: false,
        });
        true
    }

    fn find_mut(&mut self, seq: u64) -> Option<&mut StoreEntry> {
        self.entries.iter_mut().find(|e| e.seq == seq)
    }

    /// Records the address and data of an executed store.
    pub fn resolve(&mut self, seq: u64, addr: u64, data: u64) {
        if let Some(entry) = self.find_mut(seq) {
            entry.addr = Some(addr);
            entry.data = data;
        }
    }

    /// Marks a failed STx_C; it retires without writing memory.
    pub fn suppress(&mut self, seq: u64, addr: u64) {
        if let Some(entry) = self.find_mut(seq) {
            entry.addr = Some(addr);
            entry.suppressed = true;
        }
    }

    /// Decides where load `load_seq` gets its data.
    ///
    /// Older stores are scanned youngest first. The first one whose address
    /// is unknown, or that overlaps the load only partially, forces a retry;
    /// the first one that covers the load supplies its bytes.
    pub fn forward(&self, load_seq: u64, addr: u64, width: MemWidth) -> LoadSource {
        for entry in self.entries.iter().rev().filter(|e| e.seq < load_seq) {
            if entry.suppressed {
                continue;
            }
            let Some(store_addr) = entry.addr else {
                return LoadSource::Retry;
            };
            match classify(store_addr, entry.width, entry.data, addr, width) {
                Overlap::Disjoint => {}
                Overlap::Covered(value) => return LoadSource::Forwarded(value),
                Overlap::Partial => return LoadSource::Retry,
            }
        }
        LoadSource::Memory
    }

    /// Removes the oldest store, which must belong to retiring instruction `seq`.
    pub fn retire(&mut self, seq: u64) -> Option<StoreEntry> {
        if self.entries.front()?.seq != seq {
            return None;
        }
        self.entries.pop_front()
    }

    /// Discards stores younger than `seq`.
    pub fn squash_after(&mut self, seq: u64) {
        self.entries.retain(|e| e.seq <= seq);
    }

    /// Discards every buffered store.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
