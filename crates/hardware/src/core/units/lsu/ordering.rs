//! Load ordering against older, uncommitted stores.
//!
//! A speculative load never observes a younger store. Against each older
//! store it either misses entirely, is fully covered (the store's bytes are
//! forwarded), or overlaps partially. A partial overlap cannot be merged
//! and the load must wait until the store drains to memory.

use crate::core::pipeline::signals::MemWidth;

/// Relation between an older store and a load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlap {
    /// The byte ranges are disjoint.
    Disjoint,
    /// Every load byte comes from the store; carries the forwarded value.
    Covered(u64),
    /// Some, but not all, load bytes come from the store.
    Partial,
}

/// Where a load obtains its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    /// No older store overlaps; read committed memory.
    Memory,
    /// Forwarded from an older store in the buffer.
    Forwarded(u64),
    /// An older store has an unresolved address or overlaps partially.
    Retry,
}

/// Classifies an older store at `store_addr` against a load.
///
/// `store_value` is the store's data already truncated to its width.
pub fn classify(
    store_addr: u64,
    store_width: MemWidth,
    store_value: u64,
    load_addr: u64,
    load_width: MemWidth,
) -> Overlap {
    let store_end = store_addr.saturating_add(store_width.bytes());
    let load_end = load_addr.saturating_add(load_width.bytes());
    if load_end <= store_addr || store_end <= load_addr {
        return Overlap::Disjoint;
    }
    if load_addr < store_addr || load_end > store_end {
        return Overlap::Partial;
    }
    let shift = 8 * (load_addr - store_addr);
    let value = store_value >> shift;
    let value = match load_width {
        MemWidth::Quad => value,
        width => value & ((1 << (8 * width.bytes())) - 1),
    };
    Overlap::Covered(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_forwards() {
        let o = classify(0x100, MemWidth::Quad, 0xDEAD_BEEF, 0x100, MemWidth::Quad);
        assert_eq!(o, Overlap::Covered(0xDEAD_BEEF));
    }

    #[test]
    fn narrower_load_inside_store_forwards_its_bytes() {
        let o = classify(0x100, MemWidth::Quad, 0x8877_6655_4433_2211, 0x102, MemWidth::Word);
        assert_eq!(o, Overlap::Covered(0x4433));
    }

    #[test]
    fn wider_load_overlaps_partially() {
        let o = classify(0x104, MemWidth::Long, 1, 0x100, MemWidth::Quad);
        assert_eq!(o, Overlap::Partial);
    }

    #[test]
    fn disjoint_ranges() {
        assert_eq!(
            classify(0x100, MemWidth::Long, 1, 0x104, MemWidth::Long),
            Overlap::Disjoint
        );
    }
}
