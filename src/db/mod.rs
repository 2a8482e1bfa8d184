//! Databases of things relevant to a solve.
//!
//! - The [variable table](crate::db::variable) holds the valuation and per-variable metadata.
//! - The [clause database](crate::db::clause) holds clauses bucketed by how close each is to
//!   forcing a value.
//! - The [journal](crate::db::journal) records every mutation, one frame per decision.
//! - The [task stack](crate::db::task) holds the frontier of the search.

pub mod clause;
pub mod journal;
pub mod task;
pub mod variable;

/// The index of a decision level, with zero for the root.
pub type DepthIndex = u32;

/// A precomputed position of one status bit in a compressed state segment.
///
/// The word offset is relative to the start of the segment the bit belongs to, so applying the
/// bit to a compressed buffer is a single indexed or-mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitSlot {
    /// Index of the word within the segment.
    pub word: usize,

    /// Mask of the bit within the word.
    pub mask: u64,
}

impl BitSlot {
    /// The slot of the bit at `index` within a segment.
    pub fn at(index: usize) -> Self {
        BitSlot {
            word: index / 64,
            mask: 1_u64 << (index % 64),
        }
    }

    /// Reads the bit from a segment.
    pub fn read(&self, segment: &[u64]) -> bool {
        segment[self.word] & self.mask != 0
    }

    /// Sets the bit in a segment.
    pub fn set(&self, segment: &mut [u64]) {
        segment[self.word] |= self.mask;
    }
}
