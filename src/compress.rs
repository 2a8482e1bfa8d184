/*!
A bit-packed representation of a search state, compact enough to hand between workers.

Every worker seals the same original formula, so a state is fully determined by which original
clauses have been dropped and which value, if any, each variable holds.
These are packed into a single word vector with three segments:

```text
[ clause dropped bits ][ variable true bits ][ variable false bits ]
```

Each segment is rounded up to a whole count of 64-bit words.
Live literal counts are not transmitted, as they are recoverable from the assignment.

A [WorkUnit] pairs a packed state with the frontier branch the receiving worker is to explore.
*/

use crate::{
    structures::literal::Literal,
    types::err,
};

/// The word layout of a packed state, fixed by the sealed formula's dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Count of original clauses.
    pub clause_count: usize,

    /// Count of variables.
    pub variable_count: usize,
}

impl Layout {
    /// Words holding the clause dropped bits.
    pub fn clause_words(&self) -> usize {
        self.clause_count.div_ceil(64)
    }

    /// Words holding one polarity segment of variable bits.
    pub fn variable_words(&self) -> usize {
        self.variable_count.div_ceil(64)
    }

    /// Total words of a packed state.
    pub fn word_count(&self) -> usize {
        self.clause_words() + 2 * self.variable_words()
    }

    /// First word of the variable true segment.
    pub fn true_base(&self) -> usize {
        self.clause_words()
    }

    /// First word of the variable false segment.
    pub fn false_base(&self) -> usize {
        self.clause_words() + self.variable_words()
    }

    /// A zeroed word vector of the layout's size.
    pub fn blank(&self) -> Vec<u64> {
        vec![0; self.word_count()]
    }

    /// Confirms a word vector matches the layout's size.
    pub fn check(&self, words: &[u64]) -> Result<(), err::TransferError> {
        match words.len() == self.word_count() {
            true => Ok(()),
            false => Err(err::TransferError::WordCount),
        }
    }
}

/// A packed search state and the frontier branch to explore from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkUnit {
    /// The packed state.
    pub state: Vec<u64>,

    /// The decision branch to apply on arrival.
    pub branch: Literal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_rounds_segments_to_words() {
        let layout = Layout {
            clause_count: 65,
            variable_count: 64,
        };
        assert_eq!(layout.clause_words(), 2);
        assert_eq!(layout.variable_words(), 1);
        assert_eq!(layout.word_count(), 4);
        assert_eq!(layout.true_base(), 2);
        assert_eq!(layout.false_base(), 3);
    }

    #[test]
    fn check_rejects_mismatched_word_counts() {
        let layout = Layout {
            clause_count: 1,
            variable_count: 1,
        };
        assert!(layout.check(&layout.blank()).is_ok());
        assert!(layout.check(&[]).is_err());
    }
}
