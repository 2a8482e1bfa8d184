/*!
A journal of edits to the formula, grouped into frames by decision depth.

Every mutation the search machine makes to the formula is recorded as an [Edit], in the order
made.
A fresh frame is opened for each decision, and the frame preceding all decisions holds edits made
at the root, such as the propagation of given unit clauses.

Undoing a decision is a matter of popping the topmost frame and reverse-applying its edits in
reverse order, which the formula handles.

Frames remain editable after the fact: when a learned clause is inserted into the database
mid-search, a shrink edit is spliced into each open frame at the position where the clause's live
count was retroactively reduced, so that later unwinding restores the clause correctly.
*/

use crate::{
    db::DepthIndex,
    misc::log::targets,
    structures::{clause::ClauseId, literal::VariableId},
    types::err,
};

/// One recorded mutation of the formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edit {
    /// A variable was assigned a value.
    Assignment(VariableId),

    /// A satisfied clause was dropped from the database.
    Drop(ClauseId),

    /// A clause's live count shrank from `before` to `after`.
    Shrink {
        clause: ClauseId,
        before: usize,
        after: usize,
    },
}

/// The journal of edits, one frame per decision plus a root frame.
#[derive(Clone, Debug, Default)]
pub struct Journal {
    /// Edits made before any decision.
    root: Vec<Edit>,

    /// Edits of each open decision, oldest first.
    frames: Vec<Vec<Edit>>,
}

impl Journal {
    /// The current decision depth, the count of open frames.
    pub fn depth(&self) -> DepthIndex {
        self.frames.len() as DepthIndex
    }

    /// Opens a fresh frame for a decision.
    pub fn push_frame(&mut self) {
        log::trace!(target: targets::JOURNAL, "Open frame at depth {}", self.frames.len() + 1);
        self.frames.push(Vec::default());
    }

    /// Records an edit in the topmost frame, or the root frame at depth zero.
    pub fn record(&mut self, edit: Edit) {
        match self.frames.last_mut() {
            Some(frame) => frame.push(edit),
            None => self.root.push(edit),
        }
    }

    /// Closes the topmost frame, returning its edits oldest first.
    pub fn pop_frame(&mut self) -> Result<Vec<Edit>, err::JournalError> {
        match self.frames.pop() {
            Some(frame) => Ok(frame),
            None => Err(err::JournalError::NoOpenFrame),
        }
    }

    /// The edits of a frame, with depth zero the root frame.
    pub fn edits_of(&self, depth: DepthIndex) -> Result<&[Edit], err::JournalError> {
        match depth {
            0 => Ok(&self.root),
            _ => match self.frames.get(depth as usize - 1) {
                Some(frame) => Ok(frame),
                None => Err(err::JournalError::OutOfRange),
            },
        }
    }

    /// Splices an edit into a frame at the given position.
    pub fn insert(
        &mut self,
        depth: DepthIndex,
        position: usize,
        edit: Edit,
    ) -> Result<(), err::JournalError> {
        let frame = match depth {
            0 => &mut self.root,
            _ => match self.frames.get_mut(depth as usize - 1) {
                Some(frame) => frame,
                None => return Err(err::JournalError::OutOfRange),
            },
        };
        if position > frame.len() {
            return Err(err::JournalError::OutOfRange);
        }
        frame.insert(position, edit);
        Ok(())
    }

    /// Clears every frame, root included.
    pub fn clear(&mut self) {
        self.root.clear();
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_land_in_the_open_frame() {
        let mut journal = Journal::default();
        journal.record(Edit::Assignment(0));
        journal.push_frame();
        journal.record(Edit::Drop(1));

        assert_eq!(journal.depth(), 1);
        assert_eq!(journal.edits_of(0).unwrap(), &[Edit::Assignment(0)]);
        assert_eq!(journal.edits_of(1).unwrap(), &[Edit::Drop(1)]);

        let frame = journal.pop_frame().unwrap();
        assert_eq!(frame, vec![Edit::Drop(1)]);
        assert!(journal.pop_frame().is_err());
    }

    #[test]
    fn insert_splices_at_position() {
        let mut journal = Journal::default();
        journal.push_frame();
        journal.record(Edit::Assignment(0));
        journal.record(Edit::Assignment(1));

        journal
            .insert(
                1,
                1,
                Edit::Shrink {
                    clause: 7,
                    before: 3,
                    after: 2,
                },
            )
            .unwrap();

        assert_eq!(
            journal.edits_of(1).unwrap(),
            &[
                Edit::Assignment(0),
                Edit::Shrink {
                    clause: 7,
                    before: 3,
                    after: 2
                },
                Edit::Assignment(1),
            ]
        );
    }
}
