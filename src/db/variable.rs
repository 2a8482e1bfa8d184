/*!
A table of variable related things.

One record per variable, allocated once at formula construction and mutated in place for the
lifetime of one worker's search.

Beyond its truth status, each variable carries the metadata the rest of the solver leans on:

- The clause which implied its value, or a marker that it was decided outright.
- The decision depth and global ordering time of its assignment, consumed by conflict analysis.
- One [Tag] per polarity, classifying where each of the variable's two candidate assignments
  currently resides.
  The tags drive blame assignment when a conflict clause arrives over the wire: a falsifying
  assignment tagged [Tag::Local] implicates this worker's own history, [Tag::Remote] the worker
  which granted the surrounding work unit, and [Tag::Stolen] a worker the branch was handed to.
*/

use crate::{
    db::{BitSlot, DepthIndex},
    structures::{clause::ClauseId, literal::VariableId},
    types::err,
};

/// What implied an assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Implier {
    /// The assignment was decided outright, with no implying clause.
    Decision,

    /// The assignment was forced by the clause.
    Propagated(ClauseId),
}

/// Where one polarity-assignment of a variable currently resides.
///
/// Transitions, per operation:
///
/// | operation                    | transition                        |
/// |------------------------------|-----------------------------------|
/// | task pushed                  | `Unassigned` → `Queued`           |
/// | task applied                 | `Queued` → `Local`                |
/// | task discarded on unwind     | `Queued` → `Unassigned`           |
/// | assignment undone            | `Local` → `Unassigned`            |
/// | branch handed to a thief     | `Queued` → `Stolen`               |
/// | state reconstructed          | `Unassigned` → `Remote` (per bit) |
/// | search reset                 | any → `Unassigned`                |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    /// No record of the assignment.
    Unassigned,

    /// The assignment waits on the local task stack.
    Queued,

    /// The assignment was applied by this worker.
    Local,

    /// The assignment arrived inside a reconstructed work unit.
    Remote,

    /// The assignment was handed to another worker.
    Stolen,
}

/// A cell of the originating grid, for formulas built from a puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub row: u16,
    pub col: u16,
    pub value: u16,
}

/// A record of everything known about one variable.
#[derive(Clone, Debug)]
pub struct VariableRecord {
    /// Truth status; never both polarities at once, by construction.
    value: Option<bool>,

    /// What implied the current value, meaningless while unassigned.
    implier: Implier,

    /// Decision depth at which the value was fixed.
    depth: DepthIndex,

    /// Global ordering counter of the assignment, `None` if unset.
    time: Option<u32>,

    /// Residence of the `true` assignment.
    true_tag: Tag,

    /// Residence of the `false` assignment.
    false_tag: Tag,

    /// Ids of clauses whose literal list mentions the variable.
    containing: Vec<ClauseId>,

    /// Originating grid cell, if any.
    cell: Option<GridCell>,

    /// Compressed-state slot of the variable's bit, relative to a polarity segment.
    slot: BitSlot,
}

/// The table of variable records.
#[derive(Clone, Debug, Default)]
pub struct VariableTable {
    records: Vec<VariableRecord>,
    assigned: usize,
}

impl VariableTable {
    /// A table of `count` fresh variables.
    pub fn new(count: usize) -> Self {
        let records = (0..count)
            .map(|index| VariableRecord {
                value: None,
                implier: Implier::Decision,
                depth: 0,
                time: None,
                true_tag: Tag::Unassigned,
                false_tag: Tag::Unassigned,
                containing: Vec::default(),
                cell: None,
                slot: BitSlot::at(index),
            })
            .collect();

        VariableTable {
            records,
            assigned: 0,
        }
    }

    /// The count of variables in the table.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// The count of currently assigned variables.
    pub fn assigned_count(&self) -> usize {
        self.assigned
    }

    /// The value of the variable, if any.
    pub fn value_of(&self, variable: VariableId) -> Option<bool> {
        self.records[variable as usize].value
    }

    /// Fixes the value of an unassigned variable, with full metadata.
    ///
    /// The tag is applied to the assigned polarity only; the tag of the opposite polarity is
    /// left alone, as a sibling branch may still be queued or stolen.
    pub fn assign(
        &mut self,
        variable: VariableId,
        value: bool,
        implier: Implier,
        depth: DepthIndex,
        time: u32,
        tag: Tag,
    ) -> Result<(), err::VariableError> {
        let record = &mut self.records[variable as usize];
        if record.value.is_some() {
            return Err(err::VariableError::DoubleAssignment(variable));
        }

        record.value = Some(value);
        record.implier = implier;
        record.depth = depth;
        record.time = Some(time);
        match value {
            true => record.true_tag = tag,
            false => record.false_tag = tag,
        }
        self.assigned += 1;
        Ok(())
    }

    /// Unassigns the variable, clearing the tag of the polarity it held.
    pub fn clear(&mut self, variable: VariableId) -> Result<(), err::VariableError> {
        let record = &mut self.records[variable as usize];
        let Some(value) = record.value else {
            return Err(err::VariableError::NotAssigned(variable));
        };

        record.value = None;
        record.implier = Implier::Decision;
        record.time = None;
        record.depth = 0;
        match value {
            true => record.true_tag = Tag::Unassigned,
            false => record.false_tag = Tag::Unassigned,
        }
        self.assigned -= 1;
        Ok(())
    }

    /// The residence tag of one polarity-assignment.
    pub fn tag(&self, variable: VariableId, polarity: bool) -> Tag {
        let record = &self.records[variable as usize];
        match polarity {
            true => record.true_tag,
            false => record.false_tag,
        }
    }

    /// Revises the residence tag of one polarity-assignment.
    pub fn set_tag(&mut self, variable: VariableId, polarity: bool, tag: Tag) {
        let record = &mut self.records[variable as usize];
        match polarity {
            true => record.true_tag = tag,
            false => record.false_tag = tag,
        }
    }

    /// What implied the variable's value; meaningless while unassigned.
    pub fn implier_of(&self, variable: VariableId) -> Implier {
        self.records[variable as usize].implier
    }

    /// The decision depth of the variable's assignment, if assigned.
    pub fn depth_of(&self, variable: VariableId) -> Option<DepthIndex> {
        let record = &self.records[variable as usize];
        record.value.map(|_| record.depth)
    }

    /// The assignment time of the variable, if set.
    pub fn time_of(&self, variable: VariableId) -> Option<u32> {
        self.records[variable as usize].time
    }

    /// Notes that a clause mentions the variable.
    pub fn note_containing(&mut self, variable: VariableId, clause: ClauseId) {
        self.records[variable as usize].containing.push(clause);
    }

    /// Ids of clauses mentioning the variable.
    pub fn containing(&self, variable: VariableId) -> &[ClauseId] {
        &self.records[variable as usize].containing
    }

    /// Attaches a grid cell to the variable.
    pub fn set_cell(&mut self, variable: VariableId, cell: GridCell) {
        self.records[variable as usize].cell = Some(cell);
    }

    /// The grid cell of the variable, if any.
    pub fn cell_of(&self, variable: VariableId) -> Option<GridCell> {
        self.records[variable as usize].cell
    }

    /// The compressed-state slot of the variable's bit, relative to a polarity segment.
    pub fn slot(&self, variable: VariableId) -> BitSlot {
        self.records[variable as usize].slot
    }

    /// An iterator over the ids of unassigned variables.
    pub fn unassigned(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.value.is_none())
            .map(|(index, _)| index as VariableId)
    }

    /// Forgets containing-clause entries at or beyond the limit.
    ///
    /// Used when learned clauses are removed from the database.
    pub fn prune_containing(&mut self, variable: VariableId, limit: ClauseId) {
        self.records[variable as usize]
            .containing
            .retain(|id| *id < limit);
    }

    /// Returns the variable to a fresh state, as if never touched.
    pub fn reset(&mut self, variable: VariableId) {
        let record = &mut self.records[variable as usize];
        if record.value.take().is_some() {
            self.assigned -= 1;
        }
        record.implier = Implier::Decision;
        record.depth = 0;
        record.time = None;
        record.true_tag = Tag::Unassigned;
        record.false_tag = Tag::Unassigned;
    }
}
