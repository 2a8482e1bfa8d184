/*!
A formula under evaluation: the variable table, the clause database, and the undo journal.

The formula exposes the handful of mutations a search is made of:

- [assign](Formula::assign) applies an assignment and updates every clause containing the
  variable, reporting the first clause falsified outright, if any.
- [recurse](Formula::recurse) opens a journal frame for a decision, and
  [backtrack](Formula::backtrack) reverses the topmost frame edit by edit.
- [compress](Formula::compress) packs the state to a word vector and
  [reconstruct](Formula::reconstruct) unpacks one received from another worker.
- [insert_conflict_clause](Formula::insert_conflict_clause) adds a learned clause mid-search,
  splicing shrink edits into the open frames so later unwinding remains exact.

Formulas built from a puzzle carry a [Grid], which maps each cell to its at-least-one clause and
lets a satisfying assignment be read back as a board.
*/

pub mod build;

use crate::{
    compress::Layout,
    db::{
        clause::{Bucket, ClauseDb},
        journal::{Edit, Journal},
        variable::{Implier, Tag, VariableTable},
        DepthIndex,
    },
    misc::log::targets,
    structures::{
        clause::{Clause, ClauseId},
        literal::{Literal, VariableId},
    },
    types::err::{self, ErrorKind},
};

/// The grid a formula was built from.
#[derive(Clone, Debug)]
pub struct Grid {
    /// Side length of the grid.
    pub n: u16,

    /// Side length of a block.
    pub sqrt_n: u16,

    /// The at-least-one clause of each cell, in row-major order.
    cell_clause: Vec<ClauseId>,
}

impl Grid {
    /// The at-least-one clause of the cell.
    pub fn cell_clause(&self, row: u16, col: u16) -> ClauseId {
        self.cell_clause[(row as usize * self.n as usize) + col as usize]
    }
}

/// A formula under evaluation.
#[derive(Clone, Debug)]
pub struct Formula {
    /// The variable table.
    pub variables: VariableTable,

    /// The clause database.
    pub clauses: ClauseDb,

    /// The undo journal.
    pub journal: Journal,

    /// The grid the formula was built from, if any.
    grid: Option<Grid>,

    /// A counter of assignments, for ordering.
    time: u32,
}

impl Formula {
    /// A fresh formula over `variable_count` variables and no clauses.
    pub fn new(variable_count: usize) -> Self {
        Formula {
            variables: VariableTable::new(variable_count),
            clauses: ClauseDb::default(),
            journal: Journal::default(),
            grid: None,
            time: 0,
        }
    }

    /// The count of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.count()
    }

    /// The grid the formula was built from, if any.
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// The value of a variable under the current (partial) valuation.
    pub fn value_of(&self, variable: VariableId) -> Option<bool> {
        self.variables.value_of(variable)
    }

    /// The current decision depth.
    pub fn depth(&self) -> DepthIndex {
        self.journal.depth()
    }

    /// Adds a clause to the formula.
    ///
    /// Only possible before the formula is sealed.
    pub fn add_clause(&mut self, literals: Vec<Literal>) -> Result<ClauseId, err::BuildError> {
        if self.clauses.is_sealed() {
            return Err(err::BuildError::Sealed);
        }
        for literal in &literals {
            if literal.variable() as usize >= self.variables.count() {
                return Err(err::BuildError::UnknownVariable(literal.variable()));
            }
        }

        let variables: Vec<VariableId> = literals
            .iter()
            .map(|literal| literal.variable())
            .collect();
        let live = literals.len();
        let id = self.clauses.insert(Clause::new(literals), live);
        for variable in variables {
            self.variables.note_containing(variable, id);
        }
        Ok(id)
    }

    /// Seals the original clause set, fixing the compressed-state layout.
    ///
    /// Idempotent; a context seals the formula it is built over.
    pub fn seal(&mut self, conflict_limit: usize) {
        self.clauses.seal(conflict_limit);
    }

    /// The compressed-state layout of the sealed formula.
    pub fn layout(&self) -> Layout {
        Layout {
            clause_count: self.clauses.original_count(),
            variable_count: self.variables.count(),
        }
    }

    /// The next assignment time.
    fn tick(&mut self) -> u32 {
        self.time += 1;
        self.time
    }

    /// Opens a journal frame for a decision.
    pub fn recurse(&mut self) {
        self.journal.push_frame();
    }

    /// Applies an assignment and updates every clause containing the variable.
    ///
    /// Clauses satisfied by the assignment are dropped; clauses losing their last live literal
    /// are conflicts, reported by id.
    /// On a conflict the clause's live count is left untouched, as the assignment edit which
    /// caused it will be reversed wholesale during unwinding.
    pub fn assign(
        &mut self,
        literal: Literal,
        implier: Implier,
        tag: Tag,
    ) -> Result<Option<ClauseId>, ErrorKind> {
        let variable = literal.variable();
        let polarity = literal.polarity();
        log::trace!(target: targets::PROPAGATION, "Assign {literal} ({implier:?})");

        self.journal.record(Edit::Assignment(variable));
        let depth = self.journal.depth();
        let time = self.tick();
        self.variables
            .assign(variable, polarity, implier, depth, time, tag)?;

        for index in 0..self.variables.containing(variable).len() {
            let id = self.variables.containing(variable)[index];
            let record = self.clauses.get(id)?;
            if matches!(record.bucket(), Bucket::Detached) {
                continue;
            }

            if record.clause().polarity_of(variable) == Some(polarity) {
                self.clauses.drop_clause(id)?;
                self.journal.record(Edit::Drop(id));
            } else {
                let live = record.live();
                if live == 1 {
                    log::trace!(target: targets::CONFLICT, "Clause {id} falsified by {literal}");
                    return Ok(Some(id));
                }
                self.clauses.reclassify(id, live - 1)?;
                self.journal.record(Edit::Shrink {
                    clause: id,
                    before: live,
                    after: live - 1,
                });
            }
        }
        Ok(None)
    }

    /// Reverses the topmost journal frame, edit by edit in reverse order.
    pub fn backtrack(&mut self) -> Result<(), ErrorKind> {
        let frame = self.journal.pop_frame()?;
        log::trace!(target: targets::JOURNAL, "Unwind frame of {} edits", frame.len());
        for edit in frame.into_iter().rev() {
            match edit {
                Edit::Assignment(variable) => self.variables.clear(variable)?,
                Edit::Drop(id) => self.clauses.restore(id)?,
                Edit::Shrink { clause, before, .. } => self.clauses.reclassify(clause, before)?,
            }
        }
        Ok(())
    }

    /// Inserts a learned clause mid-search, if capacity remains.
    ///
    /// The live count is taken against the current valuation, and a shrink edit is spliced into
    /// each open frame holding a falsifying assignment, so that unwinding those frames restores
    /// the clause's count exactly.
    /// Assignments at the root are never unwound and need no edit.
    pub fn insert_conflict_clause(
        &mut self,
        literals: Vec<Literal>,
    ) -> Result<Option<ClauseId>, ErrorKind> {
        if !self.clauses.take_conflict_capacity() {
            log::trace!(target: targets::CONFLICT, "Learned clause dropped, no capacity");
            return Ok(None);
        }

        let live = literals
            .iter()
            .filter(|literal| self.variables.value_of(literal.variable()).is_none())
            .count();
        let id = self.clauses.insert(Clause::new(literals.clone()), live);
        for literal in &literals {
            self.variables.note_containing(literal.variable(), id);
        }
        log::trace!(target: targets::CONFLICT, "Learned clause {id} inserted with {live} live");

        // Falsifying assignments, oldest first, each shrinking the count by one.
        let mut falsified: Vec<(u32, DepthIndex, VariableId)> = literals
            .iter()
            .filter(|literal| {
                self.variables.value_of(literal.variable()) == Some(!literal.polarity())
            })
            .map(|literal| {
                let variable = literal.variable();
                let time = self.variables.time_of(variable).unwrap_or(0);
                let depth = self.variables.depth_of(variable).unwrap_or(0);
                (time, depth, variable)
            })
            .collect();
        falsified.sort_unstable();

        let mut before = literals.len();
        for (_, depth, variable) in falsified {
            if depth > 0 {
                let position = self
                    .journal
                    .edits_of(depth)?
                    .iter()
                    .position(|edit| *edit == Edit::Assignment(variable));
                if let Some(position) = position {
                    self.journal.insert(
                        depth,
                        position + 1,
                        Edit::Shrink {
                            clause: id,
                            before,
                            after: before - 1,
                        },
                    )?;
                }
            }
            before -= 1;
        }
        Ok(Some(id))
    }

    /// Packs the state to a word vector.
    ///
    /// Only the original clauses are covered; learned clauses are consequences of those and are
    /// not carried across workers by state transfer.
    pub fn compress(&self) -> Result<Vec<u64>, ErrorKind> {
        let layout = self.layout();
        let mut words = layout.blank();
        let (clause_segment, variable_segments) = words.split_at_mut(layout.true_base());
        let (true_segment, false_segment) = variable_segments.split_at_mut(layout.variable_words());

        for id in 0..self.clauses.original_count() as ClauseId {
            let record = self.clauses.get(id)?;
            if matches!(record.bucket(), Bucket::Detached) {
                record.slot().set(clause_segment);
            }
        }
        for variable in 0..self.variables.count() as VariableId {
            match self.variables.value_of(variable) {
                Some(true) => self.variables.slot(variable).set(true_segment),
                Some(false) => self.variables.slot(variable).set(false_segment),
                None => {}
            }
        }
        log::trace!(target: targets::TRANSFER, "Compressed state to {} words", words.len());
        Ok(words)
    }

    /// Unpacks a state received from another worker, replacing the current one.
    ///
    /// The valuation is applied at the root, tagged [Tag::Remote], and the live count of each
    /// surviving clause is recovered from the valuation.
    pub fn reconstruct(&mut self, words: &[u64]) -> Result<(), ErrorKind> {
        let layout = self.layout();
        layout.check(words)?;
        self.reset_search();

        let clause_segment = &words[..layout.true_base()];
        let true_segment = &words[layout.true_base()..layout.false_base()];
        let false_segment = &words[layout.false_base()..];

        for variable in 0..self.variables.count() as VariableId {
            let slot = self.variables.slot(variable);
            let value = match (slot.read(true_segment), slot.read(false_segment)) {
                (true, true) => return Err(err::TransferError::Inconsistent(variable).into()),
                (true, false) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            };
            if let Some(value) = value {
                let time = self.tick();
                self.variables
                    .assign(variable, value, Implier::Decision, 0, time, Tag::Remote)?;
            }
        }

        for id in 0..self.clauses.original_count() as ClauseId {
            let record = self.clauses.get(id)?;
            let live = record
                .clause()
                .literals()
                .iter()
                .filter(|literal| self.variables.value_of(literal.variable()).is_none())
                .count();
            if record.slot().read(clause_segment) {
                self.clauses.drop_clause(id)?;
                self.clauses.set_live(id, live);
            } else if live == 0 {
                return Err(err::ClauseDbError::DeadActiveClause(id).into());
            } else {
                self.clauses.reclassify(id, live)?;
            }
        }
        log::trace!(
            target: targets::TRANSFER,
            "Reconstructed state, {} variables assigned",
            self.variables.assigned_count()
        );
        Ok(())
    }

    /// Returns the formula to its pristine, just-sealed state.
    ///
    /// Learned clauses are removed, every variable unassigned, and the journal cleared.
    pub fn reset_search(&mut self) {
        let original = self.clauses.original_count() as ClauseId;
        self.clauses.reset();
        for variable in 0..self.variables.count() as VariableId {
            self.variables.reset(variable);
            self.variables.prune_containing(variable, original);
        }
        self.journal.clear();
        self.time = 0;
    }

    /// Whether every clause of the database has been dropped.
    pub fn all_clauses_dropped(&self) -> bool {
        self.clauses.first_active().is_none()
    }

    /// The assignment a cell's at-least-one clause forces, if the clause is down to one
    /// candidate after `variable` was valued false.
    ///
    /// A shortcut for grid formulas which reads the completion straight off the cell, without
    /// waiting for the clause to surface in bucket order.
    pub fn cell_completion(&self, variable: VariableId) -> Option<(Literal, ClauseId)> {
        let grid = self.grid.as_ref()?;
        let cell = self.variables.cell_of(variable)?;
        let id = grid.cell_clause(cell.row, cell.col);
        let record = self.clauses.get(id).ok()?;
        if matches!(record.bucket(), Bucket::Detached) || record.live() != 1 {
            return None;
        }
        record
            .clause()
            .literals()
            .iter()
            .find(|literal| self.variables.value_of(literal.variable()).is_none())
            .map(|literal| (*literal, id))
    }

    /// The board a satisfying assignment spells out, for formulas built from a grid.
    pub fn sudoku_board(&self) -> Option<Vec<Vec<u16>>> {
        let grid = self.grid.as_ref()?;
        let n = grid.n as usize;
        let mut board = vec![vec![0_u16; n]; n];
        for variable in 0..self.variables.count() as VariableId {
            if self.variables.value_of(variable) == Some(true) {
                if let Some(cell) = self.variables.cell_of(variable) {
                    board[cell.row as usize][cell.col as usize] = cell.value;
                }
            }
        }
        Some(board)
    }
}
