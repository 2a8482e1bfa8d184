/*!
Learning from falsified clauses.

Analysis resolves the conflicting clause against the implying clause of its most recently
assigned forced literal, repeatedly, until every literal of the resolvent was decided outright.
As each depth holds exactly one decision, the resolvent's literals sit at pairwise distinct
depths, and the clause becomes unit the moment the search unwinds to the second-highest of them.

The machine unwinds to exactly that depth, discarding queued branches along the way, and inserts
the learned clause into the database.
Bucket order then surfaces the clause as forced on the next iteration; nothing is assigned here.
*/

use rand::Rng;

use crate::{
    context::GenericContext,
    db::{
        task::Task,
        variable::{Implier, Tag},
        DepthIndex,
    },
    misc::log::targets,
    structures::{clause::ClauseId, literal::Literal},
    types::err::{self, ErrorKind},
};

/// The result of handling a conflict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConflictOutcome {
    /// The conflict admits no undoing; the current search is refuted.
    Exhausted,

    /// One decision frame was undone, with learning disabled.
    Backtracked,

    /// A clause was learned and the search backjumped.
    ///
    /// The literals are kept so cooperating workers may be sent the clause, whether or not the
    /// local database had capacity to store it.
    Learned(Vec<Literal>),
}

impl<R: Rng> GenericContext<R> {
    /// Reacts to a clause falsified during propagation.
    pub fn react_to_conflict(&mut self, clause: ClauseId) -> Result<ConflictOutcome, ErrorKind> {
        self.counters.conflicts += 1;
        if self.config.conflict_learning && self.formula.clauses.conflict_capacity() > 0 {
            self.learn_from(clause)
        } else {
            self.backtrack_chronologically()
        }
    }

    /// Undoes the frame of the most recent decision, discarding the forced tasks it queued.
    ///
    /// Forced tasks above the frame's sibling branch were justified by the undone assignments
    /// and would misfire if left queued.
    /// A conflict with no open frame sits among root assignments, which no branch can revise.
    pub fn backtrack_chronologically(&mut self) -> Result<ConflictOutcome, ErrorKind> {
        if self.tasks.is_empty() || self.formula.depth() == 0 {
            return Ok(ConflictOutcome::Exhausted);
        }
        while let Some(Task::Assign(assignment)) = self.tasks.peek().copied() {
            if matches!(assignment.implier, Implier::Decision) {
                break;
            }
            self.tasks.pop();
            let literal = assignment.literal;
            if self
                .formula
                .variables
                .tag(literal.variable(), literal.polarity())
                == Tag::Queued
            {
                self.formula.variables.set_tag(
                    literal.variable(),
                    literal.polarity(),
                    Tag::Unassigned,
                );
            }
        }
        self.formula.backtrack()?;
        Ok(ConflictOutcome::Backtracked)
    }

    /// Learns a clause from the conflict, backjumps, and stores the clause.
    pub fn learn_from(&mut self, clause: ClauseId) -> Result<ConflictOutcome, ErrorKind> {
        let learned = self.decided_conflict_literals(clause)?;
        if learned.is_empty() {
            // Resolved away entirely by unit givens: refuted with nothing to undo.
            return Ok(ConflictOutcome::Exhausted);
        }

        let mut depths: Vec<DepthIndex> = Vec::with_capacity(learned.len());
        for literal in &learned {
            match self.formula.variables.depth_of(literal.variable()) {
                Some(depth) => depths.push(depth),
                None => return Err(err::AnalysisError::UnassignedLiteral(literal.variable()).into()),
            }
        }
        depths.sort_unstable_by(|a, b| b.cmp(a));
        let target = if depths.len() > 1 { depths[1] } else { 0 };

        if depths[0] == 0 {
            // Every literal refuted at the root: nothing to unwind, nothing satisfies.
            return Ok(ConflictOutcome::Exhausted);
        }

        log::debug!(
            target: targets::CONFLICT,
            "Learned {} literals, backjump {} -> {target}",
            learned.len(),
            self.formula.depth()
        );
        self.unwind_to(target)?;
        if self
            .formula
            .insert_conflict_clause(learned.clone())?
            .is_some()
        {
            self.counters.learned += 1;
        }
        if self.share_learned {
            self.learned_outbox.push(learned.clone());
        }
        Ok(ConflictOutcome::Learned(learned))
    }

    /// Resolves the conflicting clause down to decided literals.
    ///
    /// Forced literals are resolved out most recently assigned first, replaying propagation
    /// backwards.
    pub fn decided_conflict_literals(
        &self,
        clause: ClauseId,
    ) -> Result<Vec<Literal>, ErrorKind> {
        let mut literals: Vec<Literal> = self.formula.clauses.get(clause)?.clause().literals().to_vec();

        loop {
            let mut pivot: Option<(u32, usize)> = None;
            for (index, literal) in literals.iter().enumerate() {
                let variable = literal.variable();
                if let Implier::Propagated(_) = self.formula.variables.implier_of(variable) {
                    let time = match self.formula.variables.time_of(variable) {
                        Some(time) => time,
                        None => {
                            return Err(err::AnalysisError::UnassignedLiteral(variable).into())
                        }
                    };
                    if pivot.map_or(true, |(best, _)| time > best) {
                        pivot = Some((time, index));
                    }
                }
            }
            let Some((_, index)) = pivot else {
                return Ok(literals);
            };

            let pivot_literal = literals.swap_remove(index);
            let pivot_variable = pivot_literal.variable();
            let Implier::Propagated(implying) =
                self.formula.variables.implier_of(pivot_variable)
            else {
                return Err(err::ErrorKind::InvalidState);
            };
            for other in self.formula.clauses.get(implying)?.clause().literals() {
                if other.variable() != pivot_variable && !literals.contains(other) {
                    literals.push(*other);
                }
            }
        }
    }

    /// Unwinds the search to the given depth, discarding queued tasks along the way.
    ///
    /// Queued branch tags are released; stolen tags stay, as their thief records remain live.
    /// Frames below the oldest marker are unwound directly.
    pub fn unwind_to(&mut self, target: DepthIndex) -> Result<(), ErrorKind> {
        while self.formula.depth() > target {
            match self.tasks.pop() {
                Some(Task::Backtrack) | None => self.formula.backtrack()?,
                Some(Task::Assign(assignment)) => {
                    let literal = assignment.literal;
                    if self
                        .formula
                        .variables
                        .tag(literal.variable(), literal.polarity())
                        == Tag::Queued
                    {
                        self.formula.variables.set_tag(
                            literal.variable(),
                            literal.polarity(),
                            Tag::Unassigned,
                        );
                    }
                }
            }
        }
        Ok(())
    }
}
