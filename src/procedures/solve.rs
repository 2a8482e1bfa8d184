/*!
The dynamics of a solve, one iteration at a time.

An iteration pops one task, applies it, and re-derives the frontier.
Exposing single iterations, rather than only a closed loop, is what lets the distributed
[worker](crate::dist::worker) interleave solving with its message traffic.
*/

use rand::Rng;

use crate::{
    context::GenericContext,
    db::task::Task,
    misc::log::targets,
    procedures::{
        conflict::ConflictOutcome,
        decide::Frontier,
        propagate::PropagationOutcome,
    },
    reports::Report,
    types::err::ErrorKind,
};

/// The result of one solver iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IterationOutcome {
    /// More iterations are needed.
    Proceeding,

    /// Every clause is dropped; the valuation satisfies the formula.
    Satisfiable,

    /// The search space is spent without a satisfying valuation.
    Exhausted,
}

impl<R: Rng> GenericContext<R> {
    /// Runs one iteration: pop a task, apply it, re-derive the frontier.
    pub fn solve_iteration(&mut self) -> Result<IterationOutcome, ErrorKind> {
        if self.formula.all_clauses_dropped() {
            return Ok(IterationOutcome::Satisfiable);
        }

        if self.tasks.is_empty() {
            match self.queue_next_tasks()? {
                Frontier::Satisfied => return Ok(IterationOutcome::Satisfiable),
                Frontier::Queued => {}
            }
        }
        let Some(task) = self.tasks.pop() else {
            return Ok(IterationOutcome::Exhausted);
        };

        match task {
            Task::Backtrack => {
                self.formula.backtrack()?;
                Ok(IterationOutcome::Proceeding)
            }
            Task::Assign(assignment) => match self.apply_assignment(assignment)? {
                PropagationOutcome::Conflict(clause) => {
                    match self.react_to_conflict(clause)? {
                        ConflictOutcome::Exhausted => Ok(IterationOutcome::Exhausted),
                        ConflictOutcome::Backtracked | ConflictOutcome::Learned(_) => {
                            Ok(IterationOutcome::Proceeding)
                        }
                    }
                }
                PropagationOutcome::Settled => {
                    if self.formula.all_clauses_dropped() {
                        return Ok(IterationOutcome::Satisfiable);
                    }
                    self.queue_next_tasks()?;
                    Ok(IterationOutcome::Proceeding)
                }
            },
        }
    }

    /// Solves the formula outright, with no cooperation.
    pub fn solve(&mut self) -> Result<Report, ErrorKind> {
        loop {
            match self.solve_iteration()? {
                IterationOutcome::Proceeding => {}
                IterationOutcome::Satisfiable => {
                    self.assign_remaining()?;
                    log::info!(
                        target: targets::DECISION,
                        "Satisfied after {} decisions, {} propagations, {} conflicts",
                        self.counters.decisions,
                        self.counters.propagations,
                        self.counters.conflicts
                    );
                    return Ok(Report::Satisfiable);
                }
                IterationOutcome::Exhausted => {
                    log::info!(
                        target: targets::DECISION,
                        "Exhausted after {} decisions, {} conflicts",
                        self.counters.decisions,
                        self.counters.conflicts
                    );
                    return Ok(Report::Unsatisfiable);
                }
            }
        }
    }
}
