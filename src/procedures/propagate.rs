/*!
Applying queued assignments.

A popped assignment opens a journal frame when it is a decision, and writes into the enclosing
frame when forced, so the count of open frames always equals the decision depth.

A falsified clause is ordinary control flow, surfaced as [PropagationOutcome::Conflict] for the
conflict procedures, never as an error.
*/

use rand::Rng;

use crate::{
    context::GenericContext,
    db::{
        task::{Assignment, Task},
        variable::{Implier, Tag},
    },
    misc::log::targets,
    structures::{
        clause::ClauseId,
        literal::{Literal, VariableId},
    },
    types::err::ErrorKind,
};

/// The result of applying one assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropagationOutcome {
    /// The assignment went through, or was already in force.
    Settled,

    /// The clause lost its last live literal.
    Conflict(ClauseId),
}

impl<R: Rng> GenericContext<R> {
    /// Applies a popped assignment task.
    ///
    /// An assignment whose variable already holds the same value is a no-op; one contradicted by
    /// the current valuation is a conflict on its implying clause, or a refuted branch to skip
    /// when the task was a decision.
    pub fn apply_assignment(
        &mut self,
        assignment: Assignment,
    ) -> Result<PropagationOutcome, ErrorKind> {
        let literal = assignment.literal;
        let variable = literal.variable();

        if let Some(value) = self.formula.value_of(variable) {
            if self.formula.variables.tag(variable, literal.polarity()) == Tag::Queued {
                self.formula
                    .variables
                    .set_tag(variable, literal.polarity(), Tag::Unassigned);
            }
            if value == literal.polarity() {
                return Ok(PropagationOutcome::Settled);
            }
            return match assignment.implier {
                Implier::Propagated(id) => Ok(PropagationOutcome::Conflict(id)),
                Implier::Decision => {
                    log::trace!(target: targets::PROPAGATION, "Skip refuted branch {literal}");
                    Ok(PropagationOutcome::Settled)
                }
            };
        }

        match assignment.implier {
            Implier::Decision => {
                self.formula.recurse();
                self.counters.decisions += 1;
            }
            Implier::Propagated(_) => self.counters.propagations += 1,
        }

        match self
            .formula
            .assign(literal, assignment.implier, Tag::Local)?
        {
            Some(conflict) => Ok(PropagationOutcome::Conflict(conflict)),
            None => {
                if self.config.smart_propagation && !literal.polarity() {
                    self.queue_cell_completion(variable);
                }
                Ok(PropagationOutcome::Settled)
            }
        }
    }

    /// Queues the completion a cell's at-least-one clause forces, if any.
    fn queue_cell_completion(&mut self, variable: VariableId) {
        if let Some((literal, id)) = self.formula.cell_completion(variable) {
            let already = self
                .formula
                .variables
                .tag(literal.variable(), literal.polarity())
                != Tag::Unassigned;
            if !already {
                log::trace!(
                    target: targets::PROPAGATION,
                    "Cell completion {literal} from clause {id}"
                );
                self.queue_task(Task::forced(literal, id));
            }
        }
    }

    /// Values every unassigned variable false.
    ///
    /// Sound only once every clause is dropped, when no assignment can falsify anything.
    pub fn assign_remaining(&mut self) -> Result<(), ErrorKind> {
        let unassigned: Vec<_> = self.formula.variables.unassigned().collect();
        for variable in unassigned {
            self.formula
                .assign(Literal::new(variable, false), Implier::Decision, Tag::Local)?;
        }
        Ok(())
    }
}
