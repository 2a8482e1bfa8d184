/*!
Deriving the next tasks from the clause database.

After every applied assignment the frontier is re-derived from the first active clause in bucket
order.
A clause down to one live literal yields a single forced task; any other clause yields a
decision: a backtrack marker (omitted when the stack is empty or no frame is open, with nothing
beneath to close) and the two branches over the picked variable, the preferred branch on top.

Both polarities of a queued branch are tagged before the task is popped, so the residence of
every pending assignment is visible to blame checks while it waits.
*/

use rand::Rng;

use crate::{
    context::GenericContext,
    db::{
        task::Task,
        variable::Tag,
    },
    misc::log::targets,
    structures::literal::Literal,
    types::err::{self, ErrorKind},
};

/// What deriving tasks from the formula found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frontier {
    /// Every clause is dropped; the valuation satisfies the formula.
    Satisfied,

    /// Tasks were queued.
    Queued,
}

impl<R: Rng> GenericContext<R> {
    /// Derives the next tasks from the first active clause in bucket order.
    pub fn queue_next_tasks(&mut self) -> Result<Frontier, ErrorKind> {
        let Some(id) = self.formula.clauses.first_active() else {
            return Ok(Frontier::Satisfied);
        };

        let record = self.formula.clauses.get(id)?;
        let unassigned: Vec<Literal> = record
            .clause()
            .literals()
            .iter()
            .filter(|literal| self.formula.value_of(literal.variable()).is_none())
            .copied()
            .collect();
        let Some(literal) = unassigned.first().copied() else {
            return Err(err::ClauseDbError::DeadActiveClause(id).into());
        };

        if unassigned.len() == 1 {
            log::trace!(target: targets::DECISION, "Queue forced {literal} from clause {id}");
            self.queue_task(Task::forced(literal, id));
        } else {
            let first = self.first_pick(literal);
            log::trace!(
                target: targets::DECISION,
                "Queue decision on {} from clause {id}, {first} first",
                literal.variable()
            );
            if !self.tasks.is_empty() && self.formula.depth() > 0 {
                self.tasks.push(Task::Backtrack);
            }
            self.queue_task(Task::decision(Literal::new(literal.variable(), !first)));
            self.queue_task(Task::decision(Literal::new(literal.variable(), first)));
        }
        Ok(Frontier::Queued)
    }

    /// Pushes an assignment task, tagging its polarity as queued.
    pub(crate) fn queue_task(&mut self, task: Task) {
        if let Task::Assign(assignment) = &task {
            self.formula.variables.set_tag(
                assignment.literal.variable(),
                assignment.literal.polarity(),
                Tag::Queued,
            );
        }
        self.tasks.push(task);
    }

    /// The polarity to try first for a branching literal.
    fn first_pick(&mut self, literal: Literal) -> bool {
        use crate::config::Polarity;
        if self.config.random_first_pick {
            return self.rng.random_bool(0.5);
        }
        match self.config.polarity {
            Polarity::Greedy => literal.polarity(),
            Polarity::Opposite => !literal.polarity(),
            Polarity::AlwaysTrue => true,
            Polarity::AlwaysFalse => false,
        }
    }
}
