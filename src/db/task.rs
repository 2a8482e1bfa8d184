/*!
A stack of pending search tasks.

The stack makes the recursion of a depth-first search explicit, so that a frontier branch may be
detached and handed to another worker without disturbing the rest of the search.

A decision pushes three entries: a [Task::Backtrack] marker which closes the decision's frame
when reached, then one [Task::Assign] per branch, the preferred branch on top.
A forced assignment pushes a single [Task::Assign], with the implying clause recorded.

Markers are omitted when the stack is empty or no frame is open, as there is nothing beneath to
close.

The stack keeps a count of its *nontrivial* tasks, the queued decision assignments, which gates
whether the worker has surplus work to give away.
*/

use crate::{
    db::variable::Implier,
    structures::literal::Literal,
};

/// An assignment waiting to be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// The literal to make true.
    pub literal: Literal,

    /// What implies the assignment.
    pub implier: Implier,
}

/// A pending search task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Close the frame of the decision beneath.
    Backtrack,

    /// Apply an assignment.
    Assign(Assignment),
}

impl Task {
    /// A decision task for the literal.
    pub fn decision(literal: Literal) -> Self {
        Task::Assign(Assignment {
            literal,
            implier: Implier::Decision,
        })
    }

    /// A forced task for the literal, implied by the clause.
    pub fn forced(literal: Literal, clause: crate::structures::clause::ClauseId) -> Self {
        Task::Assign(Assignment {
            literal,
            implier: Implier::Propagated(clause),
        })
    }

    /// Whether the task is a decision assignment.
    pub fn is_decision(&self) -> bool {
        matches!(
            self,
            Task::Assign(Assignment {
                implier: Implier::Decision,
                ..
            })
        )
    }
}

/// The stack of pending tasks.
#[derive(Clone, Debug, Default)]
pub struct TaskStack {
    tasks: Vec<Task>,

    /// Count of queued decision assignments.
    nontrivial: usize,
}

impl TaskStack {
    /// The count of pending tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The count of queued decision assignments.
    pub fn nontrivial(&self) -> usize {
        self.nontrivial
    }

    /// Pushes a task.
    pub fn push(&mut self, task: Task) {
        if task.is_decision() {
            self.nontrivial += 1;
        }
        self.tasks.push(task);
    }

    /// Pops the topmost task.
    pub fn pop(&mut self) -> Option<Task> {
        let task = self.tasks.pop();
        if let Some(task) = &task {
            if task.is_decision() {
                self.nontrivial -= 1;
            }
        }
        task
    }

    /// The topmost task, if any.
    pub fn peek(&self) -> Option<&Task> {
        self.tasks.last()
    }

    /// Clears every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.nontrivial = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::literal::Literal;

    #[test]
    fn nontrivial_counts_queued_decisions() {
        let mut stack = TaskStack::default();
        stack.push(Task::Backtrack);
        stack.push(Task::decision(Literal::new(0, false)));
        stack.push(Task::decision(Literal::new(0, true)));
        stack.push(Task::forced(Literal::new(1, true), 3));

        assert_eq!(stack.nontrivial(), 2);

        assert_eq!(stack.pop(), Some(Task::forced(Literal::new(1, true), 3)));
        assert_eq!(stack.nontrivial(), 2);

        assert_eq!(stack.pop(), Some(Task::decision(Literal::new(0, true))));
        assert_eq!(stack.nontrivial(), 1);
    }
}
