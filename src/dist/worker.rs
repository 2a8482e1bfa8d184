/*!
The cooperative event loop of one worker.

Each iteration drains the inbox, then either advances the local search by one step or, when the
worker holds no unit, pursues work: stashed grants first, then requests to neighbours, urgency
once only one avenue remains.

Termination is two-fold.
Success anywhere broadcasts an abort to every rank.
Exhaustion is detected implicitly: once every neighbour, the virtual parent included, has
urgently confirmed it holds nothing, and the worker itself is empty, the answer is
unsatisfiable, and an abort cascades to any neighbour not already urgently notified.
*/

use rand::Rng;

use crate::{
    compress::WorkUnit,
    context::GenericContext,
    db::{task::Task, variable::Tag},
    dist::{
        message::{Envelope, Message, Transport, Urgency},
        state::{NeighborStatus, Outbound, ScheduleState},
    },
    misc::log::targets,
    procedures::solve::IterationOutcome,
    reports::Report,
    structures::literal::Literal,
    types::err::ErrorKind,
};

/// One worker: a context, its scheduling state, and a transport endpoint.
pub struct Worker<R: Rng, T: Transport> {
    /// The solving context, owned exclusively.
    pub context: GenericContext<R>,

    /// Scheduling state.
    pub schedule: ScheduleState,

    /// The transport endpoint of this rank.
    pub transport: T,

    /// Whether the worker currently owns a search to advance.
    pub(crate) engaged: bool,

    /// The report to stop with, once set.
    pub(crate) finished: Option<Report>,
}

impl<R: Rng, T: Transport> Worker<R, T> {
    /// A worker over the context and transport.
    pub fn new(mut context: GenericContext<R>, transport: T) -> Self {
        context.share_learned = true;
        let schedule = ScheduleState::new(
            transport.rank(),
            transport.rank_count(),
            context.config.branching_factor,
        );
        Worker {
            context,
            schedule,
            transport,
            engaged: false,
            finished: None,
        }
    }

    /// Runs the event loop to a report.
    ///
    /// Rank zero seeds itself with the whole problem; every other rank begins empty and asks.
    pub fn run(&mut self) -> Result<Report, ErrorKind> {
        if self.transport.rank() == 0 {
            self.context.queue_next_tasks()?;
            self.engaged = true;
        }

        loop {
            if let Some(report) = self.finished {
                return Ok(report);
            }
            self.drain_messages()?;
            if let Some(report) = self.finished {
                return Ok(report);
            }

            if self.engaged {
                self.advance()?;
            } else {
                self.pursue_work()?;
            }
        }
    }

    /// Advances the local search by one iteration and services the aftermath.
    fn advance(&mut self) -> Result<(), ErrorKind> {
        match self.context.solve_iteration()? {
            IterationOutcome::Proceeding => {}
            IterationOutcome::Satisfiable => {
                self.context.assign_remaining()?;
                log::info!(target: targets::SCHEDULE, "Rank {} satisfied", self.transport.rank());
                self.broadcast_abort(Report::Satisfiable);
                self.finished = Some(Report::Satisfiable);
                return Ok(());
            }
            IterationOutcome::Exhausted => {
                log::debug!(target: targets::SCHEDULE, "Rank {} unit spent", self.transport.rank());
                self.retire_unit();
            }
        }
        self.share_learned_clauses();
        self.offer_work()?;
        Ok(())
    }

    /// Pursues work while idle: stash, then requests, then urgency, then implicit abort.
    fn pursue_work(&mut self) -> Result<(), ErrorKind> {
        if let Some((donor, unit)) = self.schedule.stash.pop() {
            self.adopt(donor, unit)?;
            return Ok(());
        }

        if self.schedule.all_urgent() {
            self.implicit_abort();
            return Ok(());
        }
        self.seek_work();
        std::thread::yield_now();
        Ok(())
    }

    /// Handles every message currently in the inbox.
    fn drain_messages(&mut self) -> Result<(), ErrorKind> {
        while let Some(envelope) = self.transport.try_recv() {
            self.handle_message(envelope)?;
            if self.finished.is_some() {
                break;
            }
        }
        Ok(())
    }

    fn handle_message(&mut self, envelope: Envelope) -> Result<(), ErrorKind> {
        let Envelope { from, message } = envelope;
        match message {
            Message::WorkRequest { urgency } => {
                let status = match urgency {
                    Urgency::Normal => NeighborStatus::Requesting,
                    Urgency::Urgent | Urgency::Upgrade => NeighborStatus::Urgent,
                };
                log::trace!(target: targets::SCHEDULE, "Rank {from} requests work ({urgency:?})");
                if let Some(slot) = self.schedule.slot_of(from) {
                    slot.status = status;
                }
            }
            Message::WorkGrant(unit) => {
                if let Some(slot) = self.schedule.slot_of(from) {
                    slot.status = NeighborStatus::Working;
                    slot.outbound = Outbound::None;
                }
                if self.engaged {
                    log::trace!(target: targets::SCHEDULE, "Stash work from rank {from}");
                    self.schedule.stash.push((from, unit));
                } else {
                    self.adopt(from, unit)?;
                }
            }
            Message::ConflictClause(literals) => self.handle_conflict_clause(from, literals)?,
            Message::Invalidate { branch } => self.handle_invalidate(from, branch)?,
            Message::Abort(report) => {
                log::debug!(target: targets::SCHEDULE, "Rank {from} aborts: {report}");
                if self.finished.is_none() {
                    self.finished = Some(match report {
                        Report::Satisfiable => Report::Aborted,
                        other => other,
                    });
                    self.cascade_abort(report, Some(from));
                }
            }
        }
        Ok(())
    }

    /// Takes ownership of a granted unit: reconstruct, then queue its frontier branch.
    fn adopt(&mut self, donor: usize, unit: WorkUnit) -> Result<(), ErrorKind> {
        log::debug!(
            target: targets::TRANSFER,
            "Rank {} adopts branch {} from rank {donor}",
            self.transport.rank(),
            unit.branch
        );
        self.context.formula.reconstruct(&unit.state)?;
        self.context.tasks.clear();
        self.context.queue_task(Task::decision(unit.branch));
        self.schedule.donor = Some(donor);
        self.schedule.branch = Some(unit.branch);
        self.engaged = true;
        Ok(())
    }

    /// Discards the current unit and returns to idle.
    pub(crate) fn retire_unit(&mut self) {
        self.context.tasks.clear();
        self.context.formula.reset_search();
        self.schedule.donor = None;
        self.schedule.branch = None;
        self.engaged = false;
    }

    /// Requests work from a neighbour, escalating once a single avenue remains.
    fn seek_work(&mut self) {
        if let Some(target) = self.schedule.escalation_target() {
            let Some(slot) = self.schedule.slot_of(target) else {
                return;
            };
            if slot.outbound != Outbound::Urgent {
                let urgency = match slot.outbound {
                    Outbound::Requested => Urgency::Upgrade,
                    _ => Urgency::Urgent,
                };
                slot.outbound = Outbound::Urgent;
                log::debug!(target: targets::SCHEDULE, "Escalate work request to rank {target}");
                self.transport
                    .send(target, Message::WorkRequest { urgency });
            }
            return;
        }

        if let Some(target) = self.schedule.request_target() {
            if let Some(slot) = self.schedule.slot_of(target) {
                slot.outbound = Outbound::Requested;
            }
            log::trace!(target: targets::SCHEDULE, "Request work from rank {target}");
            self.transport.send(
                target,
                Message::WorkRequest {
                    urgency: Urgency::Normal,
                },
            );
        }
    }

    /// Whether the frontier holds a branch to spare.
    ///
    /// At least one queued decision stays local, and only an undecided decision at the very top
    /// detaches cleanly against the current compressed state.
    fn can_give_work(&self) -> bool {
        if self.context.tasks.nontrivial() < 2 {
            return false;
        }
        match self.context.tasks.peek() {
            Some(task @ Task::Assign(assignment)) if task.is_decision() => self
                .context
                .formula
                .value_of(assignment.literal.variable())
                .is_none(),
            _ => false,
        }
    }

    /// Grants frontier branches to requesters, urgent first, while work is spare.
    fn offer_work(&mut self) -> Result<(), ErrorKind> {
        loop {
            if !self.can_give_work() {
                return Ok(());
            }
            let Some(rank) = self.schedule.requesters().first().copied() else {
                return Ok(());
            };
            self.give_work(rank)?;
        }
    }

    /// Detaches the top frontier branch and grants it.
    fn give_work(&mut self, rank: usize) -> Result<(), ErrorKind> {
        let Some(Task::Assign(assignment)) = self.context.tasks.pop() else {
            return Err(ErrorKind::InvalidState);
        };
        let literal = assignment.literal;
        self.context
            .formula
            .variables
            .set_tag(literal.variable(), literal.polarity(), Tag::Stolen);
        let time = self.schedule.stamp_handoff();
        self.schedule.thieves.push(crate::dist::state::ThiefRecord {
            literal,
            rank,
            time,
        });

        let state = self.context.formula.compress()?;
        log::debug!(
            target: targets::SCHEDULE,
            "Give branch {literal} to rank {rank} ({} words)",
            state.len()
        );
        self.transport.send(
            rank,
            Message::WorkGrant(WorkUnit {
                state,
                branch: literal,
            }),
        );
        if let Some(slot) = self.schedule.slot_of(rank) {
            slot.status = NeighborStatus::Working;
        }
        Ok(())
    }

    /// Sends freshly learned clauses to every thief.
    fn share_learned_clauses(&mut self) {
        if self.context.learned_outbox.is_empty() {
            return;
        }
        let clauses = std::mem::take(&mut self.context.learned_outbox);
        for literals in clauses {
            for record in &self.schedule.thieves {
                self.transport
                    .send(record.rank, Message::ConflictClause(literals.clone()));
            }
        }
    }

    /// Stops with unsatisfiable once every avenue is urgently spent.
    fn implicit_abort(&mut self) {
        log::debug!(
            target: targets::SCHEDULE,
            "Rank {} implicit abort",
            self.transport.rank()
        );
        let notify: Vec<usize> = self
            .schedule
            .slots
            .iter()
            .filter(|slot| slot.outbound != Outbound::Urgent)
            .filter_map(|slot| slot.rank)
            .collect();
        for rank in notify {
            self.transport.send(rank, Message::Abort(Report::Unsatisfiable));
        }
        self.finished = Some(Report::Unsatisfiable);
    }

    /// Broadcasts an abort to every other rank.
    fn broadcast_abort(&self, report: Report) {
        for rank in 0..self.transport.rank_count() {
            if rank != self.transport.rank() {
                self.transport.send(rank, Message::Abort(report));
            }
        }
    }

    /// Forwards an abort to tree neighbours, except the rank it came from.
    fn cascade_abort(&self, report: Report, except: Option<usize>) {
        for slot in &self.schedule.slots {
            if let Some(rank) = slot.rank {
                if Some(rank) != except {
                    self.transport.send(rank, Message::Abort(report));
                }
            }
        }
    }

    /// Invalidates every thief: their units extend a state now known refuted.
    pub(crate) fn invalidate_thieves(&mut self) {
        let records = std::mem::take(&mut self.schedule.thieves);
        for record in records {
            log::debug!(
                target: targets::SCHEDULE,
                "Invalidate branch {} at rank {}",
                record.literal,
                record.rank
            );
            self.transport.send(
                record.rank,
                Message::Invalidate {
                    branch: record.literal,
                },
            );
        }
    }

    /// Discards the current unit if the invalidation names it; stale ones are ignored.
    fn handle_invalidate(&mut self, from: usize, branch: Literal) -> Result<(), ErrorKind> {
        if self.schedule.donor == Some(from) && self.schedule.branch == Some(branch) {
            log::debug!(
                target: targets::SCHEDULE,
                "Rank {} unit invalidated by rank {from}",
                self.transport.rank()
            );
            self.invalidate_thieves();
            self.retire_unit();
        }
        Ok(())
    }
}
