/*!
Blame assignment for clauses learned elsewhere.

Every learned clause is a resolvent of original clauses, so it holds everywhere; what differs
per worker is what the clause says about the worker's current search.
On receipt the clause is checked against the local valuation and the residence tags of its
falsifying assignments:

- Satisfied, already known, or refuting nothing traceable: discard.
- Fully falsified with a locally-made culprit: a genuine conflict, handled by backjump exactly
  as a locally-detected one.
- Fully falsified with only remotely-granted culprits: the current work unit is refuted at its
  root; discard it, send the clause on to the donor, whose own blame check takes over, and
  invalidate every thief, whose units extend the refuted state.
- Asserting against a branch handed to a thief: the thief's unit is refuted; invalidate the
  holders and forward the clause to the remaining thieves.

Local culprits take priority, then remote over stolen.
Clauses the database stores are forwarded to thieves, whose states extend this worker's; the
store-before-forward rule plus the duplicate check bounds the traffic.
*/

use rand::Rng;

use crate::{
    db::variable::Tag,
    dist::{message::Message, message::Transport, worker::Worker},
    misc::log::targets,
    structures::literal::Literal,
    types::err::ErrorKind,
};

/// What a received clause says about the local search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Standing {
    /// Satisfied, or refuting nothing traceable.
    Vacuous,

    /// Fully falsified, with a local assignment among the culprits.
    ConflictLocal,

    /// Fully falsified, culprits only in the remotely-granted root.
    ConflictRemote,

    /// One literal open, its refuting branch handed to a thief.
    AssertsAgainstStolen(Literal),

    /// Consistent with the current valuation; worth storing, nothing to undo.
    Informative,
}

impl<R: Rng, T: Transport> Worker<R, T> {
    /// Handles a clause learned by another worker.
    pub fn handle_conflict_clause(
        &mut self,
        from: usize,
        literals: Vec<Literal>,
    ) -> Result<(), ErrorKind> {
        if self.context.formula.clauses.contains_learned(&literals) {
            return Ok(());
        }

        match self.standing_of(&literals) {
            Standing::Vacuous => {
                log::trace!(target: targets::CONFLICT, "Discard clause from rank {from}");
                Ok(())
            }

            Standing::ConflictLocal => {
                log::debug!(target: targets::CONFLICT, "Clause from rank {from} convicts local history");
                // The falsified clause is not yet stored, so the backjump target is computed
                // from its literals directly; learn_from would re-derive the same clause.
                let depths = self.falsified_depths(&literals);
                let target = if depths.len() > 1 { depths[1] } else { 0 };
                if depths.first() == Some(&0) {
                    self.retire_unit();
                    return Ok(());
                }
                if self.context.formula.clauses.conflict_capacity() == 0 {
                    // A backjump lands on the stored clause forcing its asserting literal;
                    // with no room to store it, the conflict is left to ordinary search.
                    log::trace!(
                        target: targets::CONFLICT,
                        "No capacity for clause from rank {from}, leaving to local search"
                    );
                    return Ok(());
                }
                self.context.unwind_to(target)?;
                self.store_and_forward(literals)?;
                Ok(())
            }

            Standing::ConflictRemote => {
                log::debug!(
                    target: targets::CONFLICT,
                    "Clause from rank {from} convicts granted root, returning to donor"
                );
                if let Some(donor) = self.schedule.donor {
                    self.transport.send(donor, Message::ConflictClause(literals));
                }
                self.invalidate_thieves();
                self.retire_unit();
                Ok(())
            }

            Standing::AssertsAgainstStolen(branch) => {
                let (holders, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.schedule.thieves)
                    .into_iter()
                    .partition(|record| record.literal == branch);
                for record in holders {
                    log::debug!(
                        target: targets::CONFLICT,
                        "Invalidate stolen branch {} at rank {}",
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
                self.schedule.thieves = rest;
                self.store_and_forward(literals)?;
                Ok(())
            }

            Standing::Informative => self.store_and_forward(literals),
        }
    }

    /// Classifies a received clause against the local valuation and tags.
    fn standing_of(&self, literals: &[Literal]) -> Standing {
        let variables = &self.context.formula.variables;
        let mut open: Vec<Literal> = Vec::default();
        for literal in literals {
            match self.context.formula.value_of(literal.variable()) {
                Some(value) if value == literal.polarity() => return Standing::Vacuous,
                Some(_) => {}
                None => open.push(*literal),
            }
        }

        if open.is_empty() {
            // Priority among culprits: local history first, then the granted root.
            let mut remote = false;
            for literal in literals {
                match variables.tag(literal.variable(), !literal.polarity()) {
                    Tag::Local => return Standing::ConflictLocal,
                    Tag::Remote => remote = true,
                    _ => {}
                }
            }
            return match remote {
                true => Standing::ConflictRemote,
                false => Standing::Vacuous,
            };
        }

        if let [single] = open[..] {
            let refuting = single.negate();
            if variables.tag(refuting.variable(), refuting.polarity()) == Tag::Stolen {
                return Standing::AssertsAgainstStolen(refuting);
            }
        }
        Standing::Informative
    }

    /// Depths of the falsifying assignments, descending.
    fn falsified_depths(&self, literals: &[Literal]) -> Vec<crate::db::DepthIndex> {
        let mut depths: Vec<_> = literals
            .iter()
            .filter_map(|literal| self.context.formula.variables.depth_of(literal.variable()))
            .collect();
        depths.sort_unstable_by(|a, b| b.cmp(a));
        depths
    }

    /// Stores the clause if capacity remains, forwarding stored clauses to every thief.
    fn store_and_forward(&mut self, literals: Vec<Literal>) -> Result<(), ErrorKind> {
        if self
            .context
            .formula
            .insert_conflict_clause(literals.clone())?
            .is_some()
        {
            self.context.counters.learned += 1;
            for record in &self.schedule.thieves {
                self.transport
                    .send(record.rank, Message::ConflictClause(literals.clone()));
            }
        }
        Ok(())
    }
}
