/*!
Per-worker scheduling state.

Each worker tracks one [Slot] per tree neighbour, pairing what the neighbour last told us (its
[NeighborStatus]) with what we last asked of it (our [Outbound] request).
The root holds a virtual parent slot, permanently urgent, so the escalation and termination
arithmetic is uniform across ranks.

The state is a plain owned struct, passed by exclusive reference into each handler; nothing here
is shared between workers.
*/

use crate::{
    compress::WorkUnit,
    structures::literal::Literal,
};

/// What a neighbour last told us about its need for work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeighborStatus {
    /// Working, or at least not asking.
    Working,

    /// Asked for work.
    Requesting,

    /// Asked urgently: it has exhausted every other avenue.
    Urgent,
}

/// What we last asked of a neighbour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outbound {
    /// Nothing pending.
    None,

    /// A normal request.
    Requested,

    /// An urgent request.
    Urgent,
}

/// One tree neighbour.
#[derive(Clone, Copy, Debug)]
pub struct Slot {
    /// The neighbour's rank, `None` for the root's virtual parent.
    pub rank: Option<usize>,

    /// What the neighbour last told us.
    pub status: NeighborStatus,

    /// What we last asked of it.
    pub outbound: Outbound,
}

/// A branch handed to another worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThiefRecord {
    /// The decision branch given away.
    pub literal: Literal,

    /// The rank it went to.
    pub rank: usize,

    /// Local handoff order.
    pub time: u32,
}

/// The fixed tree around one rank.
#[derive(Clone, Copy, Debug)]
pub struct Topology {
    pub rank: usize,
    pub count: usize,
    pub branching: usize,
}

impl Topology {
    /// The parent rank, `None` at the root.
    pub fn parent(&self) -> Option<usize> {
        match self.rank {
            0 => None,
            rank => Some((rank - 1) / self.branching),
        }
    }

    /// The child ranks which exist.
    pub fn children(&self) -> Vec<usize> {
        (1..=self.branching)
            .map(|offset| self.rank * self.branching + offset)
            .filter(|child| *child < self.count)
            .collect()
    }
}

/// The scheduling state of one worker.
#[derive(Clone, Debug)]
pub struct ScheduleState {
    /// The tree around this rank.
    pub topology: Topology,

    /// One slot per neighbour, parent first.
    pub slots: Vec<Slot>,

    /// Work granted while busy, with its donor rank, kept for when the current unit is spent.
    pub stash: Vec<(usize, WorkUnit)>,

    /// Branches handed to other workers, in handoff order.
    pub thieves: Vec<ThiefRecord>,

    /// Handoff order counter.
    pub handoff_clock: u32,

    /// The rank which granted the current work unit, if any.
    pub donor: Option<usize>,

    /// The frontier branch of the current work unit, if granted.
    pub branch: Option<Literal>,
}

impl ScheduleState {
    /// The state of a fresh worker at `rank`.
    ///
    /// Children begin as requesting, since they start with no work; the root's virtual parent
    /// begins urgent, having no work to offer by construction.
    pub fn new(rank: usize, count: usize, branching: usize) -> Self {
        let topology = Topology {
            rank,
            count,
            branching,
        };
        let mut slots = vec![Slot {
            rank: topology.parent(),
            status: match topology.parent() {
                Some(_) => NeighborStatus::Working,
                None => NeighborStatus::Urgent,
            },
            outbound: Outbound::None,
        }];
        for child in topology.children() {
            slots.push(Slot {
                rank: Some(child),
                status: NeighborStatus::Requesting,
                outbound: Outbound::None,
            });
        }

        ScheduleState {
            topology,
            slots,
            stash: Vec::default(),
            thieves: Vec::default(),
            handoff_clock: 0,
            donor: None,
            branch: None,
        }
    }

    /// The slot of a neighbour, by rank.
    pub fn slot_of(&mut self, rank: usize) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|slot| slot.rank == Some(rank))
    }

    /// Whether every neighbour, the virtual parent included, is urgently out of work.
    pub fn all_urgent(&self) -> bool {
        self.slots
            .iter()
            .all(|slot| slot.status == NeighborStatus::Urgent)
    }

    /// Ranks of neighbours which have asked for work, urgent first.
    pub fn requesters(&self) -> Vec<usize> {
        let mut ranks: Vec<usize> = self
            .slots
            .iter()
            .filter(|slot| slot.status == NeighborStatus::Urgent)
            .filter_map(|slot| slot.rank)
            .collect();
        ranks.extend(
            self.slots
                .iter()
                .filter(|slot| slot.status == NeighborStatus::Requesting)
                .filter_map(|slot| slot.rank),
        );
        ranks
    }

    /// The single neighbour left to escalate to, once every other slot is urgent.
    pub fn escalation_target(&self) -> Option<usize> {
        let mut open = self
            .slots
            .iter()
            .filter(|slot| slot.status != NeighborStatus::Urgent);
        let candidate = open.next()?;
        match open.next() {
            Some(_) => None,
            None => candidate.rank,
        }
    }

    /// A neighbour to send a normal request to, parent preferred, if any remains unasked.
    pub fn request_target(&self) -> Option<usize> {
        self.slots
            .iter()
            .find(|slot| {
                slot.rank.is_some()
                    && slot.status != NeighborStatus::Urgent
                    && slot.outbound == Outbound::None
            })
            .and_then(|slot| slot.rank)
    }

    /// Records a fresh handoff, returning its order stamp.
    pub fn stamp_handoff(&mut self) -> u32 {
        self.handoff_clock += 1;
        self.handoff_clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_tree_ranks() {
        let topology = Topology {
            rank: 1,
            count: 7,
            branching: 2,
        };
        assert_eq!(topology.parent(), Some(0));
        assert_eq!(topology.children(), vec![3, 4]);

        let leaf = Topology {
            rank: 5,
            count: 7,
            branching: 2,
        };
        assert_eq!(leaf.parent(), Some(2));
        assert!(leaf.children().is_empty());
    }

    #[test]
    fn root_virtual_parent_is_urgent() {
        let state = ScheduleState::new(0, 3, 2);
        assert_eq!(state.slots[0].rank, None);
        assert_eq!(state.slots[0].status, NeighborStatus::Urgent);
        assert!(!state.all_urgent());
    }

    #[test]
    fn escalation_waits_for_a_single_open_slot() {
        let mut state = ScheduleState::new(0, 3, 2);
        assert_eq!(state.escalation_target(), None);

        if let Some(slot) = state.slot_of(1) {
            slot.status = NeighborStatus::Urgent;
        }
        assert_eq!(state.escalation_target(), Some(2));

        if let Some(slot) = state.slot_of(2) {
            slot.status = NeighborStatus::Urgent;
        }
        assert_eq!(state.escalation_target(), None);
        assert!(state.all_urgent());
    }

    #[test]
    fn requesters_put_urgent_first() {
        let mut state = ScheduleState::new(0, 3, 2);
        if let Some(slot) = state.slot_of(2) {
            slot.status = NeighborStatus::Urgent;
        }
        assert_eq!(state.requesters(), vec![2, 1]);
    }
}
