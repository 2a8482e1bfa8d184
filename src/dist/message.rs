/*!
The wire vocabulary of cooperating workers, and the transport seam.

Every message travels inside an [Envelope] carrying the sender's rank, so a receiver can decode
kind and origin from the envelope alone.
Delivery is assumed reliable; ordering between different senders is not relied on, and the
handlers tolerate clauses and invalidations which arrive after their subject was already
discarded.
*/

use crate::{compress::WorkUnit, reports::Report, structures::literal::Literal};

/// How pressing a work request is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Urgency {
    /// An ordinary request from an idle worker.
    Normal,

    /// The requester has exhausted every other avenue.
    Urgent,

    /// Escalates an earlier normal request already held by the receiver.
    Upgrade,
}

/// A message between workers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// A request for work.
    WorkRequest { urgency: Urgency },

    /// A detached subtree for the receiver to own.
    WorkGrant(WorkUnit),

    /// A learned clause, for the receiver's own blame check.
    ConflictClause(Vec<Literal>),

    /// The receiver's work unit rooted at `branch` is refuted; discard it.
    Invalidate { branch: Literal },

    /// The sender finished with the given report; stop.
    Abort(Report),
}

/// A message paired with its sender's rank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub from: usize,
    pub message: Message,
}

/// Point-to-point transport between ranks.
///
/// Sends are asynchronous and must not block; a send to a rank which has already shut down is
/// silently dropped, as it can only happen once the solve is decided.
pub trait Transport {
    /// The rank of this endpoint.
    fn rank(&self) -> usize;

    /// The count of ranks.
    fn rank_count(&self) -> usize;

    /// Sends a message to the rank.
    fn send(&self, to: usize, message: Message);

    /// Receives a pending message, without blocking.
    fn try_recv(&mut self) -> Option<Envelope>;
}
