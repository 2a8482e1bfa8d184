/*!
Cooperation between workers: messages, transport, scheduling, and clause sharing.

Workers form a fixed tree, each rank owning its own context exclusively.
The only cross-worker notion is logical ownership of a decision subtree, which moves atomically:
the giver detaches and tags the branch before sending, and the receiver treats the reconstructed
unit as entirely its own.

- [message] defines the wire vocabulary and the [Transport](message::Transport) seam.
- [transport] carries messages over crossbeam channels, one inbox per rank.
- [state] holds the per-worker scheduling state: neighbor statuses, outbound requests, the work
  stash, and the thief records.
- [worker] runs the cooperative event loop.
- [clauses] assigns blame when a learned clause arrives over the wire.
*/

pub mod clauses;
pub mod message;
pub mod state;
pub mod transport;
pub mod worker;
