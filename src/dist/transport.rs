/*!
Channel-backed transport.

A grid of unbounded crossbeam channels, one inbox per rank, with every endpoint holding a sender
to every inbox.
Moving a message into a channel transfers ownership of its buffers with it, so nothing here
needs a pending-send queue; a buffer lives exactly as long as the message does.
*/

use crossbeam::channel::{unbounded, Receiver, Sender};

use crate::dist::message::{Envelope, Message, Transport};

/// One rank's endpoint of a channel grid.
pub struct ChannelTransport {
    rank: usize,
    peers: Vec<Sender<Envelope>>,
    inbox: Receiver<Envelope>,
}

impl ChannelTransport {
    /// Endpoints for `count` ranks, fully connected.
    pub fn grid(count: usize) -> Vec<ChannelTransport> {
        let mut senders = Vec::with_capacity(count);
        let mut inboxes = Vec::with_capacity(count);
        for _ in 0..count {
            let (sender, receiver) = unbounded();
            senders.push(sender);
            inboxes.push(receiver);
        }

        inboxes
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| ChannelTransport {
                rank,
                peers: senders.clone(),
                inbox,
            })
            .collect()
    }
}

impl Transport for ChannelTransport {
    fn rank(&self) -> usize {
        self.rank
    }

    fn rank_count(&self) -> usize {
        self.peers.len()
    }

    fn send(&self, to: usize, message: Message) {
        // A closed inbox means the receiver already stopped; nothing to deliver to.
        let _ = self.peers[to].send(Envelope {
            from: self.rank,
            message,
        });
    }

    fn try_recv(&mut self) -> Option<Envelope> {
        self.inbox.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::Report;

    #[test]
    fn grid_delivers_with_sender_rank() {
        let mut endpoints = ChannelTransport::grid(3);
        endpoints[2].send(0, Message::Abort(Report::Satisfiable));

        let envelope = endpoints[0].try_recv().unwrap();
        assert_eq!(envelope.from, 2);
        assert_eq!(envelope.message, Message::Abort(Report::Satisfiable));
        assert!(endpoints[1].try_recv().is_none());
    }
}
