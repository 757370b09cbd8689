use crate::{Message, NodeId};

/// Outbound traffic produced while handling input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    /// Send to every member of the group, the sender included.
    Broadcast(Message),
}

impl Outgoing {
    pub fn message(&self) -> &Message {
        match self {
            Outgoing::Broadcast(msg) => msg,
        }
    }
}

// Broadcaster queues the messages an engine wants sent until the transport
// takes them.
#[derive(Debug)]
pub struct Broadcaster {
    self_id: NodeId,
    outgoings: Vec<Outgoing>,
}

impl Broadcaster {
    pub fn new(self_id: NodeId) -> Self {
        Self {
            self_id,
            outgoings: Vec::new(),
        }
    }

    pub fn self_id(&self) -> NodeId {
        self.self_id
    }

    pub fn broadcast(&mut self, msg: Message) {
        log::debug!("[NODE-{}] broadcasting {:?}", self.self_id, msg);
        self.outgoings.push(Outgoing::Broadcast(msg));
    }

    pub fn take_outgoings(&mut self) -> Vec<Outgoing> {
        std::mem::take(&mut self.outgoings)
    }

    pub fn has_broadcast_message(&self, msg: &Message) -> bool {
        self.outgoings
            .iter()
            .any(|out| matches!(out, Outgoing::Broadcast(m) if m == msg))
    }

    pub fn is_empty(&self) -> bool {
        self.outgoings.is_empty()
    }
}
