use log::warn;
use tokio::sync::mpsc::UnboundedSender;

use crate::{Error, Group, Message, NodeId, Outgoing, Result};

/// Point-to-point delivery of protocol messages to a member of the group.
///
/// Delivery is fire-and-forget: `send` reports whether the message was
/// handed over, never whether it was processed, and callers do not retry.
pub trait MessageChannel: Send + Sync {
    fn send(&self, dest: NodeId, msg: &Message) -> Result<()>;
}

/// In-process transport. Peer `i` is reached through the `i`-th sender,
/// which carries wire-encoded messages to that peer's inbound queue.
#[derive(Debug, Clone)]
pub struct LocalChannel {
    peers: Vec<UnboundedSender<Vec<u8>>>,
}

impl LocalChannel {
    pub fn new(peers: Vec<UnboundedSender<Vec<u8>>>) -> Self {
        Self { peers }
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Hands raw bytes to `dest`, bypassing the codec.
    pub fn send_raw(&self, dest: NodeId, bytes: Vec<u8>) -> Result<()> {
        let peer = self.peers.get(dest).ok_or(Error::UnknownPeer(dest))?;
        peer.send(bytes).map_err(|_| Error::ChannelClosed(dest))
    }
}

impl MessageChannel for LocalChannel {
    fn send(&self, dest: NodeId, msg: &Message) -> Result<()> {
        self.send_raw(dest, msg.encode()?)
    }
}

/// Sends each outgoing message to every member of `group`. Failures are
/// logged and dropped; later rounds re-broadcast anyway.
pub fn dispatch(
    channel: &impl MessageChannel,
    source: NodeId,
    group: Group,
    outgoings: impl IntoIterator<Item = Outgoing>,
) {
    for outgoing in outgoings {
        let Outgoing::Broadcast(msg) = outgoing;
        for dest in group.members() {
            if let Err(err) = channel.send(dest, &msg) {
                warn!("[NODE-{source}] failed to send {msg:?} to {dest}: {err}");
            }
        }
    }
}
