use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("A group needs at least one member and fewer faults than members (n: {n}, f: {f})")]
    InvalidGroup { n: usize, f: usize },
    #[error("Expected one initial value per member: {expected} != {got}")]
    InitialValuesMismatch { expected: usize, got: usize },
    #[error("Node {0} is not a member of this group")]
    UnknownPeer(NodeId),
    #[error("The inbound queue of node {0} is closed")]
    ChannelClosed(NodeId),
    #[error("Failed to encode with bincode")]
    Encoding(#[from] bincode::Error),
    #[error("The group was torn down before every member became ready")]
    NotReady,
    #[error("Timed out waiting for the group to decide")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, Error>;
