use core::fmt::Debug;
use serde::{Deserialize, Serialize};

use crate::{Estimate, Result, Round};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Propose,
    Vote,
}

/// A protocol message. Every message is sent to each member of the group,
/// the sender included.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    pub round: Round,
    pub value: Estimate,
    pub kind: Kind,
}

impl Message {
    pub fn propose(round: Round, value: impl Into<Estimate>) -> Self {
        Self {
            round,
            value: value.into(),
            kind: Kind::Propose,
        }
    }

    pub fn vote(round: Round, value: impl Into<Estimate>) -> Self {
        Self {
            round,
            value: value.into(),
            kind: Kind::Vote,
        }
    }

    pub fn kind_str(&self) -> &str {
        match self.kind {
            Kind::Propose => "propose",
            Kind::Vote => "vote",
        }
    }

    /// Encodes the message for the wire.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a message received from the wire. Anything that does not
    /// parse as a message, including unknown kinds, is an error.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(k={}, x={:?})", self.kind_str(), self.round, self.value)
    }
}
