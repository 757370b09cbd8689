//! Randomized binary Byzantine agreement in the style of Ben-Or.
//!
//! A fixed group of `n` processes, up to `f` of which may be faulty, agree on a
//! single bit. Each round has a propose phase and a vote phase; a process
//! decides once `f + 1` matching votes arrive in a quorum of `n - f`, and
//! otherwise starts the next round with a fresh coin flip.
//!
//! [`ConsensusEngine`] is the sans-io protocol core. [`Supervisor`] runs a
//! whole group on tokio tasks wired together by an in-process [`LocalChannel`].

pub mod broadcaster;
pub mod channel;
pub mod coin;
pub mod config;
pub mod engine;
pub mod error;
pub mod group;
pub mod message;
pub mod readiness;
pub mod state;
pub mod supervisor;
pub mod tally;
pub mod value;

pub use crate::broadcaster::{Broadcaster, Outgoing};
pub use crate::channel::{LocalChannel, MessageChannel};
pub use crate::coin::{Coin, FixedCoin, RandomCoin};
pub use crate::config::Config;
pub use crate::engine::ConsensusEngine;
pub use crate::error::{Error, Result};
pub use crate::group::Group;
pub use crate::message::{Kind, Message};
pub use crate::readiness::{Readiness, ReadinessNotifier};
pub use crate::state::{NodeState, Status};
pub use crate::supervisor::{NodeHandle, Supervisor};
pub use crate::tally::{RoundLog, Tally};
pub use crate::value::{Estimate, Value};

/// Index of a process within the group, in `[0, n)`.
pub type NodeId = usize;

/// Round number; one propose/vote cycle.
pub type Round = u64;
