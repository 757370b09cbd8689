use serde::{Deserialize, Serialize};

use crate::{Round, Value};

/// Snapshot of an engine's externally visible state.
///
/// A faulty engine reports `None` for `x`, `decided` and `k` for its whole
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    pub killed: bool,
    pub x: Option<Value>,
    pub decided: Option<bool>,
    pub k: Option<Round>,
}

impl NodeState {
    pub fn correct(initial: Value) -> Self {
        Self {
            killed: false,
            x: Some(initial),
            decided: Some(false),
            k: Some(0),
        }
    }

    pub fn faulty() -> Self {
        Self {
            killed: false,
            x: None,
            decided: None,
            k: None,
        }
    }

    pub fn is_decided(&self) -> bool {
        self.decided == Some(true)
    }

    /// The decided value, if any.
    pub fn decision(&self) -> Option<Value> {
        if self.is_decided() {
            self.x
        } else {
            None
        }
    }
}

/// Liveness indicator for the supervisor. Not consulted by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Live,
    Faulty,
}

impl Status {
    pub fn is_live(&self) -> bool {
        matches!(self, Status::Live)
    }
}
