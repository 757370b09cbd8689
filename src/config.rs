use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{ConsensusEngine, Error, Group, NodeId, RandomCoin, Result, Value};

/// Describes one run of the protocol: the group, what each member starts
/// with, which members are faulty and how coins are seeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub n: usize,
    pub f: usize,
    pub initial_values: Vec<Value>,
    #[serde(default)]
    pub faulty: BTreeSet<NodeId>,
    /// Member `i` flips a coin seeded with `seed + i`. Without a seed the
    /// coins draw from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    /// Every member starts with zero and no member is faulty.
    pub fn new(n: usize, f: usize) -> Self {
        Self {
            n,
            f,
            initial_values: vec![Value::Zero; n],
            faulty: BTreeSet::new(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_initial_values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.initial_values = Vec::from_iter(values);
        self
    }

    #[must_use]
    pub fn with_faulty(mut self, faulty: impl IntoIterator<Item = NodeId>) -> Self {
        self.faulty = BTreeSet::from_iter(faulty);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<Group> {
        let group = Group::new(self.n, self.f)?;
        if self.initial_values.len() != self.n {
            return Err(Error::InitialValuesMismatch {
                expected: self.n,
                got: self.initial_values.len(),
            });
        }
        if let Some(id) = self.faulty.iter().find(|id| !group.contains(**id)) {
            return Err(Error::UnknownPeer(*id));
        }
        Ok(group)
    }

    pub fn is_faulty(&self, id: NodeId) -> bool {
        self.faulty.contains(&id)
    }

    pub fn coin_for(&self, id: NodeId) -> RandomCoin {
        match self.seed {
            Some(seed) => RandomCoin::seeded(seed.wrapping_add(id as u64)),
            None => RandomCoin::from_entropy(),
        }
    }

    /// Builds one engine per member.
    pub fn engines(&self) -> Result<Vec<ConsensusEngine>> {
        let group = self.validate()?;
        Ok(Vec::from_iter(group.members().map(|id| {
            ConsensusEngine::new(
                id,
                group,
                self.initial_values[id],
                self.is_faulty(id),
                self.coin_for(id),
            )
        })))
    }
}
