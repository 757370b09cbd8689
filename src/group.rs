use std::ops::Range;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{Error, NodeId, Result};

/// Membership and fault bound shared by every engine in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    n: usize,
    f: usize,
}

impl Group {
    pub fn new(n: usize, f: usize) -> Result<Self> {
        if n == 0 || f >= n {
            return Err(Error::InvalidGroup { n, f });
        }
        if n <= 3 * f {
            warn!("[GROUP] n = {n} does not exceed 3f = {}, agreement is not guaranteed", 3 * f);
        }
        Ok(Self { n, f })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn faults(&self) -> usize {
        self.f
    }

    /// `n - f`: messages needed before a phase may act.
    pub fn quorum(&self) -> usize {
        self.n - self.f
    }

    /// `f + 1`: matching votes needed to decide.
    pub fn super_quorum(&self) -> usize {
        self.f + 1
    }

    /// Whether `count` is strictly more than half of `n`.
    pub fn is_majority(&self, count: usize) -> bool {
        2 * count > self.n
    }

    pub fn members(&self) -> Range<NodeId> {
        0..self.n
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id < self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_for_four_nodes() {
        let group = Group::new(4, 1).unwrap();
        assert_eq!(group.quorum(), 3);
        assert_eq!(group.super_quorum(), 2);
        assert!(!group.is_majority(2));
        assert!(group.is_majority(3));
        assert_eq!(group.members().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_majority_with_odd_group() {
        let group = Group::new(5, 1).unwrap();
        assert!(!group.is_majority(2));
        assert!(group.is_majority(3));
    }

    #[test]
    fn test_reject_degenerate_groups() {
        assert!(matches!(
            Group::new(0, 0),
            Err(Error::InvalidGroup { n: 0, f: 0 })
        ));
        assert!(matches!(
            Group::new(3, 3),
            Err(Error::InvalidGroup { n: 3, f: 3 })
        ));
        // over the Byzantine bound is allowed, it only warns
        assert!(Group::new(10, 5).is_ok());
    }

    #[test]
    fn test_contains() {
        let group = Group::new(3, 0).unwrap();
        assert!(group.contains(2));
        assert!(!group.contains(3));
    }
}
