use std::collections::BTreeMap;

use crate::{Estimate, Round, Value};

/// Count of the binary values in one round's log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub zeros: usize,
    pub ones: usize,
    pub unknown: usize,
}

impl Tally {
    pub fn count(&self, value: Value) -> usize {
        match value {
            Value::Zero => self.zeros,
            Value::One => self.ones,
        }
    }

    pub fn total(&self) -> usize {
        self.zeros + self.ones + self.unknown
    }
}

#[derive(Debug, Default)]
struct Entry {
    received: Vec<Estimate>,
    fired: bool,
}

/// Values received per round for one phase (proposals or votes).
///
/// Entries are append-only. Each round carries a one-shot latch so the
/// phase acts on a quorum exactly once, however many late messages follow.
#[derive(Debug, Default)]
pub struct RoundLog {
    rounds: BTreeMap<Round, Entry>,
}

impl RoundLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `estimate` to `round` and returns the round's new size.
    pub fn record(&mut self, round: Round, estimate: Estimate) -> usize {
        let entry = self.rounds.entry(round).or_default();
        entry.received.push(estimate);
        entry.received.len()
    }

    pub fn len(&self, round: Round) -> usize {
        self.rounds.get(&round).map_or(0, |e| e.received.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn tally(&self, round: Round) -> Tally {
        let mut tally = Tally::default();
        for estimate in self.rounds.get(&round).into_iter().flat_map(|e| &e.received) {
            match estimate {
                Estimate::Value(Value::Zero) => tally.zeros += 1,
                Estimate::Value(Value::One) => tally.ones += 1,
                Estimate::Unknown => tally.unknown += 1,
            }
        }
        tally
    }

    /// Closes the latch for `round`. Returns `true` only the first time.
    pub fn fire(&mut self, round: Round) -> bool {
        let entry = self.rounds.entry(round).or_default();
        !std::mem::replace(&mut entry.fired, true)
    }

    pub fn has_fired(&self, round: Round) -> bool {
        self.rounds.get(&round).map_or(false, |e| e.fired)
    }

    pub fn rounds(&self) -> impl Iterator<Item = Round> + '_ {
        self.rounds.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_ignores_unknown_for_values() {
        let mut log = RoundLog::new();
        log.record(0, Estimate::zero());
        log.record(0, Estimate::Unknown);
        log.record(0, Estimate::one());
        assert_eq!(log.record(0, Estimate::one()), 4);

        let tally = log.tally(0);
        assert_eq!(tally.count(Value::Zero), 1);
        assert_eq!(tally.count(Value::One), 2);
        assert_eq!(tally.unknown, 1);
        assert_eq!(tally.total(), log.len(0));
    }

    #[test]
    fn test_rounds_are_independent() {
        let mut log = RoundLog::new();
        log.record(0, Estimate::zero());
        log.record(1, Estimate::one());
        assert_eq!(log.len(0), 1);
        assert_eq!(log.len(1), 1);
        assert_eq!(log.len(2), 0);
        assert_eq!(log.tally(2), Tally::default());
        assert_eq!(log.rounds().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_latch_fires_once_per_round() {
        let mut log = RoundLog::new();
        assert!(!log.has_fired(3));
        assert!(log.fire(3));
        assert!(!log.fire(3));
        assert!(log.has_fired(3));
        assert!(log.fire(4));
    }

    #[test]
    fn test_late_messages_are_kept_after_firing() {
        let mut log = RoundLog::new();
        log.record(0, Estimate::one());
        assert!(log.fire(0));
        assert_eq!(log.record(0, Estimate::one()), 2);
        assert!(log.has_fired(0));
    }
}
