use core::fmt::Debug;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::Value;

/// Source of the random bits used for tie-breaks and round advances.
pub trait Coin: Debug + Send {
    fn flip(&mut self) -> Value;
}

impl Coin for Box<dyn Coin> {
    fn flip(&mut self) -> Value {
        (**self).flip()
    }
}

/// A fair coin backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct RandomCoin {
    rng: StdRng,
}

impl RandomCoin {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Coin for RandomCoin {
    fn flip(&mut self) -> Value {
        Value::from_bit(self.rng.gen())
    }
}

/// Replays a fixed sequence of outcomes, starting over when exhausted.
#[derive(Debug, Clone)]
pub struct FixedCoin {
    outcomes: Vec<Value>,
    next: usize,
}

impl FixedCoin {
    /// # Panics
    /// If `outcomes` is empty.
    pub fn new(outcomes: impl IntoIterator<Item = Value>) -> Self {
        let outcomes = Vec::from_iter(outcomes);
        assert!(!outcomes.is_empty(), "a fixed coin needs at least one outcome");
        Self { outcomes, next: 0 }
    }

    pub fn always(value: Value) -> Self {
        Self::new([value])
    }
}

impl Coin for FixedCoin {
    fn flip(&mut self) -> Value {
        let value = self.outcomes[self.next % self.outcomes.len()];
        self.next += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_coins_repeat() {
        let mut a = RandomCoin::seeded(42);
        let mut b = RandomCoin::seeded(42);
        let flips_a = Vec::from_iter(std::iter::repeat_with(|| a.flip()).take(64));
        let flips_b = Vec::from_iter(std::iter::repeat_with(|| b.flip()).take(64));
        assert_eq!(flips_a, flips_b);
        assert!(flips_a.contains(&Value::Zero));
        assert!(flips_a.contains(&Value::One));
    }

    #[test]
    fn test_fixed_coin_cycles() {
        let mut coin = FixedCoin::new([Value::One, Value::Zero]);
        assert_eq!(coin.flip(), Value::One);
        assert_eq!(coin.flip(), Value::Zero);
        assert_eq!(coin.flip(), Value::One);
    }

    #[test]
    fn test_boxed_coin() {
        let mut coin: Box<dyn Coin> = Box::new(FixedCoin::always(Value::Zero));
        assert_eq!(coin.flip(), Value::Zero);
    }
}
