use core::fmt::Debug;
use serde::{Deserialize, Serialize};

/// A binary value. This is what processes agree on.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Value {
    Zero,
    One,
}

impl Value {
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Value::One
        } else {
            Value::Zero
        }
    }

    pub fn to_bit(self) -> bool {
        self == Value::One
    }

    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Value::Zero => Value::One,
            Value::One => Value::Zero,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Zero => write!(f, "0"),
            Value::One => write!(f, "1"),
        }
    }
}

/// An entry in a proposal or vote tally.
///
/// `Unknown` is the placeholder a peer may send instead of a bit. It counts
/// towards the quorum size of a round but never towards either value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Estimate {
    Value(Value),
    Unknown,
}

impl Estimate {
    pub fn zero() -> Self {
        Self::Value(Value::Zero)
    }

    pub fn one() -> Self {
        Self::Value(Value::One)
    }

    pub fn value(self) -> Option<Value> {
        match self {
            Estimate::Value(v) => Some(v),
            Estimate::Unknown => None,
        }
    }
}

impl From<Value> for Estimate {
    fn from(value: Value) -> Self {
        Estimate::Value(value)
    }
}

impl Debug for Estimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Estimate::Value(v) => write!(f, "{:?}", v),
            Estimate::Unknown => write!(f, "?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_flips_the_bit() {
        assert_eq!(Value::Zero.other(), Value::One);
        assert_eq!(Value::One.other(), Value::Zero);
        assert_eq!(Value::from_bit(true), Value::One);
        assert!(!Value::Zero.to_bit());
    }

    #[test]
    fn test_unknown_estimate_has_no_value() {
        assert_eq!(Estimate::Unknown.value(), None);
        assert_eq!(Estimate::one().value(), Some(Value::One));
        assert_eq!(format!("{:?}", Estimate::Unknown), "?");
        assert_eq!(format!("{:?}", Estimate::from(Value::Zero)), "0");
    }
}
