//! Core types and data structures for the reconciliation system

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric value that can take part in a subset-sum reconciliation.
///
/// Sums are built in a wider `Sum` type and compared against the widened
/// target with exact equality. Integer and `BigDecimal` amounts are exact;
/// floats are compared exactly after summation in `f64`, so money should be
/// carried as `BigDecimal`.
pub trait Amount: Clone + PartialEq + fmt::Debug {
    /// Accumulator used while summing a combination
    type Sum: Clone + PartialEq + fmt::Debug;

    /// Empty sum
    fn zero_sum() -> Self::Sum;

    /// Convert a single value into the accumulator type
    fn widen(&self) -> Self::Sum;

    /// Add `self` to `sum`, returning `None` when the result is not representable
    fn accumulate(&self, sum: &Self::Sum) -> Option<Self::Sum>;

    /// Check that the value is usable in a sum (e.g. finite for floats)
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Whether the amount is below zero
    fn is_negative(&self) -> bool;
}

macro_rules! impl_amount_widening {
    ($($t:ty => |$v:ident| $negative:expr),* $(,)?) => {
        $(
            impl Amount for $t {
                type Sum = i128;

                fn zero_sum() -> i128 {
                    0
                }

                fn widen(&self) -> i128 {
                    *self as i128
                }

                fn accumulate(&self, sum: &i128) -> Option<i128> {
                    sum.checked_add(*self as i128)
                }

                fn is_negative(&self) -> bool {
                    let $v = *self;
                    $negative
                }
            }
        )*
    };
}

impl_amount_widening!(
    i8 => |v| v < 0,
    i16 => |v| v < 0,
    i32 => |v| v < 0,
    i64 => |v| v < 0,
    isize => |v| v < 0,
    u8 => |_v| false,
    u16 => |_v| false,
    u32 => |_v| false,
    u64 => |_v| false,
    usize => |_v| false,
);

// 128-bit values have no wider native type, so their sums are kept exact
// in BigDecimal.
macro_rules! impl_amount_decimal_sum {
    ($($t:ty => |$v:ident| $negative:expr),* $(,)?) => {
        $(
            impl Amount for $t {
                type Sum = BigDecimal;

                fn zero_sum() -> BigDecimal {
                    BigDecimal::from(0)
                }

                fn widen(&self) -> BigDecimal {
                    BigDecimal::from(*self)
                }

                fn accumulate(&self, sum: &BigDecimal) -> Option<BigDecimal> {
                    Some(sum + BigDecimal::from(*self))
                }

                fn is_negative(&self) -> bool {
                    let $v = *self;
                    $negative
                }
            }
        )*
    };
}

impl_amount_decimal_sum!(
    i128 => |v| v < 0,
    u128 => |_v| false,
);

macro_rules! impl_amount_for_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl Amount for $t {
                type Sum = f64;

                fn zero_sum() -> f64 {
                    0.0
                }

                fn widen(&self) -> f64 {
                    f64::from(*self)
                }

                fn accumulate(&self, sum: &f64) -> Option<f64> {
                    let next = sum + f64::from(*self);
                    next.is_finite().then_some(next)
                }

                fn validate(&self) -> Result<(), String> {
                    if self.is_finite() {
                        Ok(())
                    } else {
                        Err(format!("{} is not a finite number", self))
                    }
                }

                fn is_negative(&self) -> bool {
                    *self < 0.0
                }
            }
        )*
    };
}

impl_amount_for_float!(f32, f64);

impl Amount for BigDecimal {
    type Sum = BigDecimal;

    fn zero_sum() -> BigDecimal {
        BigDecimal::from(0)
    }

    fn widen(&self) -> BigDecimal {
        self.clone()
    }

    fn accumulate(&self, sum: &BigDecimal) -> Option<BigDecimal> {
        Some(sum + self)
    }

    fn is_negative(&self) -> bool {
        *self < BigDecimal::from(0)
    }
}

/// Which input an element came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The value being searched for
    Target,
    /// The list of values to be matched and removed
    Demand,
    /// The list of candidate values from which subsets are drawn
    Supply,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Target => write!(f, "target"),
            Side::Demand => write!(f, "demand"),
            Side::Supply => write!(f, "supply"),
        }
    }
}

/// Positions into the supply list identifying one matching combination.
///
/// Positions are strictly increasing and refer to the supply list as it was
/// when the search ran. Deserialisation enforces the same rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct SubsetWitness {
    positions: Vec<usize>,
}

impl SubsetWitness {
    pub(crate) fn new(positions: Vec<usize>) -> Self {
        debug_assert!(!positions.is_empty());
        debug_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        Self { positions }
    }

    /// Matched positions in increasing order
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Number of supply elements in the match
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false; a witness holds at least one position
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Collect the matched values out of `numbers`
    pub fn values<T: Clone>(&self, numbers: &[T]) -> Vec<T> {
        self.positions.iter().map(|&i| numbers[i].clone()).collect()
    }

    /// Consume the witness, returning its positions
    pub fn into_positions(self) -> Vec<usize> {
        self.positions
    }
}

impl TryFrom<Vec<usize>> for SubsetWitness {
    type Error = ReconciliationError;

    fn try_from(positions: Vec<usize>) -> ReconciliationResult<Self> {
        if positions.is_empty() {
            return Err(ReconciliationError::Validation(
                "Subset witness must hold at least one position".to_string(),
            ));
        }
        if positions.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ReconciliationError::Validation(
                "Subset witness positions must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { positions })
    }
}

impl From<SubsetWitness> for Vec<usize> {
    fn from(witness: SubsetWitness) -> Self {
        witness.positions
    }
}

/// One demand value consumed together with the supply subset that covered it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord<T> {
    /// Pass (starting at 1) in which the match was found
    pub pass: usize,
    /// The consumed demand value
    pub demand_value: T,
    /// Position the demand value was removed from
    pub demand_position: usize,
    /// Supply positions at search time, increasing
    pub supply_positions: Vec<usize>,
    /// The consumed supply values, in position order
    pub supply_values: Vec<T>,
}

/// Full outcome of a reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport<T> {
    /// Matches in the order they were made
    pub matches: Vec<MatchRecord<T>>,
    /// Demand values left unmatched
    pub remaining_demand: Vec<T>,
    /// Supply values left unconsumed
    pub remaining_supply: Vec<T>,
    /// Number of passes run, including the final no-op pass
    pub passes: usize,
    /// Number of combinations whose sum was compared against a target
    pub combinations_examined: u64,
}

impl<T> ReconciliationReport<T> {
    /// Whether every demand value was matched
    pub fn is_fully_matched(&self) -> bool {
        self.remaining_demand.is_empty()
    }

    /// Number of demand values consumed
    pub fn matched_count(&self) -> usize {
        self.matches.len()
    }
}

/// Errors that can occur during reconciliation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconciliationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Search limit exceeded: {0}")]
    SearchLimitExceeded(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ReconciliationError {
    pub(crate) fn invalid_element(side: Side, position: Option<usize>, reason: &str) -> Self {
        match position {
            Some(position) => ReconciliationError::InvalidInput(format!(
                "{} element at position {}: {}",
                side, position, reason
            )),
            None => ReconciliationError::InvalidInput(format!("{}: {}", side, reason)),
        }
    }
}

/// Result type for reconciliation operations
pub type ReconciliationResult<T> = Result<T, ReconciliationError>;
