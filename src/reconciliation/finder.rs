//! Exhaustive subset-sum search

use log::{trace, warn};

use crate::reconciliation::combinations::Combinations;
use crate::reconciliation::options::SearchLimits;
use crate::types::*;

/// Searches for the first subset of a list whose values sum to a target.
///
/// Subsets are tried by increasing size and, within one size, in
/// lexicographic order of their positions. The first hit wins, so results
/// are deterministic and prefer the smallest subset.
#[derive(Debug, Clone, Default)]
pub struct SubsetSumFinder {
    limits: SearchLimits,
}

impl SubsetSumFinder {
    /// Create a finder that explores every subset
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a finder bounded by `limits`
    pub fn with_limits(limits: SearchLimits) -> ReconciliationResult<Self> {
        limits.validate()?;
        Ok(Self { limits })
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Find the first subset of `numbers` summing to `target`.
    ///
    /// Returns `Ok(None)` when no subset matches. Fails with `InvalidInput`
    /// if the target or any element is not a usable amount.
    pub fn find<T: Amount>(
        &self,
        target: &T,
        numbers: &[T],
    ) -> ReconciliationResult<Option<SubsetWitness>> {
        target
            .validate()
            .map_err(|reason| ReconciliationError::invalid_element(Side::Target, None, &reason))?;
        for (position, value) in numbers.iter().enumerate() {
            value.validate().map_err(|reason| {
                ReconciliationError::invalid_element(Side::Supply, Some(position), &reason)
            })?;
        }

        let mut examined = 0;
        self.search(target, numbers, &mut examined)
    }

    /// Search without validating inputs. `examined` is incremented for every
    /// combination compared and checked against the combination budget.
    pub(crate) fn search<T: Amount>(
        &self,
        target: &T,
        numbers: &[T],
        examined: &mut u64,
    ) -> ReconciliationResult<Option<SubsetWitness>> {
        let n = numbers.len();
        let max_size = self.limits.max_subset_size.map_or(n, |max| max.min(n));
        let wanted = target.widen();

        for size in 1..=max_size {
            let mut combos = Combinations::new(n, size);
            while let Some(combo) = combos.next_combination() {
                *examined += 1;
                if let Some(budget) = self.limits.max_combinations {
                    if *examined > budget {
                        warn!(
                            "subset search for {:?} stopped after {} combinations",
                            target, budget
                        );
                        return Err(ReconciliationError::SearchLimitExceeded(format!(
                            "examined more than {} combinations",
                            budget
                        )));
                    }
                }

                if sums_to(&wanted, numbers, combo) {
                    trace!("{:?} matched positions {:?}", target, combo);
                    return Ok(Some(SubsetWitness::new(combo.to_vec())));
                }
            }
        }

        trace!("{:?} matched nothing among {} values", target, n);
        Ok(None)
    }
}

/// Whether the values of `numbers` at `combo` add up exactly to `wanted`
fn sums_to<T: Amount>(wanted: &T::Sum, numbers: &[T], combo: &[usize]) -> bool {
    let mut sum = T::zero_sum();
    for &i in combo {
        match numbers[i].accumulate(&sum) {
            Some(next) => sum = next,
            None => return false,
        }
    }
    sum == *wanted
}

/// Find the first subset of `numbers` summing to `target` with no search limits
pub fn find_subset_sum<T: Amount>(
    target: &T,
    numbers: &[T],
) -> ReconciliationResult<Option<SubsetWitness>> {
    SubsetSumFinder::new().find(target, numbers)
}
